//! The category tag carried by every node.
//!
//! Categories do not influence layout. They exist so that the rendering side
//! can style nodes, which it does through the plain lookup table in
//! [`Category::default_color`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Kind of entity a node stands for in a permission graph.
///
/// Deserializes from a lowercase string. Strings that name no known category
/// become [`Category::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Category {
    Resource,
    Role,
    Permission,
    #[default]
    Other,
}

impl Category {
    /// All categories, in lookup-table order.
    pub const ALL: [Category; 4] = [
        Category::Resource,
        Category::Role,
        Category::Permission,
        Category::Other,
    ];

    /// Position of this category in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the lowercase name of this category
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Resource => "resource",
            Category::Role => "role",
            Category::Permission => "permission",
            Category::Other => "other",
        }
    }

    /// Returns the CSS color string used for this category when nothing overrides it.
    pub fn default_color_str(self) -> &'static str {
        match self {
            Category::Resource => "#6a0dad",
            Category::Role => "#4ddbff",
            Category::Permission => "#33cc33",
            Category::Other => "#cccccc",
        }
    }

    /// Returns the [`Color`] used for this category when nothing overrides it.
    pub fn default_color(self) -> Color {
        Color::new(self.default_color_str()).expect("category colors are valid CSS colors")
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value {
            "resource" => Category::Resource,
            "role" => Category::Role,
            "permission" => Category::Permission,
            _ => Category::Other,
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from("resource"), Category::Resource);
        assert_eq!(Category::from("role"), Category::Role);
        assert_eq!(Category::from("permission"), Category::Permission);
        assert_eq!(Category::from("tenant"), Category::Other);
        assert_eq!(Category::from("Role"), Category::Other);
    }

    #[test]
    fn test_category_display_roundtrip() {
        for category in Category::ALL {
            assert_eq!(Category::from(category.to_string().as_str()), category);
        }
    }

    #[test]
    fn test_category_deserialize() {
        let categories: Vec<Category> =
            serde_json::from_str(r#"["role", "permission", "unknown"]"#).unwrap();
        assert_eq!(
            categories,
            vec![Category::Role, Category::Permission, Category::Other]
        );
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&Category::Resource).unwrap();
        assert_eq!(json, "\"resource\"");
    }

    #[test]
    fn test_default_colors_parse() {
        for category in Category::ALL {
            let color = category.default_color();
            assert!((color.alpha() - 1.0).abs() < 0.001, "{category}");
        }
    }

    #[test]
    fn test_index_matches_lookup_table() {
        for (idx, category) in Category::ALL.into_iter().enumerate() {
            assert_eq!(category.index(), idx);
        }
    }
}
