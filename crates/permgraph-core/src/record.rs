//! Raw node and edge records, in the shape a data source supplies them.
//!
//! Records are plain data. They are checked for well-formedness by the source
//! parser and turned into a validated graph by the layout crate.

use serde::Deserialize;

use crate::{category::Category, geometry::Size};

/// A node as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeRecord {
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Category tag. Delivered under the `type` key.
    #[serde(default, rename = "type", alias = "category")]
    pub category: Category,

    #[serde(default)]
    pub width: Option<f32>,

    #[serde(default)]
    pub height: Option<f32>,
}

impl NodeRecord {
    /// Creates a record with only an id; every other field takes its default.
    ///
    /// # Examples
    ///
    /// ```
    /// use permgraph_core::{category::Category, record::NodeRecord};
    ///
    /// let admin = NodeRecord::new("admin").with_category(Category::Role);
    /// assert_eq!(admin.id, "admin");
    /// assert!(admin.width.is_none());
    /// ```
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            category: Category::default(),
            width: None,
            height: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.width = Some(size.width());
        self.height = Some(size.height());
        self
    }
}

/// A directed edge as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Rank-tightening weight. Missing means 1.
    #[serde(default)]
    pub weight: Option<u32>,
}

impl EdgeRecord {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: None,
            weight: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }
}
