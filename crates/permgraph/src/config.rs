//! Configuration types for permission graph layout.
//!
//! This module provides configuration structures that control how graphs are
//! laid out and how categories are colored. All types implement
//! [`serde::Deserialize`] so they can be loaded from TOML or JSON.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Spacing, default node size and ordering effort.
//! - [`StyleConfig`] - Per-category color overrides.
//!
//! Unrecognized keys are ignored. Layout options may be spelled in
//! snake_case (`rank_separation`) or camelCase (`rankSeparation`).
//!
//! # Example
//!
//! ```
//! # use permgraph::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().rank_separation(), 150.0);
//! assert!(config.layout().validate().is_ok());
//! ```

use serde::Deserialize;

use permgraph_core::{category::Category, color::Color, geometry::Size};

use crate::error::LayoutError;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style configurations.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }
}

/// Options consumed by the layout engine.
///
/// Defaults: 150 px between ranks, 100 px between neighbouring nodes,
/// 200 x 60 px nodes, 24 ordering passes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap between consecutive rank rows.
    #[serde(alias = "rankSeparation")]
    rank_separation: f32,

    /// Minimum horizontal gap between boxes in the same rank.
    #[serde(alias = "nodeSeparation")]
    node_separation: f32,

    /// Width used for nodes that carry none.
    #[serde(alias = "defaultNodeWidth")]
    default_node_width: f32,

    /// Height used for nodes that carry none.
    #[serde(alias = "defaultNodeHeight")]
    default_node_height: f32,

    /// Upper bound on median + transpose iterations in crossing minimization.
    #[serde(alias = "maxOrderingPasses")]
    max_ordering_passes: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rank_separation: 150.0,
            node_separation: 100.0,
            default_node_width: 200.0,
            default_node_height: 60.0,
            max_ordering_passes: 24,
        }
    }
}

impl LayoutConfig {
    pub fn rank_separation(&self) -> f32 {
        self.rank_separation
    }

    pub fn node_separation(&self) -> f32 {
        self.node_separation
    }

    /// Returns the size given to nodes without an explicit size.
    pub fn default_node_size(&self) -> Size {
        Size::new(self.default_node_width, self.default_node_height)
    }

    pub fn max_ordering_passes(&self) -> usize {
        self.max_ordering_passes
    }

    /// Set the vertical gap between ranks
    pub fn with_rank_separation(mut self, separation: f32) -> Self {
        self.rank_separation = separation;
        self
    }

    /// Set the horizontal gap between nodes of a rank
    pub fn with_node_separation(mut self, separation: f32) -> Self {
        self.node_separation = separation;
        self
    }

    /// Set the default node size
    pub fn with_default_node_size(mut self, size: Size) -> Self {
        self.default_node_width = size.width();
        self.default_node_height = size.height();
        self
    }

    /// Set the crossing-minimization iteration budget
    pub fn with_max_ordering_passes(mut self, passes: usize) -> Self {
        self.max_ordering_passes = passes;
        self
    }

    /// Checks that every separation and size is positive and finite.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::DegenerateConfiguration`] naming the first
    /// offending option. Values are never clamped.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let options = [
            ("rank_separation", self.rank_separation),
            ("node_separation", self.node_separation),
            ("default_node_width", self.default_node_width),
            ("default_node_height", self.default_node_height),
        ];
        for (option, value) in options {
            if !(value.is_finite() && value > 0.0) {
                return Err(LayoutError::DegenerateConfiguration {
                    option: option.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Visual styling configuration handed to renderers.
///
/// Each field overrides the built-in color of one category, as a CSS color
/// string. Unset fields fall back to [`Category::default_color`].
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    resource_color: Option<String>,

    #[serde(default)]
    role_color: Option<String>,

    #[serde(default)]
    permission_color: Option<String>,

    #[serde(default)]
    other_color: Option<String>,
}

impl StyleConfig {
    /// Returns the [`Color`] for a category, applying any configured override.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn color_for(&self, category: Category) -> Result<Color, String> {
        let configured = match category {
            Category::Resource => &self.resource_color,
            Category::Role => &self.role_color,
            Category::Permission => &self.permission_color,
            Category::Other => &self.other_color,
        };

        match configured {
            Some(color) => Color::new(color)
                .map_err(|err| format!("Invalid {category} color in config: {err}")),
            None => Ok(category.default_color()),
        }
    }
}
