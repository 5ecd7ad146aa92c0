//! Color handling for permission graph output
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, so category colors can be parsed from CSS strings and
//! passed on to a renderer.

use std::{fmt, str::FromStr};

use color::{DynamicColor, Srgb};
use serde::{Serialize, Serializer};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a string
    /// This will parse CSS color strings such as "#ff0000", "rgb(255, 0, 0)", "red", etc.
    ///
    /// # Examples
    ///
    /// ```
    /// use permgraph_core::color::Color;
    ///
    /// let purple = Color::new("#6a0dad").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the color as `#rrggbb`, or `#rrggbbaa` if it is not opaque.
    ///
    /// # Examples
    ///
    /// ```
    /// use permgraph_core::color::Color;
    ///
    /// assert_eq!(Color::new("red").unwrap().to_hex(), "#ff0000");
    /// ```
    pub fn to_hex(&self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        if rgba.a == u8::MAX {
            format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b, rgba.a)
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let purple = Color::new("#6a0dad");
        assert!(purple.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
        assert!(invalid.unwrap_err().contains("not-a-color"));
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color.to_string(), "black");
    }

    #[test]
    fn test_color_is_opaque() {
        let color = Color::new("#33cc33").unwrap();
        assert!((color.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::new("#6a0dad").unwrap().to_hex(), "#6a0dad");
        assert_eq!(Color::new("blue").unwrap().to_hex(), "#0000ff");
        assert_eq!(Color::new("rgba(255, 0, 0, 0)").unwrap().to_hex(), "#ff000000");
    }

    #[test]
    fn test_color_serializes_as_hex_string() {
        let color = Color::new("blue").unwrap();
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#0000ff\"");
    }
}
