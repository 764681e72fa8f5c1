//! Presentation constants for generated summaries.
//!
//! Everything here is plain data with serde support so hosts can ship a partial
//! JSON override; missing fields keep their defaults.

use core::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fonts::FontRef;
use crate::layout::Rgb;

/// Summary generation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Identity marker: exact container name used to find a summary again.
    pub marker: String,
    /// Joins document and page name in a current-page title.
    pub title_separator: String,
    /// Prefix for nested region entries.
    pub nested_prefix: String,
    pub fonts: FontConfig,
    pub sizes: TextSizes,
    pub colors: Palette,
    pub metrics: BlockMetrics,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            marker: "Table of Contents".to_string(),
            title_separator: " - ".to_string(),
            nested_prefix: "⤑ ".to_string(),
            fonts: FontConfig::default(),
            sizes: TextSizes::default(),
            colors: Palette::default(),
            metrics: BlockMetrics::default(),
        }
    }
}

impl SummaryConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::Json)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        Self::from_json_str(&json)
    }

    /// Override the identity marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Override the nested-entry prefix.
    pub fn with_nested_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.nested_prefix = prefix.into();
        self
    }

    /// Override the preferred primary and accent faces.
    pub fn with_fonts(mut self, primary: FontRef, accent: FontRef) -> Self {
        self.fonts.primary = primary;
        self.fonts.accent = accent;
        self
    }

    /// Override the face used when the preferred ones fail to load.
    pub fn with_fallback_font(mut self, fallback: FontRef) -> Self {
        self.fonts.fallback = fallback;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub primary: FontRef,
    pub accent: FontRef,
    /// Must always be available in the host.
    pub fallback: FontRef,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            primary: FontRef::new("Inter", "Medium"),
            accent: FontRef::new("Inter", "Bold"),
            fallback: FontRef::new("Inter", "Regular"),
        }
    }
}

/// Text sizes in host units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextSizes {
    pub title: f64,
    pub page_title: f64,
    pub region: f64,
    pub nested: f64,
}

impl Default for TextSizes {
    fn default() -> Self {
        Self {
            title: 32.0,
            page_title: 24.0,
            region: 18.0,
            nested: 14.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub title: Rgb,
    /// Top-level region entries.
    pub primary: Rgb,
    /// Nested region entries.
    pub secondary: Rgb,
    pub divider: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            title: Rgb::new(0x1e, 0x1e, 0x1e),
            primary: Rgb::new(0x0d, 0x63, 0xd8),
            secondary: Rgb::new(0x6b, 0x6b, 0x6b),
            divider: Rgb::new(0xd9, 0xd9, 0xd9),
        }
    }
}

/// Container and divider metrics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockMetrics {
    pub padding: f64,
    pub spacing: f64,
    pub corner_radius: f64,
    /// Gap between entries of one page block.
    pub page_spacing: f64,
    /// Gap between a region entry and its nested entries.
    pub region_spacing: f64,
    pub full_divider: f64,
    pub light_divider: f64,
}

impl Default for BlockMetrics {
    fn default() -> Self {
        Self {
            padding: 40.0,
            spacing: 24.0,
            corner_radius: 16.0,
            page_spacing: 12.0,
            region_spacing: 6.0,
            full_divider: 2.0,
            light_divider: 1.0,
        }
    }
}

/// Config loading error.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "config read failed: {}", err),
            Self::Json(err) => write!(f, "config parse failed: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config = SummaryConfig::from_json_str(
            r#"{"marker":"Contents","sizes":{"region":20.0},"fonts":{"fallback":{"family":"Roboto","style":"Regular"}}}"#,
        )
        .unwrap();
        assert_eq!(config.marker, "Contents");
        assert_eq!(config.sizes.region, 20.0);
        assert_eq!(config.sizes.nested, TextSizes::default().nested);
        assert_eq!(config.fonts.fallback, FontRef::new("Roboto", "Regular"));
        assert_eq!(config.fonts.primary, FontConfig::default().primary);
        assert_eq!(config.nested_prefix, "⤑ ");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = SummaryConfig::from_json_str("{marker:").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SummaryConfig::from_json_file("/nonexistent/summary-config.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn builder_setters_override_fields() {
        let config = SummaryConfig::default()
            .with_marker("TOC")
            .with_nested_prefix("- ")
            .with_fonts(FontRef::new("A", "1"), FontRef::new("B", "2"))
            .with_fallback_font(FontRef::new("C", "3"));
        assert_eq!(config.marker, "TOC");
        assert_eq!(config.nested_prefix, "- ");
        assert_eq!(config.fonts.accent, FontRef::new("B", "2"));
        assert_eq!(config.fonts.fallback, FontRef::new("C", "3"));
    }
}
