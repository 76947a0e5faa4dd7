//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, users can specify settings in a
//! config file:
//!
//! ```toml
//! # trajviz.toml
//! [conversion]
//! point_interval_secs = 15
//! keep_missing = false
//!
//! [render]
//! width = 1500
//! height = 1000
//! max_points = 100000
//! color_by_label = true
//!
//! [validation]
//! min_lon = -8.7
//! max_lon = -8.5
//! min_lat = 41.0
//! max_lat = 41.3
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use trajviz::convert::ConvertConfig;
use trajviz::state::RenderConfig;
use trajviz::validator::ValidateOptions;

/// Root configuration structure for trajviz.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Converter settings.
    #[serde(default)]
    pub conversion: ConversionOverrides,

    /// Chart rendering settings.
    #[serde(default)]
    pub render: RenderOverrides,

    /// Validation bounds settings.
    #[serde(default)]
    pub validation: ValidationOverrides,
}

/// Overrides for the convert command.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionOverrides {
    /// Seconds between consecutive polyline points.
    pub point_interval_secs: Option<i64>,

    /// Convert trips flagged MISSING_DATA instead of skipping them.
    pub keep_missing: Option<bool>,
}

/// Overrides for chart rendering.
#[derive(Debug, Default, Deserialize)]
pub struct RenderOverrides {
    /// Chart width in pixels.
    pub width: Option<u32>,

    /// Chart height in pixels.
    pub height: Option<u32>,

    /// Overview point budget.
    pub max_points: Option<usize>,

    /// Color points by location label.
    pub color_by_label: Option<bool>,
}

/// Overrides for the coordinate sanity bounds.
#[derive(Debug, Default, Deserialize)]
pub struct ValidationOverrides {
    /// Western edge.
    pub min_lon: Option<f64>,
    /// Eastern edge.
    pub max_lon: Option<f64>,
    /// Southern edge.
    pub min_lat: Option<f64>,
    /// Northern edge.
    pub max_lat: Option<f64>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load from an optional path, falling back to defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Converter settings with overrides applied over the defaults.
    pub fn convert_config(&self) -> ConvertConfig {
        let mut config = ConvertConfig::default();
        if let Some(interval) = self.conversion.point_interval_secs {
            config.point_interval_secs = interval;
        }
        if let Some(keep) = self.conversion.keep_missing {
            config.keep_missing = keep;
        }
        config
    }

    /// Render settings with overrides applied over the defaults.
    pub fn render_config(&self) -> RenderConfig {
        let mut config = RenderConfig::default();
        if let Some(width) = self.render.width {
            config.width = width;
        }
        if let Some(height) = self.render.height {
            config.height = height;
        }
        if let Some(max_points) = self.render.max_points {
            config.max_points = max_points;
        }
        if let Some(color) = self.render.color_by_label {
            config.color_by_label = color;
        }
        config
    }

    /// Validation settings with overrides applied over the defaults.
    pub fn validate_options(&self) -> ValidateOptions {
        let mut options = ValidateOptions::default();
        if let Some(v) = self.validation.min_lon {
            options.bounds.min_lon = v;
        }
        if let Some(v) = self.validation.max_lon {
            options.bounds.max_lon = v;
        }
        if let Some(v) = self.validation.min_lat {
            options.bounds.min_lat = v;
        }
        if let Some(v) = self.validation.max_lat {
            options.bounds.max_lat = v;
        }
        options
    }
}
