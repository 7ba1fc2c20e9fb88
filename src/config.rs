//! Configuration for pyramid construction.
//!
//! `PyramidConfig` is serializable so runs can be described in JSON and
//! reproduced; all fields have defaults matching the viewer's expectations.

use crate::error::{Result, RnagridError};
use serde::de::Error;
use serde::{Deserialize, Serialize};

/// Configuration for building a transcript tile pyramid.
///
/// # Example
///
/// ```rust
/// use rnagrid::PyramidConfig;
///
/// // Create default config
/// let config = PyramidConfig::default();
/// assert_eq!(config.base_grid_size, 250.0);
///
/// // Load from JSON
/// let json = r#"{
///     "base_grid_size": 100.0,
///     "max_levels": 10
/// }"#;
/// let config = PyramidConfig::from_json(json).unwrap();
/// assert_eq!(config.max_levels, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PyramidConfig {
    /// Tile edge length at level 0, in spatial units (microns).
    #[serde(default = "PyramidConfig::default_base_grid_size")]
    pub base_grid_size: f64,

    /// Upper bound on pyramid depth; the loop stops here even if the
    /// bounding box never collapses into a single tile.
    #[serde(default = "PyramidConfig::default_max_levels")]
    pub max_levels: usize,

    /// Population divisor applied between levels.
    #[serde(default = "PyramidConfig::default_subsample_factor")]
    pub subsample_factor: usize,

    /// Constant quality score written for every point.
    #[serde(default = "PyramidConfig::default_quality_score")]
    pub quality_score: f32,

    /// Input column holding the x coordinate.
    #[serde(default = "PyramidConfig::default_x_column")]
    pub x_column: String,

    /// Input column holding the y coordinate.
    #[serde(default = "PyramidConfig::default_y_column")]
    pub y_column: String,

    /// Input column holding the gene label.
    #[serde(default = "PyramidConfig::default_gene_column")]
    pub gene_column: String,
}

impl PyramidConfig {
    const fn default_base_grid_size() -> f64 {
        250.0
    }

    const fn default_max_levels() -> usize {
        15
    }

    const fn default_subsample_factor() -> usize {
        4
    }

    const fn default_quality_score() -> f32 {
        40.0
    }

    fn default_x_column() -> String {
        "x".to_string()
    }

    fn default_y_column() -> String {
        "y".to_string()
    }

    fn default_gene_column() -> String {
        "gene".to_string()
    }

    pub fn with_base_grid_size(mut self, size: f64) -> Self {
        self.base_grid_size = size;
        self
    }

    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    pub fn with_quality_score(mut self, score: f32) -> Self {
        self.quality_score = score;
        self
    }

    /// Override the input column names.
    pub fn with_columns(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
        gene: impl Into<String>,
    ) -> Self {
        self.x_column = x.into();
        self.y_column = y.into();
        self.gene_column = gene.into();
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.base_grid_size.is_finite() || self.base_grid_size <= 0.0 {
            return Err(RnagridError::InvalidInput(format!(
                "Base grid size must be positive and finite, got: {}",
                self.base_grid_size
            )));
        }

        if self.max_levels == 0 {
            return Err(RnagridError::InvalidInput(
                "Max levels must be greater than zero".to_string(),
            ));
        }

        if self.subsample_factor < 2 {
            return Err(RnagridError::InvalidInput(format!(
                "Subsample factor must be at least 2, got: {}",
                self.subsample_factor
            )));
        }

        if self.x_column.is_empty() || self.y_column.is_empty() || self.gene_column.is_empty() {
            return Err(RnagridError::InvalidInput(
                "Column names cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: PyramidConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            base_grid_size: Self::default_base_grid_size(),
            max_levels: Self::default_max_levels(),
            subsample_factor: Self::default_subsample_factor(),
            quality_score: Self::default_quality_score(),
            x_column: Self::default_x_column(),
            y_column: Self::default_y_column(),
            gene_column: Self::default_gene_column(),
        }
    }
}
