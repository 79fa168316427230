//! Preprocessing configuration.
//!
//! A configuration is a plain value: it is validated once at the start of a
//! run and never changes while the run is in progress.

use demonprep_core::interpolation::InterpolationKind;
use serde::{Deserialize, Serialize};
use crate::error::{PreprocessError, Result};

/// Parameters of mask-guided tissue extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Inclusive lower bound of mask values kept by the threshold.
    pub lower: f32,
    /// Inclusive upper bound of mask values kept by the threshold.
    pub upper: f32,
    /// Seed voxel `(x, y, z)` for region confirmation.
    pub seed: [usize; 3],
    /// Connectivity radius `(x, y, z)`; all zero skips region confirmation.
    pub radius: [usize; 3],
    /// Binary median radius `(x, y, z)`; all zero skips the median pass.
    pub median_radius: [usize; 3],
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            lower: 0.0,
            upper: 70.0,
            seed: [0, 0, 0],
            radius: [1, 1, 1],
            median_radius: [0, 0, 0],
        }
    }
}

impl ExtractionConfig {
    pub fn with_threshold(mut self, lower: f32, upper: f32) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    pub fn with_seed(mut self, seed: [usize; 3]) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_radius(mut self, radius: [usize; 3]) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_median_radius(mut self, median_radius: [usize; 3]) -> Self {
        self.median_radius = median_radius;
        self
    }

    /// Reject NaN or inverted threshold bounds.
    pub fn validate(&self) -> Result<()> {
        if self.lower.is_nan() || self.upper.is_nan() || self.lower > self.upper {
            return Err(PreprocessError::InvalidThresholdRange {
                lower: self.lower,
                upper: self.upper,
            });
        }
        Ok(())
    }
}

/// Parameters of histogram matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramMatchingConfig {
    pub enabled: bool,
    /// Number of histogram bins.
    pub levels: usize,
    /// Number of interior quantile landmarks.
    pub match_points: usize,
}

impl Default for HistogramMatchingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            levels: 256,
            match_points: 1,
        }
    }
}

impl HistogramMatchingConfig {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_match_points(mut self, match_points: usize) -> Self {
        self.match_points = match_points;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.levels == 0 {
            return Err(PreprocessError::invalid_configuration(
                "number of histogram levels must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Complete configuration of a preprocessing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessorConfig {
    /// Value written to every voxel outside the extracted tissue and to
    /// resampled voxels outside the moving volume.
    pub default_pixel_value: f32,
    pub extraction: ExtractionConfig,
    pub histogram_matching: HistogramMatchingConfig,
    /// Interpolator used when the moving volume is resampled.
    pub interpolation: InterpolationKind,
    /// Keep intermediate masks in the output.
    pub debug: bool,
}

impl Default for PreprocessorConfig {
    fn default() -> Self {
        Self {
            default_pixel_value: 0.0,
            extraction: ExtractionConfig::default(),
            histogram_matching: HistogramMatchingConfig::default(),
            interpolation: InterpolationKind::default(),
            debug: false,
        }
    }
}

impl PreprocessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_pixel_value(mut self, value: f32) -> Self {
        self.default_pixel_value = value;
        self
    }

    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_histogram_matching(mut self, histogram_matching: HistogramMatchingConfig) -> Self {
        self.histogram_matching = histogram_matching;
        self
    }

    pub fn with_interpolation(mut self, interpolation: InterpolationKind) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Check every value that can be checked without looking at the inputs.
    pub fn validate(&self) -> Result<()> {
        if !self.default_pixel_value.is_finite() {
            return Err(PreprocessError::invalid_configuration(format!(
                "default pixel value must be finite, got {}",
                self.default_pixel_value
            )));
        }
        self.extraction.validate()?;
        self.histogram_matching.validate()
    }
}
