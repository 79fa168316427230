//! Error types for preprocessing runs.

use std::path::PathBuf;
use demonprep_core::error::ImageError;
use demonprep_core::loader::LoaderError;
use thiserror::Error;

/// Main error type for preprocessing.
///
/// Every configuration problem is reported before any voxel is touched, so a
/// failed run never leaves partial results behind.
#[derive(Error, Debug)]
pub enum PreprocessError {
    /// A required input volume was not provided.
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// A configuration value is out of its domain.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Threshold bounds are inverted.
    #[error("Invalid threshold range: lower {lower} is greater than upper {upper}")]
    InvalidThresholdRange { lower: f32, upper: f32 },

    /// Seed voxel lies outside the fixed volume.
    #[error("Seed {seed:?} is outside the fixed volume of size {size:?} (x, y, z)")]
    SeedOutOfBounds { seed: [usize; 3], size: [usize; 3] },

    /// An input volume has unusable geometry.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A configured mask could not be loaded.
    #[error("Failed to load mask {}: {source}", .path.display())]
    MaskLoad {
        path: PathBuf,
        #[source]
        source: LoaderError,
    },

    /// Two volumes that must agree in shape do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A filter failed for a reason other than the above.
    #[error("Image operation failed: {0}")]
    Image(#[source] ImageError),
}

/// Result type for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessError>;

impl PreprocessError {
    /// Create a missing input error.
    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::MissingInput(msg.into())
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// True for errors caused by the inputs or settings rather than a
    /// failure while processing voxels.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, Self::Image(_))
    }
}

impl From<ImageError> for PreprocessError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::InvalidGeometry(msg) => Self::InvalidGeometry(msg),
            ImageError::ShapeMismatch { expected, actual } => Self::ShapeMismatch { expected, actual },
            other => Self::Image(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_threshold_range_display() {
        let err = PreprocessError::InvalidThresholdRange { lower: 80.0, upper: 70.0 };
        assert_eq!(
            err.to_string(),
            "Invalid threshold range: lower 80 is greater than upper 70"
        );
    }

    #[test]
    fn test_mask_load_keeps_source() {
        let err = PreprocessError::MaskLoad {
            path: PathBuf::from("/data/brain.nii"),
            source: "file not found".into(),
        };
        assert!(err.to_string().contains("/data/brain.nii"));
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("file not found"));
    }

    #[test]
    fn test_image_error_conversion() {
        let err: PreprocessError = ImageError::invalid_geometry("zero extent").into();
        assert!(matches!(err, PreprocessError::InvalidGeometry(_)));

        let err: PreprocessError = ImageError::invalid_parameter("bad").into();
        assert!(matches!(err, PreprocessError::Image(_)));
        assert!(!err.is_configuration_error());
    }
}
