//! Error types for image containers and filters.

use thiserror::Error;

/// Error raised by image construction and filter execution.
#[derive(Error, Debug)]
pub enum ImageError {
    /// Geometry is unusable (zero extent, bad spacing, singular direction).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// A filter parameter is outside its domain.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Two images or buffers that must agree in shape do not.
    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Tensor data could not be read back as `f32`.
    #[error("Tensor data conversion failed: {0}")]
    DataConversion(String),
}

/// Result type for image and filter operations.
pub type Result<T> = std::result::Result<T, ImageError>;

impl ImageError {
    /// Create an invalid geometry error.
    pub fn invalid_geometry(msg: impl Into<String>) -> Self {
        Self::InvalidGeometry(msg.into())
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ImageError::invalid_geometry("spacing must be positive");
        assert_eq!(err.to_string(), "Invalid geometry: spacing must be positive");
    }

    #[test]
    fn test_shape_mismatch_display() {
        let err = ImageError::ShapeMismatch {
            expected: vec![4, 4, 4],
            actual: vec![2, 2, 2],
        };
        let msg = err.to_string();
        assert!(msg.contains("expected [4, 4, 4]"));
        assert!(msg.contains("got [2, 2, 2]"));
    }
}
