//! Binary threshold filter.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use crate::error::{ImageError, Result};
use crate::image::Image;

/// Maps voxels inside the inclusive range `[lower, upper]` to 1 and all
/// others to 0.
///
/// With `lower == upper` the filter selects one exact intensity.
pub struct BinaryThresholdFilter<B: Backend> {
    lower: f32,
    upper: f32,
    _b: PhantomData<B>,
}

impl<B: Backend> BinaryThresholdFilter<B> {
    /// Create a threshold filter; fails when the range is empty or NaN.
    pub fn new(lower: f32, upper: f32) -> Result<Self> {
        if !(lower <= upper) {
            return Err(ImageError::invalid_parameter(format!(
                "threshold lower bound {} exceeds upper bound {}",
                lower, upper
            )));
        }
        Ok(Self {
            lower,
            upper,
            _b: PhantomData,
        })
    }

    pub fn lower(&self) -> f32 {
        self.lower
    }

    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// Apply the filter, producing a {0, 1} image on the input grid.
    pub fn apply<const D: usize>(&self, image: &Image<B, D>) -> Image<B, D> {
        let data = image.data().clone();
        let above = data.clone().greater_equal_elem(self.lower).float();
        let below = data.lower_equal_elem(self.upper).float();

        Image::new(
            above * below,
            *image.origin(),
            *image.spacing(),
            *image.direction(),
        )
    }
}
