//! Apply a binary mask to a volume.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use crate::error::{ImageError, Result};
use crate::image::Image;

/// Replaces every voxel outside the mask with a fixed outside value.
///
/// Mask voxels greater than 0.5 count as inside. The mask must share the
/// source's grid; callers resample first when it does not.
pub struct MaskImageFilter<B: Backend> {
    outside_value: f32,
    _b: PhantomData<B>,
}

impl<B: Backend> MaskImageFilter<B> {
    pub fn new(outside_value: f32) -> Self {
        Self {
            outside_value,
            _b: PhantomData,
        }
    }

    pub fn outside_value(&self) -> f32 {
        self.outside_value
    }

    pub fn apply(&self, source: &Image<B, 3>, mask: &Image<B, 3>) -> Result<Image<B, 3>> {
        if source.shape() != mask.shape() {
            return Err(ImageError::ShapeMismatch {
                expected: source.shape().to_vec(),
                actual: mask.shape().to_vec(),
            });
        }

        let outside = mask.data().clone().lower_equal_elem(0.5);
        let data = source.data().clone().mask_fill(outside, self.outside_value);

        Ok(Image::new(
            data,
            *source.origin(),
            *source.spacing(),
            *source.direction(),
        ))
    }
}
