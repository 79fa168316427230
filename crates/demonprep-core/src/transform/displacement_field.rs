//! Dense displacement field.
//!
//! The preprocessing pipeline never edits a displacement field; it carries an
//! optional initial field through to the registration solver that consumes it.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use crate::error::{ImageError, Result};
use crate::image::ImageGeometry;

/// Per-voxel displacement vectors for a 3D grid.
///
/// The tensor has shape `[3, Z, Y, X]`; component 0 is the x displacement.
#[derive(Debug, Clone)]
pub struct DisplacementField<B: Backend> {
    displacement: Tensor<B, 4>,
    geometry: ImageGeometry<3>,
}

impl<B: Backend> DisplacementField<B> {
    /// Wrap a displacement tensor defined on `geometry`.
    pub fn new(displacement: Tensor<B, 4>, geometry: ImageGeometry<3>) -> Result<Self> {
        let [components, z, y, x] = displacement.dims();
        if components != 3 || [z, y, x] != geometry.size {
            let mut expected = vec![3];
            expected.extend_from_slice(&geometry.size);
            return Err(ImageError::ShapeMismatch {
                expected,
                actual: vec![components, z, y, x],
            });
        }
        Ok(Self {
            displacement,
            geometry,
        })
    }

    /// A field of zero vectors on `geometry`.
    pub fn zeros(geometry: ImageGeometry<3>, device: &B::Device) -> Self {
        let [z, y, x] = geometry.size;
        Self {
            displacement: Tensor::zeros([3, z, y, x], device),
            geometry,
        }
    }

    /// Get the displacement tensor.
    pub fn displacement(&self) -> &Tensor<B, 4> {
        &self.displacement
    }

    /// Grid the field is defined on.
    pub fn geometry(&self) -> &ImageGeometry<3> {
        &self.geometry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_zeros_shape() {
        let device = Default::default();
        let geometry = ImageGeometry::default_for_size([4, 5, 6]);
        let field = DisplacementField::<TestBackend>::zeros(geometry, &device);
        assert_eq!(field.displacement().dims(), [3, 4, 5, 6]);
    }

    #[test]
    fn test_new_rejects_mismatched_grid() {
        let device = Default::default();
        let geometry = ImageGeometry::default_for_size([4, 4, 4]);
        let tensor = Tensor::<TestBackend, 4>::zeros([3, 4, 4, 5], &device);
        assert!(matches!(
            DisplacementField::new(tensor, geometry),
            Err(ImageError::ShapeMismatch { .. })
        ));
    }
}
