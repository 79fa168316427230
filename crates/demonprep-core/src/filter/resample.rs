//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! onto a new voxel grid using a transform and an interpolator.

use std::marker::PhantomData;
use burn::tensor::{Tensor, Bool};
use burn::tensor::backend::Backend;
use crate::error::Result;
use crate::image::{generate_grid_3d, Image, ImageGeometry};
use crate::transform::Transform;
use crate::interpolation::Interpolator;

/// Resample image filter.
///
/// Resamples an image by mapping every output voxel centre to physical
/// space, pulling it through the transform into the input's physical space,
/// and interpolating the input there.
///
/// The transform maps Output Physical Space -> Input Physical Space.
/// Samples that land more than half a voxel outside the input grid receive
/// `default_pixel_value` instead of a clamped edge value.
///
/// # Type Parameters
/// * `B` - The Burn backend
/// * `T` - The transform type
/// * `I` - The interpolator type
pub struct ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B, 3>,
    I: Interpolator<B>,
{
    geometry: ImageGeometry<3>,
    transform: T,
    interpolator: I,
    default_pixel_value: f32,
    _phantom: PhantomData<B>,
}

impl<B, T, I> ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B, 3>,
    I: Interpolator<B>,
{
    /// Create a new resample filter producing images on `geometry`.
    pub fn new(geometry: ImageGeometry<3>, transform: T, interpolator: I) -> Self {
        Self {
            geometry,
            transform,
            interpolator,
            default_pixel_value: 0.0,
            _phantom: PhantomData,
        }
    }

    /// Create from a reference image, whose grid becomes the output grid.
    pub fn new_from_reference(reference: &Image<B, 3>, transform: T, interpolator: I) -> Self {
        Self::new(reference.geometry(), transform, interpolator)
    }

    /// Set default pixel value for outside the field of view.
    pub fn with_default_pixel_value(mut self, value: f32) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Apply filter to an input image.
    pub fn apply(&self, input: &Image<B, 3>) -> Result<Image<B, 3>> {
        self.geometry.validate()?;
        input.geometry().validate()?;

        let device = input.data().device();
        let reference = Image::new(
            Tensor::<B, 3>::zeros([1, 1, 1], &device),
            self.geometry.origin,
            self.geometry.spacing,
            self.geometry.direction,
        );

        let output_indices = generate_grid_3d::<B>(self.geometry.size, &device);
        let output_points = reference.index_to_world_tensor(output_indices);
        let input_points = self.transform.transform_points(output_points);
        let input_indices = input.world_to_index_tensor(input_points)?;

        let outside = Self::outside_support(input_indices.clone(), input.shape());
        let values = self
            .interpolator
            .interpolate(input.data(), input_indices)
            .mask_fill(outside, self.default_pixel_value);

        tracing::debug!(
            "Resampled {:?} onto {:?} (fill {})",
            input.shape(),
            self.geometry.size,
            self.default_pixel_value
        );

        Ok(Image::new(
            values.reshape(self.geometry.size),
            self.geometry.origin,
            self.geometry.spacing,
            self.geometry.direction,
        ))
    }

    /// Rows of `indices` (x, y, z) lying beyond the half-voxel border of `shape`.
    fn outside_support(indices: Tensor<B, 2>, shape: [usize; 3]) -> Tensor<B, 1, Bool> {
        let batch = indices.dims()[0];
        let mut violations = Tensor::<B, 1>::zeros([batch], &indices.device());
        for axis in 0..3 {
            let extent = shape[2 - axis] as f32;
            let coord = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
            violations = violations
                + coord.clone().lower_elem(-0.5).float()
                + coord.greater_elem(extent - 0.5).float();
        }
        violations.greater_elem(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use crate::interpolation::{LinearInterpolator, NearestNeighborInterpolator};
    use crate::spatial::{Point3, Spacing3};
    use crate::transform::IdentityTransform;

    type TestBackend = NdArray<f32>;

    fn ramp(geometry: &ImageGeometry<3>) -> Image<TestBackend, 3> {
        let values: Vec<f32> = (0..geometry.num_voxels()).map(|i| (i % geometry.size[2]) as f32).collect();
        Image::from_vec(values, geometry, &Default::default()).unwrap()
    }

    #[test]
    fn test_resample_onto_same_grid_is_identity() {
        let geometry = ImageGeometry::default_for_size([3, 4, 5]);
        let input = ramp(&geometry);

        let filter = ResampleImageFilter::new_from_reference(&input, IdentityTransform, LinearInterpolator::new());
        let output = filter.apply(&input).unwrap();

        let a = input.to_vec().unwrap();
        let b = output.to_vec().unwrap();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_resample_to_finer_grid_interpolates_linearly() {
        // x ramp 0..4 with unit spacing, resampled at half spacing
        let coarse = ImageGeometry::default_for_size([1, 1, 5]);
        let input = ramp(&coarse);
        let fine = ImageGeometry::new([1, 1, 9], Point3::origin(), Spacing3::new([0.5, 1.0, 1.0]), coarse.direction);

        let filter = ResampleImageFilter::new(fine, IdentityTransform, LinearInterpolator::new());
        let output = filter.apply(&input).unwrap().to_vec().unwrap();

        for (i, v) in output.iter().enumerate() {
            assert!((v - i as f32 * 0.5).abs() < 1e-4, "voxel {} = {}", i, v);
        }
    }

    #[test]
    fn test_samples_outside_support_get_default_value() {
        let input_geometry = ImageGeometry::default_for_size([2, 2, 2]);
        let input = Image::<TestBackend, 3>::from_vec(vec![5.0; 8], &input_geometry, &Default::default()).unwrap();

        // Output grid shifted so its last two x columns fall outside the input
        let output_geometry = ImageGeometry::new(
            [2, 2, 4],
            Point3::new([0.0, 0.0, 0.0]),
            Spacing3::uniform(1.0),
            input_geometry.direction,
        );
        let filter = ResampleImageFilter::new(output_geometry, IdentityTransform, NearestNeighborInterpolator::new())
            .with_default_pixel_value(-1.0);
        let output = filter.apply(&input).unwrap().to_vec().unwrap();

        for row in output.chunks(4) {
            assert_eq!(row, &[5.0, 5.0, -1.0, -1.0]);
        }
    }
}
