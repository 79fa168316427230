//! Whole-volume intensity statistics.

use burn::tensor::backend::Backend;
use burn::tensor::ElementConversion;
use crate::image::Image;

/// Smallest voxel value in the volume.
pub fn minimum_intensity<B: Backend, const D: usize>(image: &Image<B, D>) -> f32 {
    image.data().clone().min().into_scalar().elem::<f32>()
}

/// Largest voxel value in the volume.
pub fn maximum_intensity<B: Backend, const D: usize>(image: &Image<B, D>) -> f32 {
    image.data().clone().max().into_scalar().elem::<f32>()
}

/// `(min, max)` of the voxel values.
pub fn intensity_range<B: Backend, const D: usize>(image: &Image<B, D>) -> (f32, f32) {
    (minimum_intensity(image), maximum_intensity(image))
}

/// Number of voxels strictly above 0.5 in a binary volume.
pub fn count_foreground<B: Backend, const D: usize>(mask: &Image<B, D>) -> usize {
    let count = mask
        .data()
        .clone()
        .greater_elem(0.5)
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    count as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use crate::image::ImageGeometry;

    type TestBackend = NdArray<f32>;

    fn image(values: Vec<f32>) -> Image<TestBackend, 3> {
        let geometry = ImageGeometry::default_for_size([1, 1, values.len()]);
        Image::from_vec(values, &geometry, &Default::default()).unwrap()
    }

    #[test]
    fn test_minimum_finds_negative_values() {
        let img = image(vec![3.0, -1024.0, 12.5, 0.0]);
        assert_eq!(minimum_intensity(&img), -1024.0);
    }

    #[test]
    fn test_range() {
        let img = image(vec![3.0, -2.0, 12.5, 0.0]);
        assert_eq!(intensity_range(&img), (-2.0, 12.5));
    }

    #[test]
    fn test_constant_volume() {
        let img = image(vec![7.0; 6]);
        assert_eq!(minimum_intensity(&img), 7.0);
        assert_eq!(maximum_intensity(&img), 7.0);
    }

    #[test]
    fn test_count_foreground() {
        let mask = image(vec![1.0, 0.0, 1.0, 1.0, 0.0]);
        assert_eq!(count_foreground(&mask), 3);
    }
}
