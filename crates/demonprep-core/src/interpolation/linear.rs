//! Trilinear interpolation.

use burn::tensor::{Tensor, Int};
use burn::tensor::backend::Backend;
use serde::{Serialize, Deserialize};
use super::trait_::Interpolator;

/// Linear Interpolator.
///
/// Performs trilinear interpolation between the eight voxels surrounding
/// each sample.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    /// Create a new linear interpolator.
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [nz, ny, nx] = data.dims();
        let flat = data.clone().reshape([nz * ny * nx]);
        let extents = [nx, ny, nz];
        let strides = [1, nx as i32, (nx * ny) as i32];

        // Per axis (x, y, z): flat offsets of the two bracketing voxels and
        // the fractional distance past the lower one.
        let mut lower: Vec<Tensor<B, 1, Int>> = Vec::with_capacity(3);
        let mut upper: Vec<Tensor<B, 1, Int>> = Vec::with_capacity(3);
        let mut frac: Vec<Tensor<B, 1>> = Vec::with_capacity(3);
        for axis in 0..3 {
            let coord = indices.clone().narrow(1, axis, 1).squeeze::<1>(1);
            let base = coord.clone().floor();
            let max = (extents[axis] - 1) as f64;
            frac.push(coord - base.clone());
            lower.push(base.clone().clamp(0.0, max).int() * strides[axis]);
            upper.push((base + 1.0).clamp(0.0, max).int() * strides[axis]);
        }

        let corner = |bits: usize| {
            let pick = |axis: usize| {
                if (bits >> axis) & 1 == 1 {
                    (upper[axis].clone(), frac[axis].clone())
                } else {
                    (lower[axis].clone(), frac[axis].clone().mul_scalar(-1.0).add_scalar(1.0))
                }
            };
            let (ox, wx) = pick(0);
            let (oy, wy) = pick(1);
            let (oz, wz) = pick(2);
            flat.clone().gather(0, ox + oy + oz) * wx * wy * wz
        };

        (1..8).fold(corner(0), |acc, bits| acc + corner(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use burn::tensor::TensorData;

    type TestBackend = NdArray<f32>;

    fn corner_volume() -> Tensor<TestBackend, 3> {
        // [Z=2, Y=2, X=2], value = 100*z + 10*y + x
        let data_vec = vec![0.0, 1.0, 10.0, 11.0, 100.0, 101.0, 110.0, 111.0];
        Tensor::<TestBackend, 3>::from_data(
            TensorData::new(data_vec, burn::tensor::Shape::new([2, 2, 2])),
            &Default::default(),
        )
    }

    #[test]
    fn test_linear_interpolator_grid_points() {
        let device = Default::default();
        let data = corner_volume();
        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
            &device,
        );
        let result = LinearInterpolator::new().interpolate(&data, indices).into_data();
        let slice = result.as_slice::<f32>().unwrap();

        assert_eq!(slice, &[0.0, 1.0, 10.0, 100.0]);
    }

    #[test]
    fn test_linear_interpolator_center() {
        let device = Default::default();
        let data = corner_volume();
        let center = Tensor::<TestBackend, 2>::from_floats([[0.5, 0.5, 0.5]], &device);
        let result = LinearInterpolator::new().interpolate(&data, center).into_data();
        let slice = result.as_slice::<f32>().unwrap();

        let expected = (0.0 + 1.0 + 10.0 + 11.0 + 100.0 + 101.0 + 110.0 + 111.0) / 8.0;
        assert!((slice[0] - expected).abs() < 1e-4, "Expected {}, got {}", expected, slice[0]);
    }

    #[test]
    fn test_linear_interpolator_clamps_outside() {
        let device = Default::default();
        let data = corner_volume();
        let outside = Tensor::<TestBackend, 2>::from_floats([[5.0, 0.0, 0.0]], &device);
        let result = LinearInterpolator::new().interpolate(&data, outside).into_data();
        assert_eq!(result.as_slice::<f32>().unwrap()[0], 1.0);
    }
}
