//! Identity transform.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;
use super::trait_::Transform;

/// Leaves every point where it is.
///
/// Resampling through the identity moves a volume onto another grid
/// without deforming it.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransform;

impl IdentityTransform {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend, const D: usize> Transform<B, D> for IdentityTransform {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_identity_returns_input() {
        let device = Default::default();
        let points = Tensor::<TestBackend, 2>::from_floats([[1.0, 2.0, 3.0], [-4.0, 0.5, 9.0]], &device);
        let out = <IdentityTransform as Transform<TestBackend, 3>>::transform_points(&IdentityTransform, points.clone());
        let out = out.into_data();
        let expected = points.into_data();
        assert_eq!(out.as_slice::<f32>().unwrap(), expected.as_slice::<f32>().unwrap());
    }
}
