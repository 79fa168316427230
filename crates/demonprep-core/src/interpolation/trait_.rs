//! Interpolator trait for sampling values at continuous coordinates.

use burn::tensor::Tensor;
use burn::tensor::backend::Backend;

/// Interpolator trait for sampling values at continuous coordinates.
///
/// Interpolators sample volume values at non-integer indices, which is what
/// resampling one grid onto another needs.
///
/// # Type Parameters
/// * `B` - The Burn backend
pub trait Interpolator<B: Backend> {
    /// Interpolate values from a volume at given continuous indices.
    ///
    /// # Arguments
    /// * `data` - The source volume `[Z, Y, X]`
    /// * `indices` - The indices at which to interpolate `[Batch, 3]`, each
    ///               row ordered `(x, y, z)`
    ///
    /// # Returns
    /// Tensor of sampled values `[Batch]`. Indices outside the volume are
    /// clamped to the nearest edge voxel.
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1>;
}
