//! Grid geometry shared by images, masks and displacement fields.
//!
//! Two volumes can be combined voxel by voxel only when their geometries
//! agree; `ImageGeometry` is the value that gets compared.

use crate::error::{ImageError, Result};
use crate::spatial::{Direction, Point, Spacing};

/// Tolerance used when deciding whether two geometries describe the same grid.
pub const GEOMETRY_TOLERANCE: f64 = 1e-6;

/// Size and physical placement of a voxel grid.
///
/// `size` follows tensor order (`[Z, Y, X]` in 3D) while `origin`, `spacing`
/// and `direction` follow index order (`x` first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGeometry<const D: usize> {
    pub size: [usize; D],
    pub origin: Point<D>,
    pub spacing: Spacing<D>,
    pub direction: Direction<D>,
}

impl<const D: usize> ImageGeometry<D> {
    pub fn new(size: [usize; D], origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Self {
        Self {
            size,
            origin,
            spacing,
            direction,
        }
    }

    /// Unit spacing, zero origin and identity direction for the given size.
    pub fn default_for_size(size: [usize; D]) -> Self {
        Self::new(size, Point::origin(), Spacing::uniform(1.0), Direction::identity())
    }

    /// Total number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.size.iter().product()
    }

    /// Extent along index axis `axis` (0 = x).
    pub fn extent(&self, axis: usize) -> usize {
        self.size[D - 1 - axis]
    }

    /// Check that the grid can be sampled and mapped to physical space.
    pub fn validate(&self) -> Result<()> {
        if self.size.iter().any(|&s| s == 0) {
            return Err(ImageError::invalid_geometry(format!(
                "size must be positive on every axis, got {:?}",
                self.size
            )));
        }
        if !self.spacing.is_valid() {
            return Err(ImageError::invalid_geometry(format!(
                "spacing must be finite and positive, got {:?}",
                self.spacing.to_vec()
            )));
        }
        if (0..D).any(|i| !self.origin[i].is_finite()) {
            return Err(ImageError::invalid_geometry("origin must be finite"));
        }
        if !self.direction.is_invertible() {
            return Err(ImageError::invalid_geometry("direction matrix is singular"));
        }
        Ok(())
    }

    /// True when both geometries describe the same voxel grid.
    pub fn matches(&self, other: &Self) -> bool {
        self.size == other.size
            && self.spacing.approx_eq(&other.spacing, GEOMETRY_TOLERANCE)
            && self.origin.approx_eq(&other.origin, GEOMETRY_TOLERANCE)
            && self.direction.approx_eq(&other.direction, GEOMETRY_TOLERANCE)
    }

    /// True when the voxel index (x first) lies inside the grid.
    pub fn contains_index(&self, index: [usize; D]) -> bool {
        (0..D).all(|axis| index[axis] < self.extent(axis))
    }

    /// Flat buffer offset of a voxel index (x first) in tensor memory order.
    pub fn linear_index(&self, index: [usize; D]) -> usize {
        let mut offset = 0;
        let mut stride = 1;
        for (axis, &i) in index.iter().enumerate() {
            offset += i * stride;
            stride *= self.extent(axis);
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_zero_extent() {
        let geometry = ImageGeometry::<3>::default_for_size([4, 0, 4]);
        assert!(matches!(geometry.validate(), Err(ImageError::InvalidGeometry(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_spacing() {
        let mut geometry = ImageGeometry::<3>::default_for_size([4, 4, 4]);
        geometry.spacing = Spacing::new([1.0, -1.0, 1.0]);
        assert!(geometry.validate().is_err());
    }

    #[test]
    fn test_matches_within_tolerance() {
        let a = ImageGeometry::<3>::default_for_size([4, 5, 6]);
        let mut b = a;
        b.origin = Point::new([1e-9, 0.0, 0.0]);
        assert!(a.matches(&b));

        b.origin = Point::new([0.5, 0.0, 0.0]);
        assert!(!a.matches(&b));

        let c = ImageGeometry::<3>::default_for_size([4, 5, 7]);
        assert!(!a.matches(&c));
    }

    #[test]
    fn test_index_helpers() {
        // [Z, Y, X] = [2, 3, 4]
        let geometry = ImageGeometry::<3>::default_for_size([2, 3, 4]);
        assert_eq!(geometry.extent(0), 4);
        assert_eq!(geometry.extent(2), 2);
        assert!(geometry.contains_index([3, 2, 1]));
        assert!(!geometry.contains_index([4, 0, 0]));
        assert_eq!(geometry.linear_index([1, 2, 1]), 1 + 2 * 4 + 12);
    }
}
