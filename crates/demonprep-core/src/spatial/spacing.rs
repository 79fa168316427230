//! Physical distance between adjacent voxels along each axis.

use super::Vector;

/// Spacing between adjacent voxels along each axis.
///
/// Component `i` is the physical step along image axis `i` (x first).
pub type Spacing<const D: usize> = Vector<D>;

impl<const D: usize> Spacing<D> {
    /// Same spacing on every axis.
    pub fn uniform(value: f64) -> Self {
        let mut spacing = Vector::zeros();
        for i in 0..D {
            spacing[i] = value;
        }
        spacing
    }

    /// True when every component is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        (0..D).all(|i| self[i].is_finite() && self[i] > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Spacing3 = Spacing<3>;

    #[test]
    fn test_spacing_uniform() {
        assert_eq!(Spacing3::uniform(1.5), Spacing3::new([1.5, 1.5, 1.5]));
    }

    #[test]
    fn test_spacing_validity() {
        assert!(Spacing3::new([1.0, 0.5, 2.0]).is_valid());
        assert!(!Spacing3::new([1.0, 0.0, 2.0]).is_valid());
        assert!(!Spacing3::new([-1.0, 1.0, 1.0]).is_valid());
        assert!(!Spacing3::new([f64::NAN, 1.0, 1.0]).is_valid());
    }
}
