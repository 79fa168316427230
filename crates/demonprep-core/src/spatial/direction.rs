//! Direction cosine matrix describing image axis orientation.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};
use super::Vector;

/// Direction matrix representing image orientation.
///
/// Column `i` is the physical direction of image axis `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Try to compute the inverse of the direction matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Determinant by Gaussian elimination with partial pivoting.
    pub fn determinant(&self) -> f64 {
        let mut m = self.0;
        let mut det = 1.0;
        for col in 0..D {
            let pivot = (col..D)
                .max_by(|&a, &b| m[(a, col)].abs().total_cmp(&m[(b, col)].abs()))
                .unwrap_or(col);
            if m[(pivot, col)] == 0.0 {
                return 0.0;
            }
            if pivot != col {
                m.swap_rows(col, pivot);
                det = -det;
            }
            let p = m[(col, col)];
            det *= p;
            for row in (col + 1)..D {
                let factor = m[(row, col)] / p;
                for k in col..D {
                    let delta = factor * m[(col, k)];
                    m[(row, k)] -= delta;
                }
            }
        }
        det
    }

    /// True when the matrix has a usable inverse.
    pub fn is_invertible(&self) -> bool {
        self.0.iter().all(|v| v.is_finite()) && self.0.try_inverse().is_some()
    }

    /// Element-wise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }

    /// Get mutable reference to inner nalgebra matrix.
    pub fn inner_mut(&mut self) -> &mut SMatrix<f64, D, D> {
        &mut self.0
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}
