//! Binary median (majority) filter.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use rayon::prelude::*;
use crate::error::Result;
use crate::image::Image;

/// Median filter specialised for {0, 1} images.
///
/// Each voxel takes the majority value of the `(2r + 1)` box around it, which
/// is the median for binary data. Window samples beyond the border repeat the
/// nearest edge voxel, so every window has an odd number of samples and the
/// majority is always strict. A radius larger than its axis extent is treated
/// as equal to the extent.
pub struct BinaryMedianFilter<B: Backend> {
    radius: [usize; 3],
    _b: PhantomData<B>,
}

impl<B: Backend> BinaryMedianFilter<B> {
    /// # Arguments
    /// * `radius` - Window radius `(x, y, z)`; all zero is the identity
    pub fn new(radius: [usize; 3]) -> Self {
        Self {
            radius,
            _b: PhantomData,
        }
    }

    pub fn apply(&self, binary: &Image<B, 3>) -> Result<Image<B, 3>> {
        if self.radius.iter().all(|&r| r == 0) {
            return Ok(binary.clone());
        }

        let geometry = binary.geometry();
        let dims = [geometry.extent(0), geometry.extent(1), geometry.extent(2)];
        let input = binary.to_vec()?;
        let output = majority_vote(&input, dims, self.radius);

        binary.with_values(output)
    }
}

/// Reads from `input`, writes a fresh buffer; voxels are independent.
fn majority_vote(input: &[f32], dims: [usize; 3], radius: [usize; 3]) -> Vec<f32> {
    let [nx, ny, nz] = dims;
    // Radii are capped at the axis extent.
    let [rx, ry, rz] = [0, 1, 2].map(|axis| radius[axis].min(dims[axis]) as isize);
    let window = ((2 * rx + 1) * (2 * ry + 1) * (2 * rz + 1)) as usize;
    let clamp = |v: isize, n: usize| v.clamp(0, n as isize - 1) as usize;

    (0..input.len())
        .into_par_iter()
        .map(|i| {
            let x = (i % nx) as isize;
            let y = ((i / nx) % ny) as isize;
            let z = (i / (nx * ny)) as isize;

            let mut ones = 0usize;
            for dz in -rz..=rz {
                let k = clamp(z + dz, nz);
                for dy in -ry..=ry {
                    let j = clamp(y + dy, ny);
                    let row = j * nx + k * nx * ny;
                    for dx in -rx..=rx {
                        if input[row + clamp(x + dx, nx)] > 0.5 {
                            ones += 1;
                        }
                    }
                }
            }
            if 2 * ones > window { 1.0 } else { 0.0 }
        })
        .collect()
}
