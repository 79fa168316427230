//! Seeded region confirmation over a binary field.
//!
//! Global thresholding keeps every voxel in range, including islands such as
//! skin or bone that never touch the tissue of interest. Growing from a seed
//! keeps only what is connected to it.

use std::collections::VecDeque;
use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use crate::error::{ImageError, Result};
use crate::image::Image;

/// Keeps the foreground component reachable from a seed voxel.
///
/// Two foreground voxels are neighbours when their offset along every axis is
/// at most the radius for that axis, so a radius of 1 gives 26-connectivity
/// and larger radii bridge gaps narrower than the radius. A radius of zero on
/// every axis disables confirmation and returns the input unchanged.
pub struct RegionConfirmFilter<B: Backend> {
    seed: [usize; 3],
    radius: [usize; 3],
    _b: PhantomData<B>,
}

impl<B: Backend> RegionConfirmFilter<B> {
    /// # Arguments
    /// * `seed` - Voxel index `(x, y, z)` the region grows from
    /// * `radius` - Neighbourhood radius `(x, y, z)`
    pub fn new(seed: [usize; 3], radius: [usize; 3]) -> Self {
        Self {
            seed,
            radius,
            _b: PhantomData,
        }
    }

    /// True when the filter passes its input through unchanged.
    pub fn is_disabled(&self) -> bool {
        self.radius.iter().all(|&r| r == 0)
    }

    /// Apply to a {0, 1} image.
    pub fn apply(&self, binary: &Image<B, 3>) -> Result<Image<B, 3>> {
        let geometry = binary.geometry();
        if !geometry.contains_index(self.seed) {
            return Err(ImageError::invalid_parameter(format!(
                "seed {:?} lies outside image of size {:?}",
                self.seed, geometry.size
            )));
        }
        if self.is_disabled() {
            return Ok(binary.clone());
        }

        let values = binary.to_vec()?;
        let dims = [geometry.extent(0), geometry.extent(1), geometry.extent(2)];
        let confirmed = grow_from_seed(&values, dims, self.seed, self.radius);

        let kept = confirmed.iter().filter(|&&v| v > 0.0).count();
        tracing::debug!(
            "Region confirmation from seed {:?} (radius {:?}) kept {} voxels",
            self.seed,
            self.radius,
            kept
        );

        binary.with_values(confirmed)
    }
}

/// Breadth-first growth over foreground voxels of a flat `x`-fastest buffer.
fn grow_from_seed(values: &[f32], dims: [usize; 3], seed: [usize; 3], radius: [usize; 3]) -> Vec<f32> {
    let [nx, ny, nz] = dims;
    let idx = |x: usize, y: usize, z: usize| x + y * nx + z * nx * ny;

    let mut region = vec![0.0f32; values.len()];
    let seed_idx = idx(seed[0], seed[1], seed[2]);
    if values[seed_idx] <= 0.5 {
        return region;
    }

    let mut queue = VecDeque::new();
    region[seed_idx] = 1.0;
    queue.push_back(seed);

    while let Some([x, y, z]) = queue.pop_front() {
        let z_range = z.saturating_sub(radius[2])..=z.saturating_add(radius[2]).min(nz - 1);
        for k in z_range {
            let y_range = y.saturating_sub(radius[1])..=y.saturating_add(radius[1]).min(ny - 1);
            for j in y_range {
                let x_range = x.saturating_sub(radius[0])..=x.saturating_add(radius[0]).min(nx - 1);
                for i in x_range {
                    let n = idx(i, j, k);
                    if region[n] == 0.0 && values[n] > 0.5 {
                        region[n] = 1.0;
                        queue.push_back([i, j, k]);
                    }
                }
            }
        }
    }

    region
}
