//! Writes intermediate masks next to each other for inspection.

use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use demonprep_core::image::Image;
use std::fs;
use std::path::{Path, PathBuf};
use crate::nifti_io::write_nifti;

/// Write each `(name, volume)` pair to `<dir>/<prefix>_<name>.nii`.
///
/// Creates `dir` when missing and returns the written paths in input order.
pub fn write_debug_volumes<B: Backend>(
    dir: &Path,
    prefix: &str,
    volumes: &[(&str, &Image<B, 3>)],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(volumes.len());
    for (name, volume) in volumes {
        let path = dir.join(format!("{}_{}.nii", prefix, name));
        write_nifti(&path, volume)?;
        written.push(path);
    }
    tracing::info!("Wrote {} debug volumes to {}", written.len(), dir.display());
    Ok(written)
}
