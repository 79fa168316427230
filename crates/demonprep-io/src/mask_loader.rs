//! NIfTI-backed mask resolution.

use std::path::Path;
use burn::tensor::backend::Backend;
use demonprep_core::image::Image;
use demonprep_core::loader::{LoaderError, MaskLoader};
use crate::nifti_io::read_nifti;

/// Loads mask volumes from NIfTI files onto a fixed device.
pub struct NiftiMaskLoader<B: Backend> {
    device: B::Device,
}

impl<B: Backend> NiftiMaskLoader<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &B::Device {
        &self.device
    }
}

impl<B: Backend> Default for NiftiMaskLoader<B> {
    fn default() -> Self {
        Self::new(Default::default())
    }
}

impl<B: Backend> MaskLoader<B> for NiftiMaskLoader<B> {
    fn load_mask(&self, path: &Path) -> Result<Image<B, 3>, LoaderError> {
        tracing::info!("Loading mask {}", path.display());
        read_nifti(path, &self.device).map_err(LoaderError::from)
    }
}
