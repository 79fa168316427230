//! Seam through which masks are resolved from a path.
//!
//! The core never touches the filesystem. Whoever drives a pipeline supplies
//! a [`MaskLoader`]; `demonprep-io` ships a NIfTI implementation and any
//! closure with the right signature works too.

use std::path::Path;
use burn::tensor::backend::Backend;
use crate::image::Image;

/// Error type returned by mask loaders.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// Resolves a mask path to a volume.
pub trait MaskLoader<B: Backend> {
    fn load_mask(&self, path: &Path) -> Result<Image<B, 3>, LoaderError>;
}

impl<B, F> MaskLoader<B> for F
where
    B: Backend,
    F: Fn(&Path) -> Result<Image<B, 3>, LoaderError>,
{
    fn load_mask(&self, path: &Path) -> Result<Image<B, 3>, LoaderError> {
        self(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use crate::image::ImageGeometry;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_closure_acts_as_loader() {
        let loader = |path: &Path| -> Result<Image<TestBackend, 3>, LoaderError> {
            if path.ends_with("mask.nii") {
                let geometry = ImageGeometry::default_for_size([1, 1, 2]);
                Ok(Image::from_vec(vec![1.0, 0.0], &geometry, &Default::default())?)
            } else {
                Err(format!("no such mask: {}", path.display()).into())
            }
        };

        let mask = loader.load_mask(Path::new("/data/mask.nii")).unwrap();
        assert_eq!(mask.shape(), [1, 1, 2]);
        assert!(loader.load_mask(Path::new("/data/other.nii")).is_err());
    }
}
