pub mod nifti_io;
pub mod mask_loader;
pub mod debug_dump;

pub use nifti_io::{read_nifti, write_nifti};
pub use mask_loader::NiftiMaskLoader;
pub use debug_dump::write_debug_volumes;
