pub mod error;
pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;
pub mod loader;

pub use error::{ImageError, Result};
pub use image::{Image, ImageGeometry};
pub use spatial::{Point, Vector, Spacing, Direction};
pub use transform::DisplacementField;
pub use loader::{LoaderError, MaskLoader};
