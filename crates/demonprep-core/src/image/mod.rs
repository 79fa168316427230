//! Image types and operations.
//!
//! This module provides the Image type, its grid geometry, and helpers
//! for generating index grids over an image.

pub mod image;
pub mod geometry;
pub mod grid;

pub use image::Image;
pub use geometry::ImageGeometry;
pub use grid::generate_grid_3d;
