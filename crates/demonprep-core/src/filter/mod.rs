//! Volume filters.
//!
//! Each filter is a small value holding its parameters with an `apply`
//! method that returns a new image and leaves its inputs untouched.

pub mod histogram_matching;
pub mod mask;
pub mod median;
pub mod region;
pub mod resample;
pub mod statistics;
pub mod threshold;

pub use histogram_matching::{HistogramMatchingFilter, IntensityHistogram, TransferFunction};
pub use mask::MaskImageFilter;
pub use median::BinaryMedianFilter;
pub use region::RegionConfirmFilter;
pub use resample::ResampleImageFilter;
pub use statistics::{count_foreground, intensity_range, maximum_intensity, minimum_intensity};
pub use threshold::BinaryThresholdFilter;
