//! Stateful facade over [`preprocess`].

use std::path::PathBuf;
use std::sync::Arc;
use burn::tensor::backend::Backend;
use demonprep_core::image::Image;
use demonprep_core::interpolation::InterpolationKind;
use demonprep_core::loader::MaskLoader;
use demonprep_core::transform::DisplacementField;
use crate::config::PreprocessorConfig;
use crate::error::Result;
use crate::preprocess::{preprocess, PreprocessInputs, PreprocessOutput};
use crate::progress::{ProgressCallback, ProgressTracker};

/// Prepares one fixed/moving pair for Demons registration.
///
/// Inputs and settings are set one at a time, then [`execute`](Self::execute)
/// runs the whole pipeline from scratch. Outputs of the last successful run
/// stay readable until the next successful run replaces all of them at once;
/// a failed run leaves them untouched.
///
/// # Examples
/// ```rust,no_run
/// use burn_ndarray::NdArray;
/// use demonprep_io::{read_nifti, NiftiMaskLoader};
/// use demonprep_pipeline::DemonsPreprocessor;
///
/// type Backend = NdArray<f32>;
///
/// # fn main() -> anyhow::Result<()> {
/// let device = Default::default();
/// let mut preprocessor = DemonsPreprocessor::new(NiftiMaskLoader::<Backend>::default());
/// preprocessor.set_fixed_image(read_nifti::<Backend, _>("fixed.nii", &device)?);
/// preprocessor.set_moving_image(read_nifti::<Backend, _>("moving.nii", &device)?);
/// preprocessor.set_fixed_binary_volume("fixed_mask.nii");
/// preprocessor.set_upper(70.0);
/// preprocessor.execute()?;
///
/// let moving = preprocessor.output_moving_image().expect("published");
/// # Ok(())
/// # }
/// ```
pub struct DemonsPreprocessor<B: Backend, L: MaskLoader<B>> {
    inputs: PreprocessInputs<B>,
    config: PreprocessorConfig,
    loader: L,
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    output: Option<PreprocessOutput<B>>,
}

impl<B: Backend, L: MaskLoader<B>> DemonsPreprocessor<B, L> {
    pub fn new(loader: L) -> Self {
        Self {
            inputs: PreprocessInputs::default(),
            config: PreprocessorConfig::default(),
            loader,
            progress_callback: None,
            output: None,
        }
    }

    pub fn set_fixed_image(&mut self, image: Image<B, 3>) {
        self.inputs.fixed = Some(image);
    }

    pub fn set_moving_image(&mut self, image: Image<B, 3>) {
        self.inputs.moving = Some(image);
    }

    pub fn set_initial_displacement_field(&mut self, field: DisplacementField<B>) {
        self.inputs.initial_displacement_field = Some(field);
    }

    /// Mask guiding extraction of the fixed volume.
    pub fn set_fixed_binary_volume(&mut self, path: impl Into<PathBuf>) {
        self.inputs.fixed_mask = Some(path.into());
    }

    /// Mask guiding extraction of the moving volume.
    pub fn set_moving_binary_volume(&mut self, path: impl Into<PathBuf>) {
        self.inputs.moving_mask = Some(path.into());
    }

    pub fn set_lower(&mut self, lower: f32) {
        self.config.extraction.lower = lower;
    }

    pub fn set_upper(&mut self, upper: f32) {
        self.config.extraction.upper = upper;
    }

    pub fn set_default_pixel_value(&mut self, value: f32) {
        self.config.default_pixel_value = value;
    }

    pub fn set_radius(&mut self, radius: [usize; 3]) {
        self.config.extraction.radius = radius;
    }

    pub fn set_seed(&mut self, seed: [usize; 3]) {
        self.config.extraction.seed = seed;
    }

    pub fn set_median_filter_size(&mut self, radius: [usize; 3]) {
        self.config.extraction.median_radius = radius;
    }

    pub fn set_use_histogram_matching(&mut self, enabled: bool) {
        self.config.histogram_matching.enabled = enabled;
    }

    pub fn set_number_of_histogram_levels(&mut self, levels: usize) {
        self.config.histogram_matching.levels = levels;
    }

    pub fn set_number_of_match_points(&mut self, match_points: usize) {
        self.config.histogram_matching.match_points = match_points;
    }

    pub fn set_interpolation(&mut self, interpolation: InterpolationKind) {
        self.config.interpolation = interpolation;
    }

    pub fn set_out_debug(&mut self, debug: bool) {
        self.config.debug = debug;
    }

    /// Replace every setting at once.
    pub fn set_config(&mut self, config: PreprocessorConfig) {
        self.config = config;
    }

    pub fn set_progress_callback(&mut self, callback: Arc<dyn ProgressCallback>) {
        self.progress_callback = Some(callback);
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    pub fn inputs(&self) -> &PreprocessInputs<B> {
        &self.inputs
    }

    /// Run the pipeline and publish its outputs.
    pub fn execute(&mut self) -> Result<()> {
        let mut tracker = ProgressTracker::with_callback(self.progress_callback.clone());
        let output = preprocess(&self.inputs, &self.config, &self.loader, &mut tracker)?;
        self.output = Some(output);
        Ok(())
    }

    /// Outputs of the last successful run.
    pub fn output(&self) -> Option<&PreprocessOutput<B>> {
        self.output.as_ref()
    }

    pub fn output_fixed_image(&self) -> Option<&Image<B, 3>> {
        self.output.as_ref().map(|o| &o.fixed)
    }

    pub fn output_moving_image(&self) -> Option<&Image<B, 3>> {
        self.output.as_ref().map(|o| &o.moving)
    }

    pub fn unnormalized_fixed_image(&self) -> Option<&Image<B, 3>> {
        self.output.as_ref().map(|o| &o.unnormalized_fixed)
    }

    pub fn unnormalized_moving_image(&self) -> Option<&Image<B, 3>> {
        self.output.as_ref().map(|o| &o.unnormalized_moving)
    }

    pub fn fixed_image_minimum(&self) -> Option<f32> {
        self.output.as_ref().map(|o| o.fixed_minimum)
    }

    pub fn moving_image_minimum(&self) -> Option<f32> {
        self.output.as_ref().map(|o| o.moving_minimum)
    }

    pub fn initial_displacement_field(&self) -> Option<&DisplacementField<B>> {
        self.output.as_ref().and_then(|o| o.initial_displacement_field.as_ref())
    }
}
