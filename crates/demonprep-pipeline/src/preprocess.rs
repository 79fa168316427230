//! Stateless preprocessing entry point.
//!
//! [`preprocess`] validates everything it can before touching a voxel, then
//! runs geometry reconciliation, extraction and histogram matching in order.
//! Its output is returned as one value, so callers never observe a partially
//! completed run.

use std::path::{Path, PathBuf};
use burn::tensor::backend::Backend;
use demonprep_core::filter::minimum_intensity;
use demonprep_core::image::Image;
use demonprep_core::loader::MaskLoader;
use demonprep_core::transform::DisplacementField;
use crate::config::PreprocessorConfig;
use crate::error::{PreprocessError, Result};
use crate::progress::ProgressTracker;
use crate::stages::{self, ExtractionDiagnostics, Stage};

/// Volumes and mask locations for one run.
#[derive(Debug, Clone)]
pub struct PreprocessInputs<B: Backend> {
    pub fixed: Option<Image<B, 3>>,
    pub moving: Option<Image<B, 3>>,
    /// Passed through to the output untouched.
    pub initial_displacement_field: Option<DisplacementField<B>>,
    pub fixed_mask: Option<PathBuf>,
    pub moving_mask: Option<PathBuf>,
}

impl<B: Backend> Default for PreprocessInputs<B> {
    fn default() -> Self {
        Self {
            fixed: None,
            moving: None,
            initial_displacement_field: None,
            fixed_mask: None,
            moving_mask: None,
        }
    }
}

impl<B: Backend> PreprocessInputs<B> {
    pub fn new(fixed: Image<B, 3>, moving: Image<B, 3>) -> Self {
        Self {
            fixed: Some(fixed),
            moving: Some(moving),
            ..Self::default()
        }
    }

    pub fn with_fixed_mask(mut self, path: impl Into<PathBuf>) -> Self {
        self.fixed_mask = Some(path.into());
        self
    }

    pub fn with_moving_mask(mut self, path: impl Into<PathBuf>) -> Self {
        self.moving_mask = Some(path.into());
        self
    }

    pub fn with_initial_displacement_field(mut self, field: DisplacementField<B>) -> Self {
        self.initial_displacement_field = Some(field);
        self
    }
}

/// Debug masks for both volumes.
#[derive(Debug, Clone)]
pub struct PreprocessDiagnostics<B: Backend> {
    pub fixed: Option<ExtractionDiagnostics<B>>,
    pub moving: Option<ExtractionDiagnostics<B>>,
}

/// Everything a successful run publishes.
#[derive(Debug, Clone)]
pub struct PreprocessOutput<B: Backend> {
    /// Extracted fixed volume.
    pub fixed: Image<B, 3>,
    /// Reconciled, extracted and histogram-matched moving volume.
    pub moving: Image<B, 3>,
    /// Fixed volume after extraction.
    pub unnormalized_fixed: Image<B, 3>,
    /// Moving volume after extraction, before histogram matching.
    pub unnormalized_moving: Image<B, 3>,
    /// Minimum of the fixed input as supplied.
    pub fixed_minimum: f32,
    /// Minimum of the moving input as supplied.
    pub moving_minimum: f32,
    pub initial_displacement_field: Option<DisplacementField<B>>,
    /// Present when the configuration asks for debug output.
    pub diagnostics: Option<PreprocessDiagnostics<B>>,
}

fn load_mask<B: Backend, L: MaskLoader<B> + ?Sized>(loader: &L, path: Option<&Path>) -> Result<Option<Image<B, 3>>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let mask = loader.load_mask(path).map_err(|source| PreprocessError::MaskLoad {
        path: path.to_path_buf(),
        source,
    })?;
    mask.geometry()
        .validate()
        .map_err(|e| PreprocessError::invalid_geometry(format!("mask {}: {}", path.display(), e)))?;
    Ok(Some(mask))
}

/// Run the whole pipeline once.
///
/// Configuration, inputs, the seed and both masks are checked before any
/// voxel work starts. On success the tracker sees every stage in order and
/// `on_complete`; on failure it sees `on_error`.
pub fn preprocess<B, L>(
    inputs: &PreprocessInputs<B>,
    config: &PreprocessorConfig,
    loader: &L,
    progress: &mut ProgressTracker,
) -> Result<PreprocessOutput<B>>
where
    B: Backend,
    L: MaskLoader<B> + ?Sized,
{
    progress.start();
    let result = run(inputs, config, loader, progress);
    match &result {
        Ok(_) => progress.complete(),
        Err(e) => progress.error(&e.to_string()),
    }
    result
}

fn run<B, L>(
    inputs: &PreprocessInputs<B>,
    config: &PreprocessorConfig,
    loader: &L,
    progress: &ProgressTracker,
) -> Result<PreprocessOutput<B>>
where
    B: Backend,
    L: MaskLoader<B> + ?Sized,
{
    config.validate()?;

    let fixed = inputs
        .fixed
        .as_ref()
        .ok_or_else(|| PreprocessError::missing_input("fixed image"))?;
    let moving = inputs
        .moving
        .as_ref()
        .ok_or_else(|| PreprocessError::missing_input("moving image"))?;

    let fixed_geometry = fixed.geometry();
    fixed_geometry
        .validate()
        .map_err(|e| PreprocessError::invalid_geometry(format!("fixed image: {}", e)))?;
    moving
        .geometry()
        .validate()
        .map_err(|e| PreprocessError::invalid_geometry(format!("moving image: {}", e)))?;

    let seed = config.extraction.seed;
    if !fixed_geometry.contains_index(seed) {
        return Err(PreprocessError::SeedOutOfBounds {
            seed,
            size: [fixed_geometry.extent(0), fixed_geometry.extent(1), fixed_geometry.extent(2)],
        });
    }

    let fixed_mask = load_mask(loader, inputs.fixed_mask.as_deref())?;
    let moving_mask = load_mask(loader, inputs.moving_mask.as_deref())?;

    let fixed_minimum = minimum_intensity(fixed);
    let moving_minimum = minimum_intensity(moving);
    tracing::debug!("Input minima: fixed {}, moving {}", fixed_minimum, moving_minimum);

    let fill = config.default_pixel_value;
    let moving = stages::reconcile_geometry(fixed, moving, config.interpolation, fill)?;
    progress.update(Stage::GeometryReconciled);

    let keep = config.debug;
    let fixed_extraction = stages::extract_brain(fixed, fixed_mask.as_ref(), &config.extraction, fill, keep)?;
    let moving_extraction = stages::extract_brain(&moving, moving_mask.as_ref(), &config.extraction, fill, keep)?;
    progress.update(Stage::Extracted);

    let matched = stages::match_histograms(
        &fixed_extraction.image,
        &moving_extraction.image,
        &config.histogram_matching,
        fill,
    )?;
    progress.update(Stage::Normalized);

    let diagnostics = keep.then(|| PreprocessDiagnostics {
        fixed: fixed_extraction.diagnostics,
        moving: moving_extraction.diagnostics,
    });

    tracing::info!("Preprocessing finished on grid {:?}", fixed_geometry.size);
    progress.update(Stage::Done);

    Ok(PreprocessOutput {
        fixed: fixed_extraction.image.clone(),
        moving: matched,
        unnormalized_fixed: fixed_extraction.image,
        unnormalized_moving: moving_extraction.image,
        fixed_minimum,
        moving_minimum,
        initial_displacement_field: inputs.initial_displacement_field.clone(),
        diagnostics,
    })
}
