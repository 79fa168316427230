//! The individual preprocessing stages.
//!
//! Each stage is a pure function of its inputs and configuration. The
//! orchestrator in [`crate::preprocess`] sequences them.

use burn::tensor::backend::Backend;
use demonprep_core::filter::{
    count_foreground, BinaryMedianFilter, BinaryThresholdFilter, HistogramMatchingFilter, MaskImageFilter,
    RegionConfirmFilter, ResampleImageFilter,
};
use demonprep_core::image::{Image, ImageGeometry};
use demonprep_core::interpolation::{InterpolationKind, LinearInterpolator, NearestNeighborInterpolator};
use demonprep_core::transform::IdentityTransform;
use crate::config::{ExtractionConfig, HistogramMatchingConfig};
use crate::error::Result;

/// Position of a run in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Uninitialized,
    GeometryReconciled,
    Extracted,
    Normalized,
    Done,
}

impl Stage {
    /// Completed fraction of a run once this stage is reached.
    pub fn fraction(self) -> f64 {
        match self {
            Stage::Uninitialized => 0.0,
            Stage::GeometryReconciled => 0.25,
            Stage::Extracted => 0.5,
            Stage::Normalized => 0.75,
            Stage::Done => 1.0,
        }
    }
}

fn resample_onto<B: Backend>(
    image: &Image<B, 3>,
    geometry: ImageGeometry<3>,
    interpolation: InterpolationKind,
    fill: f32,
) -> Result<Image<B, 3>> {
    let resampled = match interpolation {
        InterpolationKind::Linear => ResampleImageFilter::new(geometry, IdentityTransform, LinearInterpolator::new())
            .with_default_pixel_value(fill)
            .apply(image)?,
        InterpolationKind::NearestNeighbor => {
            ResampleImageFilter::new(geometry, IdentityTransform, NearestNeighborInterpolator::new())
                .with_default_pixel_value(fill)
                .apply(image)?
        }
    };
    Ok(resampled)
}

/// Bring `moving` onto the grid of `fixed`.
///
/// When the grids agree within tolerance the voxels are kept as they are and
/// the fixed placement is adopted exactly; otherwise
/// resamples through the identity transform, filling voxels that fall
/// outside the moving volume with `fill`.
pub fn reconcile_geometry<B: Backend>(
    fixed: &Image<B, 3>,
    moving: &Image<B, 3>,
    interpolation: InterpolationKind,
    fill: f32,
) -> Result<Image<B, 3>> {
    let target = fixed.geometry();
    if moving.geometry().matches(&target) {
        tracing::debug!("Moving volume already on the fixed grid");
        return Ok(Image::new(
            moving.data().clone(),
            target.origin,
            target.spacing,
            target.direction,
        ));
    }

    tracing::info!(
        "Resampling moving volume {:?} onto fixed grid {:?} ({:?})",
        moving.shape(),
        target.size,
        interpolation
    );
    resample_onto(moving, target, interpolation, fill)
}

/// Intermediate masks of one extraction, kept in debug mode.
#[derive(Debug, Clone)]
pub struct ExtractionDiagnostics<B: Backend> {
    /// Mask after the inclusive threshold.
    pub thresholded: Image<B, 3>,
    /// Component connected to the seed.
    pub confirmed: Image<B, 3>,
    /// Confirmed mask after the binary median.
    pub cleaned: Image<B, 3>,
    /// Voxels in the final mask.
    pub foreground_voxels: usize,
    pub is_empty: bool,
}

impl<B: Backend> ExtractionDiagnostics<B> {
    /// The three masks with stable names, in pipeline order.
    pub fn named_volumes(&self) -> [(&'static str, &Image<B, 3>); 3] {
        [
            ("thresholded", &self.thresholded),
            ("confirmed", &self.confirmed),
            ("cleaned", &self.cleaned),
        ]
    }
}

/// Result of [`extract_brain`].
#[derive(Debug, Clone)]
pub struct Extraction<B: Backend> {
    pub image: Image<B, 3>,
    pub diagnostics: Option<ExtractionDiagnostics<B>>,
}

/// Keep the tissue of `source` selected by `mask`.
///
/// Without a mask the source passes through unchanged. A mask on a different
/// grid is first resampled onto the source grid with nearest-neighbour
/// interpolation. Thresholding, region confirmation and the binary median then
/// produce the final mask, outside of which every voxel becomes
/// `default_pixel_value`.
pub fn extract_brain<B: Backend>(
    source: &Image<B, 3>,
    mask: Option<&Image<B, 3>>,
    config: &ExtractionConfig,
    default_pixel_value: f32,
    keep_diagnostics: bool,
) -> Result<Extraction<B>> {
    let Some(mask) = mask else {
        return Ok(Extraction {
            image: source.clone(),
            diagnostics: None,
        });
    };

    let geometry = source.geometry();
    let aligned;
    let mask = if mask.geometry().matches(&geometry) {
        mask
    } else {
        tracing::info!("Resampling mask {:?} onto source grid {:?}", mask.shape(), geometry.size);
        aligned = resample_onto(mask, geometry, InterpolationKind::NearestNeighbor, 0.0)?;
        &aligned
    };

    let thresholded = BinaryThresholdFilter::new(config.lower, config.upper)?.apply(mask);
    let confirmed = RegionConfirmFilter::new(config.seed, config.radius).apply(&thresholded)?;
    let cleaned = BinaryMedianFilter::new(config.median_radius).apply(&confirmed)?;

    let foreground_voxels = count_foreground(&cleaned);
    let is_empty = foreground_voxels == 0;
    if is_empty {
        tracing::warn!(
            "Extraction mask is empty (seed {:?}, threshold [{}, {}]); output is all background",
            config.seed,
            config.lower,
            config.upper
        );
    } else {
        tracing::debug!("Extraction kept {} of {} voxels", foreground_voxels, geometry.num_voxels());
    }

    let image = MaskImageFilter::new(default_pixel_value).apply(source, &cleaned)?;
    let diagnostics = keep_diagnostics.then(|| ExtractionDiagnostics {
        thresholded,
        confirmed,
        cleaned,
        foreground_voxels,
        is_empty,
    });

    Ok(Extraction { image, diagnostics })
}

/// Match the tissue histogram of `target` to `reference`.
///
/// Voxels equal to `background` are excluded from both histograms and left
/// untouched. Returns `target` unchanged when matching is disabled.
pub fn match_histograms<B: Backend>(
    reference: &Image<B, 3>,
    target: &Image<B, 3>,
    config: &HistogramMatchingConfig,
    background: f32,
) -> Result<Image<B, 3>> {
    if !config.enabled {
        return Ok(target.clone());
    }

    let filter = HistogramMatchingFilter::new(config.levels, config.match_points)?.with_background(background);
    Ok(filter.apply(reference, target)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;
    use demonprep_core::spatial::{Point, Spacing};

    type TestBackend = NdArray<f32>;

    fn image(values: Vec<f32>, geometry: &ImageGeometry<3>) -> Image<TestBackend, 3> {
        Image::from_vec(values, geometry, &Default::default()).unwrap()
    }

    #[test]
    fn test_stage_fractions_increase() {
        let stages = [
            Stage::Uninitialized,
            Stage::GeometryReconciled,
            Stage::Extracted,
            Stage::Normalized,
            Stage::Done,
        ];
        for pair in stages.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].fraction() < pair[1].fraction());
        }
    }

    #[test]
    fn test_reconcile_matching_geometry_is_copy() {
        let geometry = ImageGeometry::default_for_size([2, 2, 2]);
        let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let fixed = image(vec![0.0; 8], &geometry);
        let moving = image(values.clone(), &geometry);

        let out = reconcile_geometry(&fixed, &moving, InterpolationKind::Linear, -1.0).unwrap();
        assert_eq!(out.to_vec().unwrap(), values);
    }

    #[test]
    fn test_reconcile_near_match_takes_fixed_placement() {
        let geometry = ImageGeometry::default_for_size([2, 2, 2]);
        let mut nearly = geometry;
        nearly.origin = Point::new([5e-7, 0.0, 0.0]);
        nearly.spacing = Spacing::new([1.0 + 5e-7, 1.0, 1.0]);
        let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let fixed = image(vec![0.0; 8], &geometry);
        let moving = image(values.clone(), &nearly);

        let out = reconcile_geometry(&fixed, &moving, InterpolationKind::Linear, -1.0).unwrap();
        assert_eq!(out.geometry(), fixed.geometry());
        assert_eq!(out.to_vec().unwrap(), values);
    }

    #[test]
    fn test_reconcile_resamples_onto_fixed_grid() {
        let fixed_geometry = ImageGeometry::default_for_size([1, 1, 4]);
        let mut moving_geometry = ImageGeometry::default_for_size([1, 1, 2]);
        moving_geometry.origin = Point::new([1.0, 0.0, 0.0]);

        let fixed = image(vec![0.0; 4], &fixed_geometry);
        let moving = image(vec![10.0, 20.0], &moving_geometry);

        let out = reconcile_geometry(&fixed, &moving, InterpolationKind::NearestNeighbor, -1.0).unwrap();
        assert!(out.geometry().matches(&fixed_geometry));
        assert_eq!(out.to_vec().unwrap(), vec![-1.0, 10.0, 20.0, -1.0]);
    }

    #[test]
    fn test_extract_without_mask_passes_through() {
        let geometry = ImageGeometry::default_for_size([1, 1, 3]);
        let source = image(vec![1.0, 2.0, 3.0], &geometry);
        let out = extract_brain(&source, None, &ExtractionConfig::default(), 0.0, true).unwrap();
        assert_eq!(out.image.to_vec().unwrap(), vec![1.0, 2.0, 3.0]);
        assert!(out.diagnostics.is_none());
    }

    #[test]
    fn test_extract_resamples_coarse_mask() {
        // Half-resolution mask; source voxels map to mask indices -0.25, 0.25, 0.75, 1.25
        let geometry = ImageGeometry::default_for_size([1, 1, 4]);
        let mut mask_geometry = ImageGeometry::default_for_size([1, 1, 2]);
        mask_geometry.spacing = Spacing::new([2.0, 1.0, 1.0]);
        mask_geometry.origin = Point::new([0.5, 0.0, 0.0]);

        let source = image(vec![5.0, 6.0, 7.0, 8.0], &geometry);
        let mask = image(vec![50.0, 0.0], &mask_geometry);
        let config = ExtractionConfig::default().with_threshold(1.0, 70.0);

        let out = extract_brain(&source, Some(&mask), &config, -9.0, true).unwrap();
        assert_eq!(out.image.to_vec().unwrap(), vec![5.0, 6.0, -9.0, -9.0]);
        let diagnostics = out.diagnostics.unwrap();
        assert_eq!(diagnostics.foreground_voxels, 2);
        assert!(!diagnostics.is_empty);
    }

    #[test]
    fn test_extract_with_seed_on_background_is_empty() {
        let geometry = ImageGeometry::default_for_size([1, 1, 4]);
        let source = image(vec![5.0, 6.0, 7.0, 8.0], &geometry);
        let mask = image(vec![100.0, 50.0, 50.0, 50.0], &geometry);
        let config = ExtractionConfig::default().with_threshold(1.0, 70.0);

        let out = extract_brain(&source, Some(&mask), &config, 0.0, true).unwrap();
        assert_eq!(out.image.to_vec().unwrap(), vec![0.0; 4]);
        assert!(out.diagnostics.unwrap().is_empty);
    }

    #[test]
    fn test_match_disabled_returns_target() {
        let geometry = ImageGeometry::default_for_size([1, 1, 3]);
        let reference = image(vec![1.0, 2.0, 3.0], &geometry);
        let target = image(vec![10.0, 20.0, 30.0], &geometry);
        let out = match_histograms(&reference, &target, &HistogramMatchingConfig::disabled(), 0.0).unwrap();
        assert_eq!(out.to_vec().unwrap(), vec![10.0, 20.0, 30.0]);
    }
}
