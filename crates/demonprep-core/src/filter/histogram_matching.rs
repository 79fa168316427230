//! Histogram matching between two intensity volumes.
//!
//! Tissue intensities of a target volume are remapped so that their quantiles
//! line up with those of a reference volume. Quantile landmarks are joined by
//! a piecewise-linear transfer function which is then applied voxelwise.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use rayon::prelude::*;
use crate::error::{ImageError, Result};
use crate::image::Image;

/// Fixed-width histogram over the range of a set of samples.
#[derive(Debug, Clone)]
pub struct IntensityHistogram {
    min: f64,
    max: f64,
    counts: Vec<u64>,
    total: u64,
}

impl IntensityHistogram {
    /// Bin `values` into `levels` equal bins spanning `[min, max]`.
    ///
    /// Returns `None` when there are no samples or `levels` is zero.
    pub fn from_values(values: &[f32], levels: usize) -> Option<Self> {
        if values.is_empty() || levels == 0 {
            return None;
        }
        let (min, max) = values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            let v = v as f64;
            (lo.min(v), hi.max(v))
        });

        let mut counts = vec![0u64; levels];
        let width = (max - min) / levels as f64;
        for &v in values {
            let bin = if width > 0.0 {
                (((v as f64 - min) / width).floor() as usize).min(levels - 1)
            } else {
                0
            };
            counts[bin] += 1;
        }

        Some(Self {
            min,
            max,
            counts,
            total: values.len() as u64,
        })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// All samples share one value.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    /// Intensity below which a fraction `q` of the samples lie.
    ///
    /// Samples are assumed uniformly spread inside each bin.
    pub fn quantile(&self, q: f64) -> f64 {
        let q = q.clamp(0.0, 1.0);
        if q <= 0.0 {
            return self.min;
        }
        if q >= 1.0 {
            return self.max;
        }

        let wanted = q * self.total as f64;
        let width = self.bin_width();
        let mut below = 0.0;
        for (bin, &count) in self.counts.iter().enumerate() {
            let count = count as f64;
            if count > 0.0 && below + count >= wanted {
                let frac = (wanted - below) / count;
                return self.min + (bin as f64 + frac) * width;
            }
            below += count;
        }
        self.max
    }

    /// `[min, q_1 .. q_n, max]` with `q_j` at `j / (n + 1)`.
    pub fn landmarks(&self, match_points: usize) -> Vec<f64> {
        let mut marks = Vec::with_capacity(match_points + 2);
        marks.push(self.min);
        for j in 1..=match_points {
            marks.push(self.quantile(j as f64 / (match_points + 1) as f64));
        }
        marks.push(self.max);
        marks
    }
}

/// Monotone piecewise-linear intensity mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    source: Vec<f64>,
    target: Vec<f64>,
}

impl TransferFunction {
    pub fn identity() -> Self {
        Self {
            source: Vec::new(),
            target: Vec::new(),
        }
    }

    /// Join `source[i] -> target[i]` pairs with straight segments.
    ///
    /// Knots whose source does not strictly increase are dropped so no
    /// segment has zero width.
    pub fn from_landmarks(source: &[f64], target: &[f64]) -> Self {
        let mut knots_src: Vec<f64> = Vec::with_capacity(source.len());
        let mut knots_dst: Vec<f64> = Vec::with_capacity(source.len());
        for (&s, &t) in source.iter().zip(target) {
            if knots_src.last().map_or(true, |&last| s > last) {
                knots_src.push(s);
                knots_dst.push(t);
            }
        }
        if knots_src.len() < 2 {
            return Self::identity();
        }
        Self {
            source: knots_src,
            target: knots_dst,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.source.len() < 2
    }

    pub fn knots(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.source.iter().copied().zip(self.target.iter().copied())
    }

    /// Evaluate, extrapolating past either end with the end segment's slope.
    pub fn map(&self, value: f32) -> f32 {
        if self.is_identity() {
            return value;
        }
        let v = value as f64;
        let last = self.source.len() - 1;
        let seg = match self.source.iter().position(|&s| s > v) {
            Some(0) => 0,
            Some(i) => i - 1,
            None => last - 1,
        };
        let (s0, s1) = (self.source[seg], self.source[seg + 1]);
        let (t0, t1) = (self.target[seg], self.target[seg + 1]);
        (t0 + (v - s0) * (t1 - t0) / (s1 - s0)) as f32
    }
}

/// Matches the tissue histogram of a target volume to a reference volume.
///
/// Voxels equal to the background value (when one is set) are neither counted
/// nor remapped.
pub struct HistogramMatchingFilter<B: Backend> {
    levels: usize,
    match_points: usize,
    background: Option<f32>,
    _b: PhantomData<B>,
}

impl<B: Backend> HistogramMatchingFilter<B> {
    /// # Arguments
    /// * `levels` - Number of histogram bins, at least one
    /// * `match_points` - Number of interior quantile landmarks
    pub fn new(levels: usize, match_points: usize) -> Result<Self> {
        if levels == 0 {
            return Err(ImageError::invalid_parameter("histogram needs at least one level"));
        }
        Ok(Self {
            levels,
            match_points,
            background: None,
            _b: PhantomData,
        })
    }

    pub fn with_background(mut self, background: f32) -> Self {
        self.background = Some(background);
        self
    }

    fn tissue(&self, values: &[f32]) -> Vec<f32> {
        match self.background {
            Some(bg) => values.iter().copied().filter(|&v| v != bg).collect(),
            None => values.to_vec(),
        }
    }

    /// Transfer function taking target intensities to reference intensities.
    pub fn compute_transfer(&self, reference: &[f32], target: &[f32]) -> TransferFunction {
        let ref_hist = IntensityHistogram::from_values(&self.tissue(reference), self.levels);
        let tgt_hist = IntensityHistogram::from_values(&self.tissue(target), self.levels);

        match (ref_hist, tgt_hist) {
            (Some(r), Some(t)) if !r.is_degenerate() && !t.is_degenerate() => {
                let transfer = TransferFunction::from_landmarks(
                    &t.landmarks(self.match_points),
                    &r.landmarks(self.match_points),
                );
                tracing::debug!(
                    "Histogram transfer: target [{:.3}, {:.3}] -> reference [{:.3}, {:.3}]",
                    t.min(),
                    t.max(),
                    r.min(),
                    r.max()
                );
                transfer
            }
            _ => {
                tracing::warn!("Histogram matching skipped: empty or single-valued tissue range");
                TransferFunction::identity()
            }
        }
    }

    /// Remap `target` so its tissue histogram follows `reference`.
    pub fn apply(&self, reference: &Image<B, 3>, target: &Image<B, 3>) -> Result<Image<B, 3>> {
        let ref_values = reference.to_vec()?;
        let tgt_values = target.to_vec()?;
        let transfer = self.compute_transfer(&ref_values, &tgt_values);
        if transfer.is_identity() {
            return Ok(target.clone());
        }

        let background = self.background;
        let mapped: Vec<f32> = tgt_values
            .par_iter()
            .map(|&v| match background {
                Some(bg) if v == bg => v,
                _ => transfer.map(v),
            })
            .collect();

        target.with_values(mapped)
    }
}
