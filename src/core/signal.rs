// src/core/signal.rs
//
// Signal preparation: validates and canonicalizes raw two-column data
// before any detector sees it.

use serde::{Deserialize, Serialize};

use super::dsp::moving_average;
use super::error::AnalysisError;

/// One (wavelength, intensity) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub wavelength: f64,
    pub intensity: f64,
}

/// Optional low-pass smoothing applied during preparation.
///
/// Disabled by default; the window is a fixed configuration value,
/// never auto-derived.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmoothingConfig {
    /// Moving-average window in samples, at least 2.
    pub window: usize,
}

impl SmoothingConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.window < 2 {
            return Err(AnalysisError::parameter(
                "smoothing.window",
                format!("window of {} samples cannot smooth anything", self.window),
            ));
        }
        Ok(())
    }
}

/// A prepared signal: strictly increasing wavelengths, all values finite,
/// at least two samples, not flat.
#[derive(Debug, Clone)]
pub struct Signal {
    wavelengths: Vec<f64>,
    intensities: Vec<f64>,
}

impl Signal {
    /// Build a prepared signal from raw rows.
    ///
    /// Rows with a non-finite wavelength or intensity are dropped, the
    /// remainder is sorted by wavelength, and duplicate wavelengths keep
    /// their first occurrence (a documented policy, not an average).
    /// The caller's data is never modified.
    pub fn prepare(
        rows: &[(f64, f64)],
        smoothing: Option<SmoothingConfig>,
    ) -> Result<Self, AnalysisError> {
        if let Some(s) = smoothing {
            s.validate()?;
        }

        let mut samples: Vec<(f64, f64)> = rows
            .iter()
            .copied()
            .filter(|(w, i)| w.is_finite() && i.is_finite())
            .collect();

        samples.sort_by(|a, b| a.0.total_cmp(&b.0));
        samples.dedup_by(|next, kept| next.0 == kept.0);

        if samples.len() < 2 {
            return Err(AnalysisError::InvalidSignal(format!(
                "{} usable sample(s) after cleanup, at least 2 required",
                samples.len()
            )));
        }

        let wavelengths: Vec<f64> = samples.iter().map(|s| s.0).collect();
        let mut intensities: Vec<f64> = samples.iter().map(|s| s.1).collect();

        let (min, max) = intensity_bounds(&intensities);
        if min == max {
            return Err(AnalysisError::InvalidSignal(format!(
                "flat signal: all {} intensities equal {min}, no peak is distinguishable",
                intensities.len()
            )));
        }

        if let Some(s) = smoothing {
            intensities = moving_average(&intensities, s.window);
        }

        Ok(Self {
            wavelengths,
            intensities,
        })
    }

    pub fn len(&self) -> usize {
        self.wavelengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavelengths.is_empty()
    }

    pub fn wavelengths(&self) -> &[f64] {
        &self.wavelengths
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    pub fn sample(&self, index: usize) -> Sample {
        Sample {
            wavelength: self.wavelengths[index],
            intensity: self.intensities[index],
        }
    }

    pub fn wavelength_range(&self) -> (f64, f64) {
        (self.wavelengths[0], self.wavelengths[self.len() - 1])
    }

    pub fn intensity_range(&self) -> (f64, f64) {
        intensity_bounds(&self.intensities)
    }

    /// Max minus min intensity; the reference scale for relative thresholds.
    pub fn intensity_span(&self) -> f64 {
        let (min, max) = self.intensity_range();
        max - min
    }
}

fn intensity_bounds(intensities: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &i in intensities {
        min = min.min(i);
        max = max.max(i);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_sorts_and_drops_invalid_rows() {
        let rows = vec![
            (420.0, 50.0),
            (350.0, 10.0),
            (f64::NAN, 99.0),
            (360.0, f64::INFINITY),
            (360.0, 20.0),
        ];
        let signal = Signal::prepare(&rows, None).unwrap();
        assert_eq!(signal.wavelengths(), &[350.0, 360.0, 420.0]);
        assert_eq!(signal.intensities(), &[10.0, 20.0, 50.0]);
    }

    #[test]
    fn test_prepare_keeps_first_duplicate_wavelength() {
        let rows = vec![(350.0, 10.0), (360.0, 20.0), (360.0, 99.0)];
        let signal = Signal::prepare(&rows, None).unwrap();
        assert_eq!(signal.len(), 2);
        assert_eq!(signal.sample(1).intensity, 20.0);
    }

    #[test]
    fn test_prepare_rejects_short_signal() {
        let rows = vec![(350.0, 10.0)];
        let err = Signal::prepare(&rows, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSignal(_)));
    }

    #[test]
    fn test_prepare_rejects_flat_signal() {
        let rows = vec![(350.0, 5.0), (360.0, 5.0), (370.0, 5.0)];
        let err = Signal::prepare(&rows, None).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidSignal(_)));
    }

    #[test]
    fn test_prepare_rejects_degenerate_smoothing_window() {
        let rows = vec![(350.0, 10.0), (360.0, 20.0)];
        let err = Signal::prepare(&rows, Some(SmoothingConfig { window: 1 })).unwrap_err();
        match err {
            AnalysisError::InvalidParameter { name, .. } => {
                assert_eq!(name, "smoothing.window");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_prepare_smoothing_flattens_spikes() {
        let rows: Vec<(f64, f64)> = (0..9)
            .map(|i| (i as f64, if i == 4 { 100.0 } else { 10.0 }))
            .collect();
        let signal = Signal::prepare(&rows, Some(SmoothingConfig { window: 3 })).unwrap();
        assert!(signal.intensities()[4] < 100.0);
    }
}
