// src/core/analysis/shoulders.rs
//
// Shoulder detection: curvature extrema on monotonic slopes, found from
// first/second derivatives. Runs as the second pipeline stage, after the
// classical detector has claimed its exclusion zones.

use crate::core::dsp::{gradient, moving_average};
use crate::core::signal::Signal;

/// Parameters for one shoulder-detection pass.
#[derive(Debug, Clone)]
pub struct ShoulderParams {
    /// Minimum normalized curvature magnitude, in (0, 1].
    pub sensitivity: f64,
    /// Wavelength radius around each classical feature where shoulder
    /// candidates are discarded.
    pub exclusion_tolerance: f64,
    /// Minimum wavelength distance between accepted shoulders; the
    /// stronger curvature wins.
    pub min_separation: f64,
    /// Cap on accepted shoulders, strongest kept.
    pub max_shoulders: usize,
    /// Moving-average window applied before differentiating. Values
    /// below 2 disable the pre-smoothing.
    pub smooth_window: usize,
}

impl Default for ShoulderParams {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            exclusion_tolerance: 6.0,
            min_separation: 2.0,
            max_shoulders: 5,
            smooth_window: 5,
        }
    }
}

/// A shoulder accepted by the detector. `prominence` is the curvature
/// magnitude normalized to the strongest curvature in the signal.
#[derive(Debug, Clone, Copy)]
pub struct ShoulderCandidate {
    pub index: usize,
    pub wavelength: f64,
    pub intensity: f64,
    pub prominence: f64,
}

/// Find shoulders in a prepared signal, skipping wavelengths claimed by
/// classical features.
///
/// A signal too short to differentiate twice yields no shoulders, not
/// an error.
pub fn detect_shoulders(
    signal: &Signal,
    claimed: &[f64],
    params: &ShoulderParams,
) -> Vec<ShoulderCandidate> {
    let n = signal.len();
    if n < 3 {
        return Vec::new();
    }

    let wavelengths = signal.wavelengths();
    // Differentiate a lightly smoothed trace; report intensities from
    // the prepared signal itself.
    let smoothed = moving_average(signal.intensities(), params.smooth_window);
    let slope = gradient(&smoothed, wavelengths);
    let curvature = gradient(&slope, wavelengths);

    let magnitude: Vec<f64> = curvature.iter().map(|c| c.abs()).collect();
    let strongest = magnitude.iter().fold(0.0f64, |a, &b| a.max(b));
    if strongest <= 0.0 {
        return Vec::new();
    }

    let mut candidates: Vec<ShoulderCandidate> = Vec::new();
    for i in 1..n - 1 {
        if !is_magnitude_extremum(&magnitude, i) {
            continue;
        }
        // The slope must not cross zero through this point: a true
        // peak or valley belongs to the classical detector.
        if slope[i - 1] * slope[i + 1] <= 0.0 {
            continue;
        }

        let normalized = magnitude[i] / strongest;
        if normalized < params.sensitivity {
            continue;
        }
        let wavelength = wavelengths[i];
        if claimed
            .iter()
            .any(|&c| (wavelength - c).abs() <= params.exclusion_tolerance)
        {
            continue;
        }

        candidates.push(ShoulderCandidate {
            index: i,
            wavelength,
            intensity: signal.intensities()[i],
            prominence: normalized,
        });
    }

    select_strongest(candidates, params)
}

/// Local extremum of the curvature magnitude, tolerating one flat
/// neighbor but not plateau interiors.
fn is_magnitude_extremum(magnitude: &[f64], i: usize) -> bool {
    magnitude[i] >= magnitude[i - 1]
        && magnitude[i] >= magnitude[i + 1]
        && (magnitude[i] > magnitude[i - 1] || magnitude[i] > magnitude[i + 1])
}

/// Keep the strongest candidates at least `min_separation` apart, capped
/// at `max_shoulders`, returned in wavelength order.
fn select_strongest(
    mut candidates: Vec<ShoulderCandidate>,
    params: &ShoulderParams,
) -> Vec<ShoulderCandidate> {
    candidates.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));

    let mut selected: Vec<ShoulderCandidate> = Vec::new();
    for candidate in candidates {
        if selected.len() >= params.max_shoulders {
            break;
        }
        let crowded = selected
            .iter()
            .any(|s| (s.wavelength - candidate.wavelength).abs() < params.min_separation);
        if !crowded {
            selected.push(candidate);
        }
    }

    selected.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));
    selected
}
