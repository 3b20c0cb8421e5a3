// src/core/analysis/peaks.rs
//
// Classical peak detection: plateau-tolerant local maxima filtered by
// height, distance, and windowed prominence.

use crate::config::TierParams;
use crate::core::dsp::quantile;
use crate::core::signal::Signal;

/// A classical maximum accepted by one detection pass.
#[derive(Debug, Clone, Copy)]
pub struct PeakCandidate {
    pub index: usize,
    pub wavelength: f64,
    pub intensity: f64,
    pub prominence: f64,
}

/// Run one classical detection pass over a prepared signal.
///
/// An empty result is a valid outcome, not an error.
pub fn detect_peaks(signal: &Signal, params: &TierParams) -> Vec<PeakCandidate> {
    let intensities = signal.intensities();
    let wavelengths = signal.wavelengths();
    let n = intensities.len();

    let (min_intensity, _) = signal.intensity_range();
    let span = signal.intensity_span();
    let height_floor =
        quantile(intensities, params.height_quantile).max(min_intensity) + params.height_margin * span;
    let prominence_floor = params.prominence_threshold(span);
    let wlen = (n / 6).clamp(11, 61);

    let mut candidates: Vec<PeakCandidate> = local_maxima(intensities)
        .into_iter()
        .filter(|&i| intensities[i] >= height_floor)
        .map(|i| PeakCandidate {
            index: i,
            wavelength: wavelengths[i],
            intensity: intensities[i],
            prominence: peak_prominence(intensities, i, wlen),
        })
        .collect();

    enforce_distance(&mut candidates, params.min_distance);

    if let Some(threshold) = prominence_floor {
        candidates.retain(|c| c.prominence >= threshold);
    }

    candidates
}

/// Interior local maxima, plateau-tolerant.
///
/// A flat top counts as one maximum at its first index; plateaus that
/// touch either signal edge are not maxima.
fn local_maxima(intensities: &[f64]) -> Vec<usize> {
    let n = intensities.len();
    let mut maxima = Vec::new();

    let mut i = 1;
    while i + 1 < n {
        if intensities[i] > intensities[i - 1] {
            let mut j = i;
            while j + 1 < n && intensities[j + 1] == intensities[i] {
                j += 1;
            }
            if j + 1 < n && intensities[j + 1] < intensities[i] {
                maxima.push(i);
            }
            i = j + 1;
        } else {
            i += 1;
        }
    }

    maxima
}

/// Prominence of a maximum: its height above the higher of the two
/// lowest points separating it from higher ground, searched within a
/// window of `wlen` samples.
fn peak_prominence(intensities: &[f64], peak: usize, wlen: usize) -> f64 {
    let half = wlen / 2;
    let lo = peak.saturating_sub(half);
    let hi = (peak + half).min(intensities.len() - 1);
    let height = intensities[peak];

    let mut left_min = height;
    for i in (lo..peak).rev() {
        if intensities[i] > height {
            break;
        }
        left_min = left_min.min(intensities[i]);
    }

    let mut right_min = height;
    for i in peak + 1..=hi {
        if intensities[i] > height {
            break;
        }
        right_min = right_min.min(intensities[i]);
    }

    height - left_min.max(right_min)
}

/// Drop maxima closer than `min_distance` samples to a higher accepted
/// maximum. Processes candidates from tallest to shortest, so the higher
/// peak always survives.
fn enforce_distance(candidates: &mut Vec<PeakCandidate>, min_distance: usize) {
    if min_distance <= 1 || candidates.len() < 2 {
        return;
    }

    let mut order: Vec<usize> = (0..candidates.len()).collect();
    order.sort_by(|&a, &b| candidates[b].intensity.total_cmp(&candidates[a].intensity));

    let mut keep = vec![true; candidates.len()];
    for &k in &order {
        if !keep[k] {
            continue;
        }
        for j in 0..candidates.len() {
            if j != k && keep[j] && candidates[j].index.abs_diff(candidates[k].index) < min_distance
            {
                keep[j] = false;
            }
        }
    }

    let mut idx = 0;
    candidates.retain(|_| {
        let kept = keep[idx];
        idx += 1;
        kept
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TierPreset;

    fn signal(rows: &[(f64, f64)]) -> Signal {
        Signal::prepare(rows, None).unwrap()
    }

    const TWO_PEAKS: [(f64, f64); 7] = [
        (350.0, 10.0),
        (360.0, 20.0),
        (370.0, 12.0),
        (375.0, 13.0),
        (380.0, 9.0),
        (420.0, 50.0),
        (430.0, 15.0),
    ];

    #[test]
    fn test_boundaries_are_never_maxima() {
        let y = [50.0, 10.0, 20.0, 10.0, 60.0];
        assert_eq!(local_maxima(&y), vec![2]);
    }

    #[test]
    fn test_plateau_counts_once_at_first_index() {
        let y = [1.0, 5.0, 5.0, 5.0, 2.0, 1.0];
        assert_eq!(local_maxima(&y), vec![1]);
    }

    #[test]
    fn test_plateau_touching_edge_is_not_a_maximum() {
        let y = [1.0, 5.0, 5.0];
        assert!(local_maxima(&y).is_empty());
    }

    #[test]
    fn test_prominence_uses_higher_base() {
        // Peak of 13 between a valley of 12 (left) and 9 (right).
        let y = [10.0, 20.0, 12.0, 13.0, 9.0, 50.0, 15.0];
        let p = peak_prominence(&y, 3, 11);
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_tier_finds_two_peaks() {
        let s = signal(&TWO_PEAKS);
        let peaks = detect_peaks(&s, &TierParams::for_preset(TierPreset::Standard));
        let wavelengths: Vec<f64> = peaks.iter().map(|p| p.wavelength).collect();
        assert_eq!(wavelengths, vec![360.0, 420.0]);
    }

    #[test]
    fn test_ultra_sensitive_adds_weak_rise() {
        let s = signal(&TWO_PEAKS);
        let peaks = detect_peaks(&s, &TierParams::for_preset(TierPreset::UltraSensitive));
        let wavelengths: Vec<f64> = peaks.iter().map(|p| p.wavelength).collect();
        assert_eq!(wavelengths, vec![360.0, 375.0, 420.0]);
    }

    #[test]
    fn test_relaxing_tiers_never_drops_a_peak() {
        let s = signal(&TWO_PEAKS);
        let mut previous: Vec<usize> = Vec::new();
        for preset in TierPreset::cascade() {
            let found: Vec<usize> = detect_peaks(&s, &TierParams::for_preset(preset))
                .iter()
                .map(|p| p.index)
                .collect();
            for idx in &previous {
                assert!(
                    found.contains(idx),
                    "{} lost the peak at index {idx}",
                    preset.name()
                );
            }
            previous = found;
        }
    }

    #[test]
    fn test_distance_pruning_keeps_higher_peak() {
        let mut candidates = vec![
            PeakCandidate {
                index: 3,
                wavelength: 375.0,
                intensity: 13.0,
                prominence: 1.0,
            },
            PeakCandidate {
                index: 5,
                wavelength: 420.0,
                intensity: 50.0,
                prominence: 35.0,
            },
        ];
        enforce_distance(&mut candidates, 3);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index, 5);
    }

    #[test]
    fn test_monotone_ramp_has_no_peaks() {
        let rows: Vec<(f64, f64)> = (0..20).map(|i| (i as f64, i as f64 * 2.0)).collect();
        let s = signal(&rows);
        for preset in TierPreset::cascade() {
            assert!(detect_peaks(&s, &TierParams::for_preset(preset)).is_empty());
        }
    }
}
