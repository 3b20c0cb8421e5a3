//! Unified feature records: merge, dedupe, ordering, and labels

use serde::{Deserialize, Serialize};

/// How a feature was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    /// A local intensity maximum that cleared a tier's thresholds.
    Classical,
    /// A curvature extremum on a monotonic slope.
    Shoulder,
}

impl FeatureKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Classical => "peak",
            Self::Shoulder => "shoulder",
        }
    }
}

/// One detected spectral feature. Value record: the unifier decides
/// inclusion and order but never edits wavelength or intensity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    /// 1-based position in the final wavelength-ordered list.
    pub label: usize,
    pub wavelength: f64,
    pub intensity: f64,
    pub kind: FeatureKind,
    /// Height above the bounding valleys (classical) or normalized
    /// curvature magnitude (shoulder). The two scales are never
    /// compared against each other.
    pub prominence: Option<f64>,
}

impl Feature {
    /// Unlabeled classical feature; the unifier assigns the label.
    pub fn classical(wavelength: f64, intensity: f64, prominence: f64) -> Self {
        Self {
            label: 0,
            wavelength,
            intensity,
            kind: FeatureKind::Classical,
            prominence: Some(prominence),
        }
    }

    /// Unlabeled shoulder feature; the unifier assigns the label.
    pub fn shoulder(wavelength: f64, intensity: f64, prominence: f64) -> Self {
        Self {
            label: 0,
            wavelength,
            intensity,
            kind: FeatureKind::Shoulder,
            prominence: Some(prominence),
        }
    }

    /// Display label in the spectrum's reading order: P1, P2, ...
    pub fn display_label(&self) -> String {
        format!("P{}", self.label)
    }
}

/// The unified, wavelength-ordered, labeled feature list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    features: Vec<Feature>,
}

impl FeatureSet {
    /// Merge classical and shoulder features into one ordered list.
    ///
    /// Sorting is by wavelength. Features within `dedup_tolerance` of an
    /// already-kept feature are dropped, classical beating shoulder and
    /// the higher intensity winning between equals. Truncation to
    /// `max_features` keeps the smallest wavelengths, never the
    /// strongest intensities. Labels are assigned last, P1..PN.
    pub fn unify(
        classical: Vec<Feature>,
        shoulders: Vec<Feature>,
        max_features: Option<usize>,
        dedup_tolerance: f64,
    ) -> Self {
        let mut merged: Vec<Feature> = classical.into_iter().chain(shoulders).collect();
        merged.sort_by(|a, b| a.wavelength.total_cmp(&b.wavelength));

        let mut kept: Vec<Feature> = Vec::with_capacity(merged.len());
        for feature in merged {
            if let Some(last) = kept.last() {
                if feature.wavelength - last.wavelength <= dedup_tolerance {
                    if wins_dedup(&feature, last) {
                        let i = kept.len() - 1;
                        kept[i] = feature;
                    }
                    continue;
                }
            }
            kept.push(feature);
        }

        if let Some(max) = max_features {
            kept.truncate(max);
        }

        let mut set = Self { features: kept };
        set.relabel();
        set
    }

    /// Remove the feature with the given label and close the gap in the
    /// numbering. Removing an unknown label is a no-op, so the operation
    /// is idempotent. Detection is never re-run.
    pub fn remove(&mut self, label: usize) -> bool {
        let before = self.features.len();
        self.features.retain(|f| f.label != label);
        let removed = self.features.len() != before;
        if removed {
            self.relabel();
        }
        removed
    }

    fn relabel(&mut self) {
        for (i, feature) in self.features.iter_mut().enumerate() {
            feature.label = i + 1;
        }
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Aggregate view over the current list. An empty list is a valid
    /// input and yields zero counts.
    pub fn stats(&self) -> FeatureStats {
        let total = self.features.len();
        let classical = self
            .features
            .iter()
            .filter(|f| f.kind == FeatureKind::Classical)
            .count();

        let intensities: Vec<f64> = self.features.iter().map(|f| f.intensity).collect();
        let (min_intensity, max_intensity, mean_intensity) = if intensities.is_empty() {
            (None, None, None)
        } else {
            let min = intensities.iter().fold(f64::INFINITY, |a, &b| a.min(b));
            let max = intensities.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
            let mean = intensities.iter().sum::<f64>() / intensities.len() as f64;
            (Some(min), Some(max), Some(mean))
        };

        let wavelength_span = match (self.features.first(), self.features.last()) {
            (Some(first), Some(last)) if total > 1 => Some(last.wavelength - first.wavelength),
            _ => None,
        };

        FeatureStats {
            total,
            classical,
            shoulders: total - classical,
            min_intensity,
            max_intensity,
            mean_intensity,
            wavelength_span,
        }
    }
}

/// Whether `challenger` replaces `incumbent` when the two land within
/// the dedup tolerance of each other.
fn wins_dedup(challenger: &Feature, incumbent: &Feature) -> bool {
    match (challenger.kind, incumbent.kind) {
        (FeatureKind::Classical, FeatureKind::Shoulder) => true,
        (FeatureKind::Shoulder, FeatureKind::Classical) => false,
        _ => challenger.intensity > incumbent.intensity,
    }
}

/// Descriptive values derived from a unified feature list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    pub total: usize,
    pub classical: usize,
    pub shoulders: usize,
    pub min_intensity: Option<f64>,
    pub max_intensity: Option<f64>,
    pub mean_intensity: Option<f64>,
    pub wavelength_span: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(classical: Vec<Feature>, shoulders: Vec<Feature>) -> FeatureSet {
        FeatureSet::unify(classical, shoulders, None, 0.0)
    }

    #[test]
    fn test_unify_orders_by_wavelength_and_labels() {
        let set = set(
            vec![
                Feature::classical(420.0, 50.0, 35.0),
                Feature::classical(360.0, 20.0, 10.0),
            ],
            vec![Feature::shoulder(390.0, 30.0, 0.8)],
        );
        let labels: Vec<(usize, f64)> = set.iter().map(|f| (f.label, f.wavelength)).collect();
        assert_eq!(labels, vec![(1, 360.0), (2, 390.0), (3, 420.0)]);
    }

    #[test]
    fn test_same_wavelength_prefers_classical() {
        let set = set(
            vec![Feature::classical(400.0, 25.0, 5.0)],
            vec![Feature::shoulder(400.0, 25.0, 0.9)],
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.features()[0].kind, FeatureKind::Classical);
    }

    #[test]
    fn test_dedup_tolerance_drops_near_duplicates() {
        let set = FeatureSet::unify(
            vec![Feature::classical(400.0, 25.0, 5.0)],
            vec![Feature::shoulder(403.0, 22.0, 0.9)],
            None,
            5.0,
        );
        assert_eq!(set.len(), 1);
        assert_eq!(set.features()[0].wavelength, 400.0);
    }

    #[test]
    fn test_truncation_keeps_smallest_wavelengths() {
        // The strongest feature sits at the long-wavelength end; the cap
        // must drop it anyway.
        let set = FeatureSet::unify(
            vec![
                Feature::classical(350.0, 5.0, 1.0),
                Feature::classical(400.0, 8.0, 2.0),
                Feature::classical(450.0, 500.0, 400.0),
            ],
            Vec::new(),
            Some(2),
            0.0,
        );
        let wavelengths: Vec<f64> = set.iter().map(|f| f.wavelength).collect();
        assert_eq!(wavelengths, vec![350.0, 400.0]);
    }

    #[test]
    fn test_remove_relabels_contiguously() {
        let mut set = set(
            vec![
                Feature::classical(350.0, 5.0, 1.0),
                Feature::classical(400.0, 8.0, 2.0),
                Feature::classical(450.0, 9.0, 3.0),
            ],
            Vec::new(),
        );
        assert!(set.remove(2));
        let labels: Vec<(usize, f64)> = set.iter().map(|f| (f.label, f.wavelength)).collect();
        assert_eq!(labels, vec![(1, 350.0), (2, 450.0)]);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut set = set(
            vec![
                Feature::classical(350.0, 5.0, 1.0),
                Feature::classical(400.0, 8.0, 2.0),
            ],
            Vec::new(),
        );
        assert!(set.remove(2));
        assert!(!set.remove(2));
        assert_eq!(set.len(), 1);
        assert_eq!(set.features()[0].label, 1);
    }

    #[test]
    fn test_stats_counts_by_kind() {
        let set = set(
            vec![
                Feature::classical(360.0, 20.0, 10.0),
                Feature::classical(420.0, 50.0, 35.0),
            ],
            vec![Feature::shoulder(390.0, 30.0, 0.8)],
        );
        let stats = set.stats();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.classical, 2);
        assert_eq!(stats.shoulders, 1);
        assert_eq!(stats.max_intensity, Some(50.0));
        assert_eq!(stats.wavelength_span, Some(60.0));
    }

    #[test]
    fn test_stats_on_empty_set() {
        let stats = FeatureSet::default().stats();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.classical, 0);
        assert_eq!(stats.shoulders, 0);
        assert!(stats.mean_intensity.is_none());
    }
}
