// src/core/detector.rs
//
// The detection engine: tier cascade, shoulder stage, and unification.
// Pure and reentrant; every threshold lives in the per-call config.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{TierParams, TierPreset};
use crate::detection::{Feature, FeatureSet, FeatureStats};

use super::analysis::{detect_peaks, detect_shoulders, PeakCandidate, ShoulderParams};
use super::error::AnalysisError;
use super::signal::{Signal, SmoothingConfig};

/// How the classical tier is chosen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TierSelection {
    /// Run exactly one named tier.
    Fixed(TierPreset),
    /// Run a caller-supplied parameter set.
    Custom(TierParams),
    /// Walk the cascade from strict to permissive until enough
    /// features turn up.
    Adaptive,
}

/// Per-call detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    pub tier: TierSelection,
    /// Cap on the unified feature list; kept by wavelength order, not
    /// by strength. `None` means unlimited.
    pub max_features: Option<usize>,
    /// Run the shoulder stage after the classical stage.
    pub detect_shoulders: bool,
    /// Let the adaptive cascade fall through to force-detect.
    pub allow_force_detect: bool,
    /// Wavelength radius treated as "the same feature" when merging
    /// classical and shoulder results.
    pub exclusion_tolerance: f64,
    /// Minimum normalized curvature for a shoulder, in (0, 1].
    pub shoulder_sensitivity: f64,
    /// Minimum wavelength distance between accepted shoulders.
    pub min_shoulder_separation: f64,
    /// Cap on shoulders entering unification.
    pub max_shoulders: usize,
    /// Moving-average window for the shoulder derivative stage; below 2
    /// disables it.
    pub shoulder_smooth_window: usize,
    /// Optional smoothing applied during signal preparation.
    pub smoothing: Option<SmoothingConfig>,
    /// Emit per-tier diagnostics through the `log` facade.
    pub debug: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            tier: TierSelection::Adaptive,
            max_features: Some(3),
            detect_shoulders: true,
            allow_force_detect: true,
            exclusion_tolerance: 6.0,
            shoulder_sensitivity: 0.1,
            min_shoulder_separation: 2.0,
            max_shoulders: 5,
            shoulder_smooth_window: 5,
            smoothing: None,
            debug: false,
        }
    }
}

impl DetectionConfig {
    /// Fail fast on malformed configuration, naming the offending
    /// parameter.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        match &self.tier {
            TierSelection::Fixed(preset) => TierParams::for_preset(*preset).validate()?,
            TierSelection::Custom(params) => params.validate()?,
            TierSelection::Adaptive => {}
        }
        if self.max_features == Some(0) {
            return Err(AnalysisError::parameter(
                "max_features",
                "a cap of 0 features leaves nothing to report; use None for unlimited".to_string(),
            ));
        }
        if !self.exclusion_tolerance.is_finite() || self.exclusion_tolerance < 0.0 {
            return Err(AnalysisError::parameter(
                "exclusion_tolerance",
                format!("{} must be finite and non-negative", self.exclusion_tolerance),
            ));
        }
        if !self.shoulder_sensitivity.is_finite()
            || self.shoulder_sensitivity <= 0.0
            || self.shoulder_sensitivity > 1.0
        {
            return Err(AnalysisError::parameter(
                "shoulder_sensitivity",
                format!("{} is outside (0, 1]", self.shoulder_sensitivity),
            ));
        }
        if !self.min_shoulder_separation.is_finite() || self.min_shoulder_separation < 0.0 {
            return Err(AnalysisError::parameter(
                "min_shoulder_separation",
                format!("{} must be finite and non-negative", self.min_shoulder_separation),
            ));
        }
        if self.detect_shoulders && self.max_shoulders == 0 {
            return Err(AnalysisError::parameter(
                "max_shoulders",
                "must be at least 1 when shoulder detection is enabled".to_string(),
            ));
        }
        if let Some(smoothing) = self.smoothing {
            smoothing.validate()?;
        }
        Ok(())
    }

    fn shoulder_params(&self) -> ShoulderParams {
        ShoulderParams {
            sensitivity: self.shoulder_sensitivity,
            exclusion_tolerance: self.exclusion_tolerance,
            min_separation: self.min_shoulder_separation,
            max_shoulders: self.max_shoulders,
            smooth_window: self.shoulder_smooth_window,
        }
    }
}

/// Complete analysis result for one spectrum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpectrumReport {
    pub features: FeatureSet,
    pub stats: FeatureStats,
    /// Preset that produced the classical features; `None` for a custom
    /// parameter set or when no tier found anything.
    pub tier_used: Option<TierPreset>,
    pub sample_count: usize,
    pub wavelength_range: (f64, f64),
    pub intensity_range: (f64, f64),
}

impl SpectrumReport {
    /// Drop the feature with the given label and renumber the rest.
    /// Unknown labels are a no-op; detection never re-runs.
    pub fn remove_feature(&mut self, label: usize) -> bool {
        let removed = self.features.remove(label);
        if removed {
            self.stats = self.features.stats();
        }
        removed
    }
}

/// Analyze one spectrum end to end: prepare, detect classical peaks,
/// detect shoulders around them, unify, and summarize.
///
/// An empty feature list is a legitimate outcome; only an unusable
/// signal or a malformed configuration is an error.
pub fn analyze_spectrum(
    rows: &[(f64, f64)],
    config: &DetectionConfig,
) -> Result<SpectrumReport, AnalysisError> {
    config.validate()?;
    let signal = Signal::prepare(rows, config.smoothing)?;

    let (peaks, tier_used) = run_classical_stage(&signal, config);
    let classical: Vec<Feature> = peaks
        .iter()
        .map(|p| Feature::classical(p.wavelength, p.intensity, p.prominence))
        .collect();

    let shoulders: Vec<Feature> = if config.detect_shoulders {
        let claimed: Vec<f64> = peaks.iter().map(|p| p.wavelength).collect();
        detect_shoulders(&signal, &claimed, &config.shoulder_params())
            .into_iter()
            .map(|s| Feature::shoulder(s.wavelength, s.intensity, s.prominence))
            .collect()
    } else {
        Vec::new()
    };

    if config.debug {
        debug!(
            "unifying {} classical feature(s) with {} shoulder(s)",
            classical.len(),
            shoulders.len()
        );
    }

    let features = FeatureSet::unify(
        classical,
        shoulders,
        config.max_features,
        config.exclusion_tolerance,
    );
    let stats = features.stats();

    Ok(SpectrumReport {
        stats,
        tier_used,
        sample_count: signal.len(),
        wavelength_range: signal.wavelength_range(),
        intensity_range: signal.intensity_range(),
        features,
    })
}

/// Classical stage: one fixed pass, or the adaptive cascade.
///
/// The adaptive walk keeps the best tier seen so far and stops as soon
/// as the desired count is reached; a tier finding nothing is expected
/// control flow, not a failure.
fn run_classical_stage(
    signal: &Signal,
    config: &DetectionConfig,
) -> (Vec<PeakCandidate>, Option<TierPreset>) {
    match &config.tier {
        TierSelection::Fixed(preset) => {
            let peaks = detect_peaks(signal, &TierParams::for_preset(*preset));
            let used = (!peaks.is_empty()).then_some(*preset);
            (peaks, used)
        }
        TierSelection::Custom(params) => (detect_peaks(signal, params), None),
        TierSelection::Adaptive => {
            let target = config.max_features.unwrap_or(1);
            let mut best: Vec<PeakCandidate> = Vec::new();
            let mut best_tier = None;

            for preset in TierPreset::cascade() {
                if preset == TierPreset::ForceDetect && !config.allow_force_detect {
                    break;
                }
                let found = detect_peaks(signal, &TierParams::for_preset(preset));
                if config.debug {
                    debug!("{} tier found {} peak(s)", preset.name(), found.len());
                }
                if found.len() > best.len() {
                    best = found;
                    best_tier = Some(preset);
                }
                if best.len() >= target {
                    break;
                }
            }

            (best, best_tier)
        }
    }
}
