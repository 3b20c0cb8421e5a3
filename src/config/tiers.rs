// src/config/tiers.rs
//
// Detection sensitivity tiers. Tiers are immutable parameter values tried
// in a fixed order by the cascade in core::detector; every threshold here
// is a tunable default, not a constant anyone should treat as exact.

use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;

/// Named sensitivity tiers, ordered from strict to permissive.
///
/// The ordering is monotonic: any maximum accepted under a stricter tier
/// is also accepted under every more permissive one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierPreset {
    /// Balanced defaults for clean spectra
    Standard,
    /// Halved prominence, peaks may sit one sample apart
    Sensitive,
    /// Near-floor prominence with an absolute floor against pure noise
    UltraSensitive,
    /// Last resort: any local maximum counts. Noise-prone.
    ForceDetect,
}

impl TierPreset {
    /// Cascade order, strict first.
    pub fn cascade() -> [TierPreset; 4] {
        [
            Self::Standard,
            Self::Sensitive,
            Self::UltraSensitive,
            Self::ForceDetect,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Sensitive => "sensitive",
            Self::UltraSensitive => "ultra-sensitive",
            Self::ForceDetect => "force-detect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "standard" => Some(Self::Standard),
            "sensitive" => Some(Self::Sensitive),
            "ultra" | "ultra-sensitive" | "ultrasensitive" => Some(Self::UltraSensitive),
            "force" | "force-detect" | "forcedetect" => Some(Self::ForceDetect),
            _ => None,
        }
    }
}

/// Parameter set for one classical-detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierParams {
    /// Minimum prominence as a fraction of the intensity span.
    /// `None` removes the prominence constraint entirely (force-detect).
    pub rel_prominence: Option<f64>,
    /// Absolute prominence floor in intensity units, applied on top of
    /// the relative threshold.
    pub min_prominence_abs: f64,
    /// Minimum index distance between accepted maxima. When two maxima
    /// are closer, the higher one wins.
    pub min_distance: usize,
    /// Intensity quantile the height floor starts from.
    pub height_quantile: f64,
    /// Margin above the quantile, as a fraction of the intensity span.
    pub height_margin: f64,
}

impl TierParams {
    pub fn for_preset(preset: TierPreset) -> Self {
        match preset {
            TierPreset::Standard => Self {
                rel_prominence: Some(0.01),
                min_prominence_abs: 0.5,
                min_distance: 3,
                height_quantile: 0.05,
                height_margin: 0.005,
            },
            TierPreset::Sensitive => Self {
                rel_prominence: Some(0.005),
                min_prominence_abs: 0.5,
                min_distance: 2,
                height_quantile: 0.05,
                height_margin: 0.002,
            },
            TierPreset::UltraSensitive => Self {
                rel_prominence: Some(0.001),
                min_prominence_abs: 0.5,
                min_distance: 1,
                height_quantile: 0.0,
                height_margin: 0.0005,
            },
            TierPreset::ForceDetect => Self {
                rel_prominence: None,
                min_prominence_abs: 0.0,
                min_distance: 1,
                height_quantile: 0.0,
                height_margin: 0.0,
            },
        }
    }

    /// Reject malformed parameter sets before any detection runs.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if let Some(rel) = self.rel_prominence {
            if !rel.is_finite() || !(0.0..=1.0).contains(&rel) {
                return Err(AnalysisError::parameter(
                    "tier.rel_prominence",
                    format!("{rel} is outside [0, 1]"),
                ));
            }
        }
        if !self.min_prominence_abs.is_finite() || self.min_prominence_abs < 0.0 {
            return Err(AnalysisError::parameter(
                "tier.min_prominence_abs",
                format!("{} must be finite and non-negative", self.min_prominence_abs),
            ));
        }
        if self.min_distance < 1 {
            return Err(AnalysisError::parameter(
                "tier.min_distance",
                "must be at least 1 sample".to_string(),
            ));
        }
        if !self.height_quantile.is_finite() || !(0.0..=1.0).contains(&self.height_quantile) {
            return Err(AnalysisError::parameter(
                "tier.height_quantile",
                format!("{} is outside [0, 1]", self.height_quantile),
            ));
        }
        if !self.height_margin.is_finite() || self.height_margin < 0.0 {
            return Err(AnalysisError::parameter(
                "tier.height_margin",
                format!("{} must be finite and non-negative", self.height_margin),
            ));
        }
        Ok(())
    }

    /// Effective prominence threshold for a signal with the given
    /// intensity span, or `None` when the constraint is disabled.
    pub fn prominence_threshold(&self, intensity_span: f64) -> Option<f64> {
        self.rel_prominence
            .map(|rel| (rel * intensity_span).max(self.min_prominence_abs))
    }
}
