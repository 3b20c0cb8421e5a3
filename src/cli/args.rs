//! CLI argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::config::TierPreset;
use crate::core::{DetectionConfig, SmoothingConfig, TierSelection};

#[derive(Parser, Debug)]
#[command(name = "spectracheckr")]
#[command(about = "Detect peaks and shoulders in a fluorescence spectrum")]
pub struct Args {
    /// Input CSV with wavelength and intensity columns
    #[arg(short, long)]
    pub input: PathBuf,

    /// Run a single tier (standard, sensitive, ultra, force) instead of
    /// the adaptive cascade
    #[arg(short, long)]
    pub tier: Option<String>,

    /// Maximum features to report, by wavelength order (0 = unlimited)
    #[arg(short, long, default_value = "3")]
    pub max_peaks: usize,

    /// Skip the shoulder detection stage
    #[arg(long)]
    pub no_shoulders: bool,

    /// Keep the adaptive cascade away from the noise-prone force-detect tier
    #[arg(long)]
    pub no_force_detect: bool,

    /// Moving-average window applied before detection (0 = off)
    #[arg(long, default_value = "0")]
    pub smooth: usize,

    /// Wavelength radius treated as the same feature when merging
    #[arg(long, default_value = "6.0")]
    pub exclusion_tolerance: f64,

    /// Shoulder sensitivity as a fraction of the curvature range
    #[arg(long, default_value = "0.1")]
    pub sensitivity: f64,

    /// Write the feature table to this CSV file
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Emit the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output with per-tier diagnostics
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Translate CLI flags into the engine configuration.
    ///
    /// An unknown tier name is reported here; numeric ranges are left to
    /// the engine's own validation so the error names the parameter.
    pub fn detection_config(&self) -> Result<DetectionConfig, String> {
        let tier = match &self.tier {
            Some(name) => {
                let preset = TierPreset::from_name(name)
                    .ok_or_else(|| format!("unknown tier `{name}`"))?;
                TierSelection::Fixed(preset)
            }
            None => TierSelection::Adaptive,
        };

        Ok(DetectionConfig {
            tier,
            max_features: (self.max_peaks > 0).then_some(self.max_peaks),
            detect_shoulders: !self.no_shoulders,
            allow_force_detect: !self.no_force_detect,
            exclusion_tolerance: self.exclusion_tolerance,
            shoulder_sensitivity: self.sensitivity,
            smoothing: (self.smooth > 0).then_some(SmoothingConfig {
                window: self.smooth,
            }),
            debug: self.verbose,
            ..DetectionConfig::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["spectracheckr", "--input", "spectrum.csv"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_defaults_use_adaptive_cascade() {
        let config = args(&[]).detection_config().unwrap();
        assert!(matches!(config.tier, TierSelection::Adaptive));
        assert_eq!(config.max_features, Some(3));
        assert!(config.detect_shoulders);
    }

    #[test]
    fn test_zero_max_peaks_means_unlimited() {
        let config = args(&["--max-peaks", "0"]).detection_config().unwrap();
        assert_eq!(config.max_features, None);
    }

    #[test]
    fn test_tier_name_is_resolved() {
        let config = args(&["--tier", "ultra"]).detection_config().unwrap();
        assert!(matches!(
            config.tier,
            TierSelection::Fixed(TierPreset::UltraSensitive)
        ));
    }

    #[test]
    fn test_unknown_tier_is_rejected() {
        assert!(args(&["--tier", "bogus"]).detection_config().is_err());
    }
}
