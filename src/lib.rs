//! SpectraCheckr - Peak and shoulder detection for fluorescence spectra
//!
//! Analyzes a single emission/excitation spectrum and reports a small,
//! de-duplicated, wavelength-ordered list of labeled features. A feature
//! is either a classical local maximum or a shoulder: an inflection on a
//! monotonic slope marking a secondary spectral component that never
//! becomes a maximum of its own.
//!
//! ## Features
//!
//! - **Cascading sensitivity tiers**: strict defaults first, relaxing
//!   automatically until enough peaks turn up
//! - **Derivative shoulder detection**: curvature extrema on monotonic
//!   slopes, kept out of regions already claimed by classical peaks
//! - **Unified feature list**: one wavelength-ordered, P1..PN-labeled
//!   list with near-duplicate positions removed
//! - **Remove-and-relabel**: dropping a feature renumbers the rest
//!   without re-running detection
//! - **CSV in, CSV out**: two-column signal loader and a one-decimal
//!   feature table exporter
//!
//! ## Module Structure
//!
//! - `core` - Signal preparation and detection algorithms
//! - `cli` - Command-line interface
//! - `config` - Sensitivity tiers and their parameters
//! - `detection` - Unified feature records and statistics
//! - `export` - CSV surfaces
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spectracheckr::core::{analyze_spectrum, DetectionConfig};
//!
//! let rows = vec![(350.0, 10.0), (360.0, 20.0), (370.0, 12.0)];
//! let report = analyze_spectrum(&rows, &DetectionConfig::default())?;
//!
//! for feature in report.features.iter() {
//!     println!("{}: {:.1} nm", feature.display_label(), feature.wavelength);
//! }
//! ```
//!
//! ## Detection Tiers
//!
//! | Tier           | Prominence floor         | Min distance | Use when                  |
//! |----------------|--------------------------|--------------|---------------------------|
//! | Standard       | 1% of span               | 3 samples    | Clean spectra             |
//! | Sensitive      | 0.5% of span             | 2 samples    | Weak secondary peaks      |
//! | UltraSensitive | 0.1% of span, 0.5 floor  | 1 sample     | Very weak features        |
//! | ForceDetect    | none                     | 1 sample     | Last resort, noise-prone  |
//!
//! Every threshold is a tunable default carried in the tier's parameter
//! value, not a constant baked into the algorithms.

// Core analysis functionality
pub mod core;

// Command-line interface
pub mod cli;

// Configuration and tiers
pub mod config;

// Detection result types
pub mod detection;

// CSV import/export
pub mod export;

// Re-export commonly used types at crate root for convenience
pub use config::{TierParams, TierPreset};
pub use crate::core::{
    analyze_spectrum, AnalysisError, DetectionConfig, Sample, Signal, SmoothingConfig,
    SpectrumReport, TierSelection,
};
pub use detection::{Feature, FeatureKind, FeatureSet, FeatureStats};
