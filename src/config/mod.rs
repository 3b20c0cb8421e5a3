//! Configuration module for SpectraCheckr

mod tiers;

pub use tiers::{TierParams, TierPreset};
