//! Detection result types for SpectraCheckr

mod result;

pub use result::{Feature, FeatureKind, FeatureSet, FeatureStats};
