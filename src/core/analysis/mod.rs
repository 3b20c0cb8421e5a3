//! Detection algorithms: the classical stage and the shoulder stage

pub mod peaks;
pub mod shoulders;

pub use peaks::{detect_peaks, PeakCandidate};
pub use shoulders::{detect_shoulders, ShoulderCandidate, ShoulderParams};
