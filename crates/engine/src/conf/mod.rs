//! Conf — engine configuration: format definitions and scheduling knobs.

pub mod load;
pub mod model;

pub use model::{DetectionConfig, EngineConfig, MatcherConfig};
