//! The `episode` service: statistics and series tracking.

pub mod model;
pub mod stats;
pub mod tracking;

pub(crate) const SERVICE: &str = "episode";
