//! TVS Library
//!
//! Client for the TVS episode-tracking service and the reconciliation of
//! per-episode watch status into incomplete seasons.
//! This library exposes modules for use in integration tests.

pub mod config;
pub mod error;
pub mod services;

pub use error::{AppError, Result};
pub use services::{IncompleteSeries, ProgressReconciler, TrackerClient};
