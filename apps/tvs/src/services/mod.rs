//! Application services for the TVS client.

pub mod progress;
pub mod tracker;
pub mod transport;

pub use progress::{IncompleteSeries, ProgressReconciler};
pub use tracker::TrackerClient;
pub use transport::{PreparedCall, ReqwestTransport, Transport};
