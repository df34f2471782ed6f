//! Observability
//!
//! Structured logging and Prometheus metrics for the cycler and its waiters.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
