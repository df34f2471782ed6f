//! Metrics collection for `phaselight`.
//!
//! Prometheus-compatible counters, gauges, and histograms for phase
//! transitions and satisfied waits. All `record_*` functions are no-ops
//! until [`init_metrics`] installs a recorder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::PhaselightError;
use crate::phase::Phase;

/// Guard to prevent double-initialization of the metrics recorder.
static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
///
/// Returns `PhaselightError::Io` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), PhaselightError> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| PhaselightError::Io(std::io::Error::other(e.to_string())))?;

    describe_metrics();
    Ok(())
}

/// Registers metric descriptions with the global recorder.
fn describe_metrics() {
    describe_counter!(
        "phaselight_phase_transitions_total",
        "Total number of phase transitions published"
    );
    describe_gauge!(
        "phaselight_current_phase",
        "Currently active phase (1 = active)"
    );
    describe_histogram!(
        "phaselight_dwell_duration_ms",
        "Time a phase was held before toggling, in milliseconds"
    );
    describe_counter!(
        "phaselight_waits_satisfied_total",
        "Waits that returned after observing their target phase"
    );
}

/// Records a published transition into `to` after holding the previous
/// phase for `dwell`.
pub fn record_transition(to: Phase, dwell: Duration) {
    counter!("phaselight_phase_transitions_total", "to" => to.as_str()).increment(1);
    histogram!("phaselight_dwell_duration_ms").record(dwell.as_secs_f64() * 1000.0);
    record_current_phase(to);
}

/// Sets the current-phase gauge, zeroing the other phase's label.
pub fn record_current_phase(phase: Phase) {
    gauge!("phaselight_current_phase", "phase" => phase.toggled().as_str()).set(0.0);
    gauge!("phaselight_current_phase", "phase" => phase.as_str()).set(1.0);
}

/// Records a waiter returning on `target`.
pub fn record_wait_satisfied(target: Phase) {
    counter!("phaselight_waits_satisfied_total", "phase" => target.as_str()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        // metrics macros silently no-op when no global recorder is installed
        record_transition(Phase::Green, Duration::from_millis(4321));
        record_current_phase(Phase::Red);
        record_wait_satisfied(Phase::Green);
    }

    #[test]
    fn init_metrics_twice_is_ok() {
        assert!(init_metrics(None).is_ok());
        assert!(init_metrics(None).is_ok());
        record_transition(Phase::Red, Duration::from_secs(5));
    }
}
