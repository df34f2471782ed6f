//! `run` command
//!
//! Drives one [`PhaseCycler`]: starts it, parks `--waiters` threads on
//! `wait_for_green`, and reports each green observation until `--greens`
//! observations have been made or the process is interrupted.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::args::{OutputFormat, RunArgs};
use crate::error::{PhaseError, PhaselightError};
use crate::observability::init_metrics;
use crate::observability::logging::waiter_thread_name;
use crate::phase::{Phase, PhaseCycler};

/// One waiter returning from `wait_for_green`.
#[derive(Debug, Clone, Serialize)]
pub struct GreenObservation {
    /// Zero-based waiter index.
    pub waiter: u16,
    /// Phase read from the cycler right after the wait returned.
    pub phase: Phase,
    /// Milliseconds since the cycler was started.
    pub elapsed_ms: u64,
}

impl GreenObservation {
    /// Renders the observation as a single output line.
    ///
    /// # Errors
    ///
    /// Returns a JSON serialization error in JSON mode.
    pub fn render(&self, format: OutputFormat) -> Result<String, PhaselightError> {
        match format {
            OutputFormat::Human => Ok(format!(
                "waiter {} observed {} at +{}ms",
                self.waiter, self.phase, self.elapsed_ms
            )),
            OutputFormat::Json => Ok(serde_json::to_string(self)?),
        }
    }
}

/// Run the simulation.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the metrics endpoint
/// cannot be bound, or a thread cannot be spawned.
pub async fn run(args: &RunArgs) -> Result<(), PhaselightError> {
    let config = args.cycle.resolve()?;

    if let Some(port) = args.metrics_port {
        init_metrics(Some(port))?;
        info!(port, "metrics endpoint listening");
    }

    let cycler = Arc::new(PhaseCycler::with_config(config)?);
    let handle = cycler.start()?;
    let started = Instant::now();
    info!(waiters = args.waiters, greens = args.greens, "simulation started");

    let (tx, mut rx) = mpsc::unbounded_channel();
    for waiter in 0..args.waiters {
        spawn_waiter(waiter, Arc::clone(&cycler), tx.clone(), started)?;
    }
    drop(tx);

    let mut observed: u64 = 0;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!(observed, "interrupted; stopping simulation");
                break;
            }
            observation = rx.recv() => {
                let Some(observation) = observation else {
                    break;
                };
                println!("{}", observation.render(args.format)?);
                observed += 1;
                if args.greens != 0 && observed >= args.greens {
                    debug!(observed, "green limit reached");
                    break;
                }
            }
        }
    }

    // Joining takes at most one poll interval; keep it off the async workers.
    tokio::task::spawn_blocking(move || handle.shutdown())
        .await
        .map_err(|_| PhaseError::TaskPanicked)??;
    info!(observed, "simulation stopped");
    Ok(())
}

/// Spawns a named waiter thread that reports every green it observes.
///
/// The thread exits once the report receiver is gone; until then it stays
/// parked on the cycler's channel.
fn spawn_waiter(
    waiter: u16,
    cycler: Arc<PhaseCycler>,
    tx: mpsc::UnboundedSender<GreenObservation>,
    started: Instant,
) -> Result<(), PhaseError> {
    std::thread::Builder::new()
        .name(waiter_thread_name(waiter))
        .spawn(move || {
            loop {
                cycler.wait_for_green();
                let observation = GreenObservation {
                    waiter,
                    phase: cycler.current_phase(),
                    elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                };
                if tx.send(observation).is_err() {
                    break;
                }
            }
        })
        .map(|_| ())
        .map_err(PhaseError::SpawnFailed)
}
