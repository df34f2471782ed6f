//! Phase cycler: the background toggle loop and the waiter API.
//!
//! One OS thread per cycler holds each phase for a random dwell, flips the
//! shared register, and publishes the new phase into a
//! [`BlockingChannel`]. Waiters block on that channel until they observe the
//! phase they want.

use std::ops::Range;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::channel::BlockingChannel;
use crate::config::CycleConfig;
use crate::error::{ConfigError, PhaseError};
use crate::observability::logging::CYCLER_THREAD_NAME;
use crate::observability::metrics;

use super::state::{Phase, PhaseRegister};

/// State shared between the cycler, its background thread, and waiters.
#[derive(Debug)]
struct Shared {
    channel: BlockingChannel<Phase>,
    phase: PhaseRegister,
}

/// Two-phase signal simulation.
///
/// Construct once, call [`start`](Self::start) once, then call
/// [`wait_for_green`](Self::wait_for_green) or
/// [`current_phase`](Self::current_phase) from any thread. Share across
/// threads behind an `Arc`.
pub struct PhaseCycler {
    shared: Arc<Shared>,
    config: CycleConfig,
    started: AtomicBool,
}

impl PhaseCycler {
    /// Creates a cycler with the default timing: red first, dwell in
    /// `[4s, 6s)`, 1ms poll interval.
    #[must_use]
    pub fn new() -> Self {
        Self::from_valid_config(CycleConfig::default())
    }

    /// Creates a cycler with custom timing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `config` fails validation.
    pub fn with_config(config: CycleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: CycleConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                channel: BlockingChannel::new(),
                phase: PhaseRegister::new(config.initial_phase),
            }),
            config,
            started: AtomicBool::new(false),
        }
    }

    /// Spawns the background cycle thread and returns immediately.
    ///
    /// Dropping the returned handle detaches the thread, which then runs
    /// until the process exits. Call [`CyclerHandle::shutdown`] to stop and
    /// join it instead.
    ///
    /// # Errors
    ///
    /// - `PhaseError::AlreadyStarted` if this cycler was started before
    /// - `PhaseError::SpawnFailed` if the OS cannot create the thread
    pub fn start(&self) -> Result<CyclerHandle, PhaseError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PhaseError::AlreadyStarted);
        }

        let shared = Arc::clone(&self.shared);
        let config = self.config.clone();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let join = thread::Builder::new()
            .name(CYCLER_THREAD_NAME.to_string())
            .spawn(move || cycle_loop(&shared, &config, &token))
            .map_err(|e| {
                self.started.store(false, Ordering::SeqCst);
                PhaseError::SpawnFailed(e)
            })?;

        debug!(
            initial = %self.config.initial_phase,
            min_dwell_ms = self.config.dwell_range_ms().start,
            max_dwell_ms = self.config.dwell_range_ms().end,
            "phase cycler started"
        );
        Ok(CyclerHandle { cancel, join })
    }

    /// Returns a snapshot of the current phase.
    ///
    /// The value may be one transition behind for an instant after a flip.
    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.shared.phase.load()
    }

    /// Blocks until the signal turns green.
    pub fn wait_for_green(&self) {
        self.wait_for(Phase::Green);
    }

    /// Blocks until a published transition to `target` is received while the
    /// register still reads `target`.
    ///
    /// Non-matching values are discarded. A matching value is also discarded
    /// when newer transitions have already moved the register on, so the call
    /// never returns on a stale phase left deep in the channel.
    pub fn wait_for(&self, target: Phase) {
        loop {
            let received = self.shared.channel.receive();
            if received != target {
                trace!(%received, %target, "discarding non-matching phase");
                continue;
            }
            if self.shared.phase.load() == target {
                trace!(%target, "wait satisfied");
                metrics::record_wait_satisfied(target);
                return;
            }
            trace!(%target, "discarding stale phase");
        }
    }

    /// The channel transitions are published into.
    ///
    /// Receiving from it consumes transitions that waiters would otherwise see.
    #[must_use]
    pub fn channel(&self) -> &BlockingChannel<Phase> {
        &self.shared.channel
    }

    /// Number of published transitions no waiter has consumed yet.
    #[must_use]
    pub fn pending_transitions(&self) -> usize {
        self.shared.channel.len()
    }

    /// Whether [`start`](Self::start) has succeeded on this cycler.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &CycleConfig {
        &self.config
    }
}

impl Default for PhaseCycler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhaseCycler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhaseCycler")
            .field("current_phase", &self.current_phase())
            .field("started", &self.is_started())
            .field("pending", &self.pending_transitions())
            .finish_non_exhaustive()
    }
}

/// Handle to a running cycle thread.
///
/// Dropping it leaves the thread running (detached).
#[derive(Debug)]
pub struct CyclerHandle {
    cancel: CancellationToken,
    join: JoinHandle<()>,
}

impl CyclerHandle {
    /// Stops the cycle loop and waits for the thread to exit.
    ///
    /// The loop notices cancellation within one poll interval.
    ///
    /// # Errors
    ///
    /// Returns `PhaseError::TaskPanicked` if the thread panicked.
    pub fn shutdown(self) -> Result<(), PhaseError> {
        self.cancel.cancel();
        self.join.join().map_err(|_| PhaseError::TaskPanicked)
    }

    /// Whether the cycle thread has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Draws a dwell uniformly from `range` (milliseconds, end exclusive).
fn draw_dwell<R: Rng>(rng: &mut R, range: &Range<u64>) -> Duration {
    Duration::from_millis(rng.random_range(range.clone()))
}

/// Body of the background thread.
///
/// Accumulates monotonic elapsed time across short sleeps; once it reaches
/// the drawn dwell the register flips, the new phase is sent, and a fresh
/// dwell is drawn.
fn cycle_loop(shared: &Shared, config: &CycleConfig, cancel: &CancellationToken) {
    let mut rng = config
        .seed
        .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
    let range = config.dwell_range_ms();

    let mut dwell = draw_dwell(&mut rng, &range);
    let mut waited = Duration::ZERO;
    let mut last = Instant::now();
    let mut sequence: u64 = 0;

    metrics::record_current_phase(shared.phase.load());

    while !cancel.is_cancelled() {
        let now = Instant::now();
        waited += now.duration_since(last);
        last = now;

        if waited >= dwell {
            let from = shared.phase.load();
            let to = shared.phase.toggle();
            sequence += 1;

            if let Err(e) = shared.channel.send(to) {
                warn!(error = %e, %to, "failed to publish phase transition");
            }

            info!(
                %from,
                %to,
                sequence,
                dwell_ms = u64::try_from(waited.as_millis()).unwrap_or(u64::MAX),
                "phase transition"
            );
            metrics::record_transition(to, waited);

            waited = Duration::ZERO;
            dwell = draw_dwell(&mut rng, &range);
        }

        thread::sleep(config.poll_interval);
    }

    debug!(transitions = sequence, "cycle loop cancelled");
}
