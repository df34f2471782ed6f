//! `phaselight` - Randomized two-phase signal simulation
//!
//! A background thread toggles a red/green [`Phase`](phase::Phase) on a
//! random dwell and publishes each transition into a
//! [`BlockingChannel`](channel::BlockingChannel); any number of threads can
//! block until the signal turns green.
//!
//! ```no_run
//! use phaselight::phase::PhaseCycler;
//!
//! let cycler = PhaseCycler::new();
//! let _handle = cycler.start()?;
//! cycler.wait_for_green();
//! # Ok::<(), phaselight::error::PhaseError>(())
//! ```

pub mod channel;
pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
pub mod phase;
