//! Two-phase signal simulation
//!
//! - [`Phase`] / [`PhaseRegister`]: the red/green value and the lock-free
//!   current-phase register
//! - [`PhaseCycler`]: background toggle loop publishing each transition into
//!   a [`BlockingChannel`](crate::channel::BlockingChannel), plus the waiter API
//! - [`CyclerHandle`]: cancel-and-join handle for the background thread

pub mod cycler;
pub mod state;

pub use cycler::{CyclerHandle, PhaseCycler};
pub use state::{ParsePhaseError, Phase, PhaseRegister};
