//! Logging initialization for `phaselight`.
//!
//! Events go to stderr as human-readable text or newline-delimited JSON.
//! `-v` flags raise the level of this crate only; everything else stays at
//! `warn` unless `PHASELIGHT_LOG_LEVEL` holds an explicit filter.
//!
//! Every line carries the emitting thread's name. The cycler and each waiter
//! run on threads named by the helpers below, so a transition logged by
//! `phaselight-cycler` can be matched to the `phaselight-waiter-N` that
//! consumed it.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

use crate::cli::args::{ColorChoice, OutputFormat};

/// Environment variable holding an explicit `EnvFilter` directive.
pub const LOG_LEVEL_ENV: &str = "PHASELIGHT_LOG_LEVEL";

/// Name of the background thread that toggles the phase.
pub const CYCLER_THREAD_NAME: &str = "phaselight-cycler";

/// Prefix shared by all waiter thread names.
pub const WAITER_THREAD_PREFIX: &str = "phaselight-waiter-";

/// Name of the waiter thread with the given index.
#[must_use]
pub fn waiter_thread_name(index: u16) -> String {
    format!("{WAITER_THREAD_PREFIX}{index}")
}

/// Filter used when `PHASELIGHT_LOG_LEVEL` is unset.
///
/// Verbosity 0 keeps everything at `warn`. Higher levels raise only the
/// `phaselight` target (1 info, 2 debug, 3+ trace), so tokio and the metrics
/// exporter stay quiet.
#[must_use]
pub fn default_directive(verbosity: u8) -> String {
    let level = match verbosity {
        0 => return "warn".to_string(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("warn,{}={level}", env!("CARGO_CRATE_NAME"))
}

fn build_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

fn use_ansi(color: ColorChoice) -> bool {
    match color {
        ColorChoice::Auto => {
            std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    }
}

/// Initializes the global tracing subscriber.
///
/// Uses `try_init()`, so a second call (e.g. from tests) is a no-op.
pub fn init_logging(format: OutputFormat, verbosity: u8, color: ColorChoice) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbosity))
        .with_thread_names(true)
        .with_target(verbosity >= 3)
        .with_writer(std::io::stderr);

    let _ = match format {
        OutputFormat::Human => builder.with_ansi(use_ansi(color)).try_init(),
        OutputFormat::Json => builder.json().try_init(),
    };
}
