//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod config;
pub mod run;
pub mod version;

use crate::cli::args::{Cli, Commands};
use crate::error::PhaselightError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli) -> Result<(), PhaselightError> {
    match cli.command {
        Commands::Run(args) => run::run(&args).await,
        Commands::Config(args) => config::run(&args),
        Commands::Completions(args) => completions::run(&args),
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
