//! `completions` command
//!
//! Renders a completion script for the `phaselight` binary. Phase flags
//! complete to `red`/`green`, and file flags complete to paths.

use std::io::Write;

use clap::CommandFactory;

use crate::cli::args::{Cli, CompletionsArgs, Shell};
use crate::error::PhaselightError;

const BIN_NAME: &str = "phaselight";

impl From<Shell> for clap_complete::Shell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
            Shell::Elvish => Self::Elvish,
        }
    }
}

/// Builds the completion script for `shell`.
#[must_use]
pub fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut script = Vec::new();
    clap_complete::generate(clap_complete::Shell::from(shell), &mut cmd, BIN_NAME, &mut script);
    script
}

/// Writes the completion script to stdout.
///
/// # Errors
///
/// Returns `PhaselightError::Io` if stdout cannot be written (e.g. a closed pipe).
pub fn run(args: &CompletionsArgs) -> Result<(), PhaselightError> {
    let script = render(args.shell);
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&script)?;
    stdout.flush()?;
    Ok(())
}
