//! CLI argument definitions
//!
//! All Clap derive structs for `phaselight` command-line parsing.

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::{PossibleValuesParser, TypedValueParser};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::config::CycleConfig;
use crate::config::duration::parse_duration_arg;
use crate::error::ConfigError;
use crate::phase::Phase;

// ============================================================================
// Root CLI
// ============================================================================

/// Randomized red/green signal simulation.
#[derive(Parser, Debug)]
#[command(name = "phaselight", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output control.
    #[arg(long, default_value = "auto", global = true, env = "PHASELIGHT_COLOR")]
    pub color: ColorChoice,

    /// Log line format on stderr.
    #[arg(long, default_value = "human", global = true, env = "PHASELIGHT_LOG_FORMAT")]
    pub log_format: OutputFormat,
}

// ============================================================================
// Top-Level Commands
// ============================================================================

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the cycler and report each time a waiter sees green.
    Run(RunArgs),

    /// Print the effective configuration after merging file, env and flags.
    Config(ConfigArgs),

    /// Generate shell completion scripts.
    Completions(CompletionsArgs),

    /// Display version information.
    Version(VersionArgs),
}

// ============================================================================
// Cycle Configuration
// ============================================================================

/// Cycle timing options shared by `run` and `config`.
///
/// Each flag overrides the corresponding field of the YAML file (if any),
/// which in turn overrides the built-in defaults.
#[derive(Args, Debug, Default)]
pub struct CycleArgs {
    /// Path to a YAML cycle configuration file.
    #[arg(short, long, env = "PHASELIGHT_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Shortest dwell per phase, inclusive (e.g. `4s`, `4000ms`).
    #[arg(long, value_parser = parse_duration_arg, env = "PHASELIGHT_MIN_DWELL")]
    pub min_dwell: Option<Duration>,

    /// Dwell upper bound, exclusive (e.g. `6s`).
    #[arg(long, value_parser = parse_duration_arg, env = "PHASELIGHT_MAX_DWELL")]
    pub max_dwell: Option<Duration>,

    /// Sleep between elapsed-time checks (e.g. `1ms`).
    #[arg(long, value_parser = parse_duration_arg, env = "PHASELIGHT_POLL_INTERVAL")]
    pub poll_interval: Option<Duration>,

    /// Phase held before the first transition (`red` or `green`).
    #[arg(
        long,
        env = "PHASELIGHT_INITIAL_PHASE",
        ignore_case = true,
        value_parser = phase_parser()
    )]
    pub initial_phase: Option<Phase>,

    /// Seed for reproducible dwell draws.
    #[arg(long, env = "PHASELIGHT_SEED")]
    pub seed: Option<u64>,
}

/// Restricts `--initial-phase` to the phase names so completions can offer them.
fn phase_parser() -> impl TypedValueParser<Value = Phase> {
    PossibleValuesParser::new([Phase::Red.as_str(), Phase::Green.as_str()])
        .try_map(|name| name.parse::<Phase>())
}

impl CycleArgs {
    /// Builds the effective configuration: defaults, then the file, then flags.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be loaded or the merged
    /// values fail validation.
    pub fn resolve(&self) -> Result<CycleConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => CycleConfig::from_file(path)?,
            None => CycleConfig::default(),
        };

        if let Some(d) = self.min_dwell {
            config.min_dwell = d;
        }
        if let Some(d) = self.max_dwell {
            config.max_dwell = d;
        }
        if let Some(d) = self.poll_interval {
            config.poll_interval = d;
        }
        if let Some(phase) = self.initial_phase {
            config.initial_phase = phase;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Run / Config Commands
// ============================================================================

/// Arguments for `run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Cycle timing options.
    #[command(flatten)]
    pub cycle: CycleArgs,

    /// Number of concurrent waiter threads.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    pub waiters: u16,

    /// Stop after this many green observations (0 runs until interrupted).
    #[arg(short, long, default_value_t = 0, env = "PHASELIGHT_GREENS")]
    pub greens: u64,

    /// Report format on stdout.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,

    /// Serve Prometheus metrics on 127.0.0.1:<PORT>.
    #[arg(long, env = "PHASELIGHT_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Cycle timing options.
    #[command(flatten)]
    pub cycle: CycleArgs,

    /// Output format (YAML for human).
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// Completions / Version
// ============================================================================

/// Arguments for shell completion generation.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script.
    pub shell: Shell,
}

/// Arguments for version display.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

// ============================================================================
// CLI-Local Enums
// ============================================================================

/// Color output choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Auto-detect terminal support.
    #[default]
    Auto,
    /// Always use color.
    Always,
    /// Never use color.
    Never,
}

/// Output format for structured output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output.
    #[default]
    Human,
    /// JSON output.
    Json,
}

/// Shell type for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell.
    Bash,
    /// Zsh shell.
    Zsh,
    /// Fish shell.
    Fish,
    /// `PowerShell`.
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell.
    Elvish,
}

// ============================================================================
// Tests
// ============================================================================
