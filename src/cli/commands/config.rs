//! `config` command
//!
//! Resolves the effective cycle configuration and prints it, so a layered
//! setup (file, env, flags) can be checked without starting a simulation.

use crate::cli::args::{ConfigArgs, OutputFormat};
use crate::config::CycleConfig;
use crate::error::PhaselightError;

/// Print the merged, validated configuration.
///
/// # Errors
///
/// Returns an error if the configuration cannot be resolved or serialized.
pub fn run(args: &ConfigArgs) -> Result<(), PhaselightError> {
    let config = args.cycle.resolve()?;
    print!("{}", render(&config, args.format)?);
    Ok(())
}

/// Renders `config` as YAML (human) or pretty JSON.
///
/// # Errors
///
/// Returns a serialization error from `serde_yaml` or `serde_json`.
pub fn render(config: &CycleConfig, format: OutputFormat) -> Result<String, PhaselightError> {
    match format {
        OutputFormat::Human => Ok(serde_yaml::to_string(config)?),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(config)?;
            out.push('\n');
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_yaml() {
        let out = render(&CycleConfig::default(), OutputFormat::Human).unwrap();
        assert!(out.contains("min_dwell: 4s"));
        assert!(out.contains("initial_phase: red"));
    }

    #[test]
    fn test_render_json() {
        let config = CycleConfig {
            seed: Some(11),
            ..CycleConfig::default()
        };
        let out = render(&config, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["max_dwell"], "6s");
        assert_eq!(parsed["poll_interval"], "1ms");
        assert_eq!(parsed["seed"], 11);
    }
}
