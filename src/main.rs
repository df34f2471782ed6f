//! `phaselight` - Randomized two-phase signal simulation

use clap::Parser;

use phaselight::cli::args::Cli;
use phaselight::cli::commands;
use phaselight::error::ExitCode;
use phaselight::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    // A second Ctrl+C (or SIGTERM) forces exit while the first one is
    // being handled by the running command.
    tokio::spawn(async {
        let Ok(mut sigterm) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            return;
        };

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }

        eprintln!("\nShutting down... (press Ctrl+C again to force)");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
            _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
        }
    });

    let result = commands::dispatch(cli).await;

    // Waiter threads stay parked on the channel; exiting the process is what
    // releases them.
    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
