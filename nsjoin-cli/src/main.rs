//! Nsjoin CLI
//!
//! Joins an already-running container's Linux namespaces and executes a
//! command inside them.

use clap::Parser;
use std::process;
use tracing::Level;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::ExecIn {
            target,
            config,
            command,
        } => match commands::exec_in::execute(target, config.as_deref(), &command) {
            // On the parent side of the mount-refresh fork the outcome
            // carries the child's status; exec itself never returns Ok.
            Ok(outcome) => process::exit(outcome.exit_code()),
            Err(e) => {
                eprintln!("❌ Error: {e}");
                process::exit(e.exit_code());
            }
        },

        Commands::Namespaces { pid } => exit_on_error(commands::namespaces::execute(pid)),

        Commands::Health => exit_on_error(commands::health::execute()),
    }
}

fn exit_on_error(result: anyhow::Result<()>) {
    if let Err(e) = result {
        eprintln!("❌ Error: {e}");
        process::exit(1);
    }
}
