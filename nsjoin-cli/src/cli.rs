//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nsjoin")]
#[command(about = "Execute commands inside a running container's namespaces", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a command inside an existing container's namespaces
    ExecIn {
        /// Pid of the running container init process
        #[arg(short, long)]
        target: i32,

        /// Container descriptor file (JSON: namespaces and environment)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Command to run inside the container
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },

    /// Show namespace information for a process
    Namespaces {
        /// Process ID (default: current process)
        #[arg(short, long)]
        pid: Option<i32>,
    },

    /// Check that this host supports exec-in
    Health,
}
