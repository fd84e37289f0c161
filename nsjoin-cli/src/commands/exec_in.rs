//! Exec-in command implementation

use nsjoin_core::{Container, Error, ProcessId, Result};
use nsjoin_exec::{ExecOutcome, NativeSystem, exec_in};
use std::path::Path;
use tracing::{debug, info};

/// Run the execute-in-namespace pipeline against a running container.
///
/// Does not return on success: either the process image is replaced, or
/// the caller terminates with the forwarded helper status in the returned
/// outcome.
pub fn execute(target: i32, config: Option<&Path>, command: &[String]) -> Result<ExecOutcome> {
    let container = match config {
        Some(path) => Container::from_json_file(path)?,
        None => {
            debug!("No descriptor given, using default namespace set");
            default_container()
        }
    };

    if target <= 0 {
        return Err(Error::InvalidConfig {
            message: format!("Target pid must be positive, got {target}"),
        });
    }

    // Joining namespaces and writing label attributes needs CAP_SYS_ADMIN
    if !nix::unistd::geteuid().is_root() {
        return Err(Error::PermissionDenied {
            operation: "exec-in requires root. Try: sudo nsjoin exec-in ...".to_string(),
        });
    }

    info!("🔗 Joining namespaces of pid {target}");

    let mut sys = NativeSystem::new();
    exec_in(&mut sys, &container, ProcessId::from_raw(target), command)
}

/// Descriptor used when no config file is supplied: the five standard
/// container namespaces plus a minimal environment.
fn default_container() -> Container {
    Container::new()
        .with_namespace("mount", true)
        .with_namespace("uts", true)
        .with_namespace("ipc", true)
        .with_namespace("network", true)
        .with_namespace("pid", true)
        .with_env("PATH", "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin")
        .with_env("TERM", "xterm")
}
