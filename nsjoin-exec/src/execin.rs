//! The execute-in-namespace pipeline
//!
//! A linear setup pipeline, not a service: five stages in fixed order, one
//! thread of control, and at most one short-lived forked helper. Every error
//! is fatal; there is no retry and no rollback of namespace or label state
//! already committed.

use nix::sched::CloneFlags;
use nsjoin_core::{Container, Error, ProcessId, Result};
use nsjoin_namespace::NamespaceKind;
use nsjoin_namespace::kind::clone_flag_for;
use nsjoin_security::SecurityLabel;
use tracing::{debug, info};

use crate::backend::{ExecOutcome, Fork, System};

/// The namespace-entering launcher the final command is dispatched through.
pub const LAUNCHER: &str = "nsenter";

/// Join a running container's namespaces and replace this process with
/// `command`.
///
/// On success the process image is replaced and this never returns in the
/// conventional sense; with the native backend the only `Ok` value ever
/// observed is [`ExecOutcome::Forwarded`], from the parent side of the
/// mount-refresh fork, and the caller must terminate with that status.
///
/// When both the mount and pid namespaces are enabled, a forked helper
/// re-establishes the mount view and remounts `/proc` and `/sys` before
/// exec'ing. Errors on the helper's side of the fork cannot reach the
/// original caller; they propagate up the helper's own stack and must be
/// reported through its exit status.
///
/// # Errors
/// Fails if the command is empty, or on the first failing stage: environment
/// load, namespace join, label resolution, fork/wait, remount, label
/// transition, or exec.
pub fn exec_in<S: System>(
    sys: &mut S,
    container: &Container,
    target: ProcessId,
    command: &[String],
) -> Result<ExecOutcome> {
    if command.is_empty() {
        return Err(Error::InvalidConfig {
            message: "Command cannot be empty".to_string(),
        });
    }

    info!(%target, command = %command.join(" "), "Executing in container namespaces");

    sys.load_environment(container)?;

    join_namespaces(sys, container)?;

    // Read the label before any fork: the target could exit at any time,
    // and the helper must not have to resolve it again.
    let label = sys.process_label(target)?;

    // A new pid namespace makes the inherited /proc stale, but remounting it
    // from here would corrupt this process's own mount view. A fresh child
    // that re-enters the mount namespace does the remounts instead.
    if container.namespace_enabled(NamespaceKind::Mount.name())
        && container.namespace_enabled(NamespaceKind::Pid.name())
    {
        match sys.fork()? {
            Fork::Parent { child } => {
                debug!(%child, "Waiting for mount-refresh helper");
                let status = sys.wait(child)?;
                return Ok(ExecOutcome::Forwarded { status });
            }
            Fork::Child => refresh_mounts(sys)?,
        }
    }

    set_label_and_exec(sys, container, target, &label, command)
}

/// Stage 2: associate this process with every enabled namespace except pid.
///
/// Pid is excluded because unshare cannot join a pid namespace on this path;
/// only the launcher's own re-entry covers it. Kinds with no table entry are
/// skipped silently. Iteration order is unspecified: joins are independent
/// and commutative.
fn join_namespaces<S: System>(sys: &mut S, container: &Container) -> Result<()> {
    for (kind, enabled) in &container.namespaces {
        if !*enabled || kind.as_str() == NamespaceKind::Pid.name() {
            continue;
        }

        match clone_flag_for(kind) {
            Some(flags) => sys.unshare(flags)?,
            None => debug!(%kind, "Unknown namespace kind, skipping"),
        }
    }

    Ok(())
}

/// Stage 4, child side: re-enter the mount namespace and refresh the
/// pseudo-filesystems that key off process identity.
fn refresh_mounts<S: System>(sys: &mut S) -> Result<()> {
    sys.unshare(CloneFlags::CLONE_NEWNS)?;
    sys.remount_proc()?;
    sys.remount_sys()?;
    Ok(())
}

/// Stage 5: apply the resolved label, then hand off to the launcher.
fn set_label_and_exec<S: System>(
    sys: &mut S,
    container: &Container,
    target: ProcessId,
    label: &SecurityLabel,
    command: &[String],
) -> Result<ExecOutcome> {
    sys.set_process_label(label)?;

    let argv = nsenter_argv(target, command);
    let env = container.env_strings();

    sys.exec(&argv, &env)
}

/// Build the launcher argument vector.
///
/// Always selects all five of mount, uts, ipc, net and pid regardless of
/// which kinds the container declared enabled; the command and its arguments
/// follow verbatim.
#[must_use]
pub fn nsenter_argv(target: ProcessId, command: &[String]) -> Vec<String> {
    let mut argv = vec![
        LAUNCHER.to_string(),
        "--target".to_string(),
        target.to_string(),
        "--mount".to_string(),
        "--uts".to_string(),
        "--ipc".to_string(),
        "--net".to_string(),
        "--pid".to_string(),
    ];
    argv.extend(command.iter().cloned());
    argv
}
