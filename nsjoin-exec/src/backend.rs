//! System backend trait for pluggable syscall implementations
//!
//! The pipeline in [`crate::execin`] is defined over this trait so that:
//! - [`NativeSystem`] performs the real syscalls in production
//! - [`MockSystem`] records calls for testing stage order and argv shape
//!
//! This module uses `unsafe` for fork() and for replacing the process
//! environment, both inherently process-global operations.

#![allow(unsafe_code)]

use nix::sched::CloneFlags;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, execvpe, fork};
use nsjoin_core::{Container, Error, ProcessId, Result};
use nsjoin_security::SecurityLabel;
use std::ffi::CString;
use tracing::{debug, warn};

/// The two sides of a fork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fork {
    /// Forking process; owns the wait on the child
    Parent {
        /// Pid of the forked child
        child: ProcessId,
    },
    /// Forked helper; continues the pipeline itself
    Child,
}

/// How a successful pipeline run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecOutcome {
    /// The process image was replaced. A native backend never actually
    /// returns this (exec does not return on success); only a mock does.
    Replaced,
    /// This process was the parent of the mount-refresh fork and must
    /// terminate with the child's exact exit status.
    Forwarded {
        /// The child's exit status
        status: i32,
    },
}

impl ExecOutcome {
    /// The status the process should terminate with
    #[must_use]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Replaced => 0,
            Self::Forwarded { status } => status,
        }
    }
}

/// Trait over every OS effect the pipeline performs.
///
/// Each method maps to one atomic step; the pipeline never reorders or
/// retries them. Implementations are not expected to be thread-safe: the
/// pipeline owns one backend for one sequential run.
pub trait System {
    /// Replace the process environment with the container's declared one
    fn load_environment(&mut self, container: &Container) -> Result<()>;

    /// Disassociate the named context via `unshare(2)`
    fn unshare(&mut self, flags: CloneFlags) -> Result<()>;

    /// Fork the process
    fn fork(&mut self) -> Result<Fork>;

    /// Block until the child exits; returns its exit status
    fn wait(&mut self, child: ProcessId) -> Result<i32>;

    /// Remount `/proc` for the current namespace context
    fn remount_proc(&mut self) -> Result<()>;

    /// Remount `/sys` for the current namespace context
    fn remount_sys(&mut self) -> Result<()>;

    /// Read the security label of a process
    fn process_label(&mut self, pid: ProcessId) -> Result<SecurityLabel>;

    /// Apply a security label to the current process
    fn set_process_label(&mut self, label: &SecurityLabel) -> Result<()>;

    /// Replace the process image; does not return on success
    fn exec(&mut self, argv: &[String], env: &[String]) -> Result<ExecOutcome>;
}

/// Production backend performing the real syscalls.
#[derive(Debug, Default)]
pub struct NativeSystem;

impl NativeSystem {
    /// Create a native backend
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl System for NativeSystem {
    fn load_environment(&mut self, container: &Container) -> Result<()> {
        debug!(vars = container.env.len(), "Replacing process environment");

        let current: Vec<_> = std::env::vars_os().map(|(key, _)| key).collect();

        // Sound here: the pipeline is single-threaded by contract
        unsafe {
            for key in current {
                std::env::remove_var(key);
            }
            for (key, value) in &container.env {
                std::env::set_var(key, value);
            }
        }

        Ok(())
    }

    fn unshare(&mut self, flags: CloneFlags) -> Result<()> {
        debug!(?flags, "Unsharing namespace");

        nix::sched::unshare(flags).map_err(|e| Error::Namespace {
            message: format!("Failed to unshare {flags:?}: {e}"),
        })
    }

    fn fork(&mut self) -> Result<Fork> {
        match unsafe { fork() } {
            Ok(ForkResult::Parent { child }) => Ok(Fork::Parent {
                child: ProcessId::from_raw(child.as_raw()),
            }),
            Ok(ForkResult::Child) => Ok(Fork::Child),
            Err(e) => Err(Error::Process {
                message: format!("Fork failed: {e}"),
            }),
        }
    }

    fn wait(&mut self, child: ProcessId) -> Result<i32> {
        let pid = Pid::from_raw(child.as_raw());

        loop {
            match waitpid(pid, None) {
                Ok(WaitStatus::Exited(_, code)) => return Ok(code),
                Ok(WaitStatus::Signaled(_, signal, _)) => {
                    warn!(?signal, "Child terminated by signal");
                    return Ok(128 + signal as i32);
                }
                Ok(status) => {
                    debug!(?status, "Child not yet exited, continuing to wait");
                }
                Err(nix::errno::Errno::EINTR) => {}
                Err(e) => {
                    return Err(Error::Process {
                        message: format!("Wait for {child} failed: {e}"),
                    });
                }
            }
        }
    }

    fn remount_proc(&mut self) -> Result<()> {
        nsjoin_namespace::mount::remount_proc()
    }

    fn remount_sys(&mut self) -> Result<()> {
        nsjoin_namespace::mount::remount_sys()
    }

    fn process_label(&mut self, pid: ProcessId) -> Result<SecurityLabel> {
        nsjoin_security::label_for_pid(pid)
    }

    fn set_process_label(&mut self, label: &SecurityLabel) -> Result<()> {
        nsjoin_security::set_process_label(label)
    }

    fn exec(&mut self, argv: &[String], env: &[String]) -> Result<ExecOutcome> {
        let cstrings = |items: &[String]| -> Result<Vec<CString>> {
            items
                .iter()
                .map(|item| {
                    CString::new(item.as_bytes()).map_err(|_| Error::Exec {
                        message: format!("Argument contains NUL byte: {item:?}"),
                    })
                })
                .collect()
        };

        let args = cstrings(argv)?;
        let envp = cstrings(env)?;

        let Some(program) = args.first() else {
            return Err(Error::Exec {
                message: "Empty argument vector".to_string(),
            });
        };

        debug!(program = %argv[0], "Replacing process image");

        // execvpe only returns on failure; success is statically unreachable
        match execvpe(program, &args, &envp) {
            Ok(never) => match never {},
            Err(e) => Err(Error::Exec {
                message: format!("Failed to exec {}: {e}", argv[0]),
            }),
        }
    }
}

/// One recorded backend call (for testing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Environment replaced
    LoadEnvironment,
    /// `unshare(2)` with these flags
    Unshare(CloneFlags),
    /// Process forked
    Fork,
    /// Waited on this child
    Wait(ProcessId),
    /// `/proc` remounted
    RemountProc,
    /// `/sys` remounted
    RemountSys,
    /// Label read for this pid
    ProcessLabel(ProcessId),
    /// Label applied to self
    SetProcessLabel(String),
    /// Process image replaced with this argv
    Exec(Vec<String>),
}

/// Which side of the fork a [`MockSystem`] should act as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFork {
    /// Act as the parent; `wait` reports this child exit status
    Parent {
        /// Exit status the mock child reports
        status: i32,
    },
    /// Act as the forked child
    Child,
}

/// Mock backend for testing (records calls, touches nothing).
///
/// # Example
/// ```
/// use nsjoin_exec::backend::{Call, MockSystem, System};
/// use nsjoin_core::ProcessId;
///
/// let mut sys = MockSystem::new();
/// sys.process_label(ProcessId::from_raw(42)).unwrap();
/// assert_eq!(sys.calls(), &[Call::ProcessLabel(ProcessId::from_raw(42))]);
/// ```
#[derive(Debug)]
pub struct MockSystem {
    calls: Vec<Call>,
    label: SecurityLabel,
    fork_as: MockFork,
    fail_label_read: bool,
    fail_remount_proc: bool,
}

impl Default for MockSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSystem {
    /// Create a mock that acts as the forked child and reports an
    /// unremarkable confined label
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            label: SecurityLabel::new("system_u:system_r:container_t:s0"),
            fork_as: MockFork::Child,
            fail_label_read: false,
            fail_remount_proc: false,
        }
    }

    /// Report this label for every pid
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = SecurityLabel::new(label);
        self
    }

    /// Act as the parent of the fork; the mock child exits with `status`
    #[must_use]
    pub const fn fork_as_parent(mut self, status: i32) -> Self {
        self.fork_as = MockFork::Parent { status };
        self
    }

    /// Make label resolution fail
    #[must_use]
    pub const fn fail_label_read(mut self) -> Self {
        self.fail_label_read = true;
        self
    }

    /// Make the `/proc` remount fail
    #[must_use]
    pub const fn fail_remount_proc(mut self) -> Self {
        self.fail_remount_proc = true;
        self
    }

    /// All recorded calls, in invocation order
    #[must_use]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Number of forks performed
    #[must_use]
    pub fn fork_count(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Fork).count()
    }

    /// Flags passed to each `unshare` call, in order
    #[must_use]
    pub fn unshared_flags(&self) -> Vec<CloneFlags> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Unshare(flags) => Some(*flags),
                _ => None,
            })
            .collect()
    }

    /// The argv of the exec call, if one happened
    #[must_use]
    pub fn exec_argv(&self) -> Option<&[String]> {
        self.calls.iter().find_map(|c| match c {
            Call::Exec(argv) => Some(argv.as_slice()),
            _ => None,
        })
    }

    /// Position of the first matching call, if any
    #[must_use]
    pub fn position_of(&self, wanted: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == wanted)
    }
}

impl System for MockSystem {
    fn load_environment(&mut self, _container: &Container) -> Result<()> {
        self.calls.push(Call::LoadEnvironment);
        Ok(())
    }

    fn unshare(&mut self, flags: CloneFlags) -> Result<()> {
        self.calls.push(Call::Unshare(flags));
        Ok(())
    }

    fn fork(&mut self) -> Result<Fork> {
        self.calls.push(Call::Fork);
        match self.fork_as {
            MockFork::Parent { .. } => Ok(Fork::Parent {
                child: ProcessId::from_raw(1000),
            }),
            MockFork::Child => Ok(Fork::Child),
        }
    }

    fn wait(&mut self, child: ProcessId) -> Result<i32> {
        self.calls.push(Call::Wait(child));
        match self.fork_as {
            MockFork::Parent { status } => Ok(status),
            MockFork::Child => Err(Error::Process {
                message: "Mock child has nothing to wait for".to_string(),
            }),
        }
    }

    fn remount_proc(&mut self) -> Result<()> {
        self.calls.push(Call::RemountProc);
        if self.fail_remount_proc {
            return Err(Error::Mount {
                message: "Mock remount of /proc rejected".to_string(),
            });
        }
        Ok(())
    }

    fn remount_sys(&mut self) -> Result<()> {
        self.calls.push(Call::RemountSys);
        Ok(())
    }

    fn process_label(&mut self, pid: ProcessId) -> Result<SecurityLabel> {
        self.calls.push(Call::ProcessLabel(pid));
        if self.fail_label_read {
            return Err(Error::Label {
                message: format!("Mock label read for pid {pid} failed"),
            });
        }
        Ok(self.label.clone())
    }

    fn set_process_label(&mut self, label: &SecurityLabel) -> Result<()> {
        self.calls
            .push(Call::SetProcessLabel(label.as_str().to_string()));
        Ok(())
    }

    fn exec(&mut self, argv: &[String], _env: &[String]) -> Result<ExecOutcome> {
        self.calls.push(Call::Exec(argv.to_vec()));
        Ok(ExecOutcome::Replaced)
    }
}
