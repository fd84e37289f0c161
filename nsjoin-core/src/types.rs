//! Core type definitions with strong typing and validation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Process identifier
///
/// Names the already-running container init process whose namespaces are
/// joined. Ownership of the process never transfers to nsjoin; it is only
/// read from (`/proc/<pid>/ns`, `/proc/<pid>/attr/current`), never signalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct ProcessId(i32);

impl ProcessId {
    /// Create from raw PID
    #[must_use]
    pub const fn from_raw(pid: i32) -> Self {
        Self(pid)
    }

    /// Get the PID of the current process
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub fn current() -> Self {
        Self(std::process::id() as i32)
    }

    /// Get the raw PID value
    #[must_use]
    pub const fn as_raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for ProcessId {
    fn from(pid: i32) -> Self {
        Self(pid)
    }
}
