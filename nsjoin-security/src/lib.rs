//! Security-label primitives for process context transitions
//!
//! Reads the LSM label attached to a target process and applies it to the
//! current process, so a command exec'd into a container runs under the
//! container's security context rather than the caller's.
//!
//! Labels travel through procfs: `/proc/<pid>/attr/current` to read,
//! `/proc/self/attr/current` to write.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

use nsjoin_core::{Error, ProcessId, Result};
use std::fmt;

/// An opaque security-context token (e.g. an SELinux context string).
///
/// Read once from the target pid and applied once to the acting process;
/// never cached beyond a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityLabel(String);

impl SecurityLabel {
    /// Wrap a raw label string
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The label as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this label represents an unconfined process.
    ///
    /// On hosts without an enforcing LSM the kernel reports `unconfined`
    /// (or nothing at all); applying such a label is a no-op.
    #[must_use]
    pub fn is_unconfined(&self) -> bool {
        self.0.is_empty() || self.0 == "unconfined" || self.0.starts_with("unconfined ")
    }
}

impl fmt::Display for SecurityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strip the trailing NUL and whitespace the kernel appends to attr values.
fn parse_label(raw: &[u8]) -> SecurityLabel {
    let text = String::from_utf8_lossy(raw);
    SecurityLabel::new(text.trim_end_matches(['\0', '\n', ' ']))
}

/// Read the security label currently attached to a process.
///
/// Pure read; no side effect. Fails if the process has exited or exposes no
/// label attribute.
pub fn label_for_pid(pid: ProcessId) -> Result<SecurityLabel> {
    let path = format!("/proc/{pid}/attr/current");

    let raw = std::fs::read(&path).map_err(|e| Error::Label {
        message: format!("Cannot read label of pid {pid}: {e}"),
    })?;

    let label = parse_label(&raw);
    tracing::debug!(%pid, label = %label, "Resolved process label");

    Ok(label)
}

/// Apply a security label to the current process.
///
/// Unconfined labels are skipped: there is no policy to transition under,
/// and the write would be rejected by the kernel.
pub fn set_process_label(label: &SecurityLabel) -> Result<()> {
    if label.is_unconfined() {
        tracing::debug!("Label is unconfined, skipping transition");
        return Ok(());
    }

    tracing::debug!(label = %label, "Setting process label");

    std::fs::write("/proc/self/attr/current", label.as_str()).map_err(|e| Error::Label {
        message: format!("Label transition to '{label}' rejected: {e}"),
    })
}
