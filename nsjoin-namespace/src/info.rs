//! Inspecting namespace membership via `/proc/<pid>/ns`

use nsjoin_core::{Error, ProcessId, Result};
use std::fmt;

/// Namespace membership of a process, one `ns:[inode]` link per kind.
#[derive(Debug, Clone, Default)]
pub struct NamespaceInfo {
    /// PID namespace ID
    pub pid: Option<String>,
    /// Network namespace ID
    pub net: Option<String>,
    /// Mount namespace ID
    pub mnt: Option<String>,
    /// UTS namespace ID
    pub uts: Option<String>,
    /// IPC namespace ID
    pub ipc: Option<String>,
    /// User namespace ID
    pub user: Option<String>,
    /// CGroup namespace ID
    pub cgroup: Option<String>,
}

impl NamespaceInfo {
    /// Read namespace membership for the current process
    pub fn current() -> Result<Self> {
        Self::for_pid(ProcessId::current())
    }

    /// Read namespace membership for a specific process
    pub fn for_pid(pid: ProcessId) -> Result<Self> {
        use std::fs;

        let base_path = format!("/proc/{pid}/ns");

        if !std::path::Path::new(&base_path).exists() {
            return Err(Error::Namespace {
                message: format!("No such process: {pid}"),
            });
        }

        let read_ns = |name: &str| -> Option<String> {
            fs::read_link(format!("{base_path}/{name}"))
                .map(|p| p.to_string_lossy().into_owned())
                .ok()
        };

        Ok(Self {
            pid: read_ns("pid"),
            net: read_ns("net"),
            mnt: read_ns("mnt"),
            uts: read_ns("uts"),
            ipc: read_ns("ipc"),
            user: read_ns("user"),
            cgroup: read_ns("cgroup"),
        })
    }

    /// Check whether this process shares all of pid/net/mnt with another
    #[must_use]
    pub fn shares_namespaces_with(&self, other: &Self) -> bool {
        self.pid == other.pid && self.net == other.net && self.mnt == other.mnt
    }
}

impl fmt::Display for NamespaceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Namespace Info:")?;
        if let Some(ref pid) = self.pid {
            writeln!(f, "  PID:    {pid}")?;
        }
        if let Some(ref net) = self.net {
            writeln!(f, "  NET:    {net}")?;
        }
        if let Some(ref mnt) = self.mnt {
            writeln!(f, "  MNT:    {mnt}")?;
        }
        if let Some(ref uts) = self.uts {
            writeln!(f, "  UTS:    {uts}")?;
        }
        if let Some(ref ipc) = self.ipc {
            writeln!(f, "  IPC:    {ipc}")?;
        }
        if let Some(ref user) = self.user {
            writeln!(f, "  USER:   {user}")?;
        }
        if let Some(ref cgroup) = self.cgroup {
            writeln!(f, "  CGROUP: {cgroup}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_namespaces() {
        let info = NamespaceInfo::current().unwrap();
        assert!(info.pid.is_some());
        assert!(info.mnt.is_some());
    }

    #[test]
    fn test_for_pid_missing_process() {
        let err = NamespaceInfo::for_pid(ProcessId::from_raw(-1)).unwrap_err();
        assert!(matches!(err, Error::Namespace { .. }));
    }

    #[test]
    fn test_shares_namespaces_with_self() {
        let info = NamespaceInfo::current().unwrap();
        assert!(info.shares_namespaces_with(&info));
    }

    #[test]
    fn test_namespace_info_display() {
        let info = NamespaceInfo {
            pid: Some("pid:[4026531836]".to_string()),
            net: Some("net:[4026531905]".to_string()),
            ..Default::default()
        };

        let display = format!("{info}");
        assert!(display.contains("PID:"));
        assert!(display.contains("NET:"));
        assert!(!display.contains("UTS:"));
    }
}
