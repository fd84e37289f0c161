//! Namespace kinds and the kind -> clone-flag lookup table

use nix::sched::CloneFlags;

/// The fixed enumeration of Linux namespace kinds nsjoin knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamespaceKind {
    /// Mount namespace (filesystem view)
    Mount,
    /// UTS namespace (hostname, domain name)
    Uts,
    /// IPC namespace (System V IPC, POSIX queues)
    Ipc,
    /// Network namespace (interfaces, routes)
    Network,
    /// PID namespace (process identity)
    Pid,
    /// User namespace (UID/GID mapping)
    User,
    /// CGroup namespace (cgroup root view)
    Cgroup,
}

impl NamespaceKind {
    /// All known kinds, in no particular order
    pub const ALL: [Self; 7] = [
        Self::Mount,
        Self::Uts,
        Self::Ipc,
        Self::Network,
        Self::Pid,
        Self::User,
        Self::Cgroup,
    ];

    /// The descriptor key for this kind
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mount => "mount",
            Self::Uts => "uts",
            Self::Ipc => "ipc",
            Self::Network => "network",
            Self::Pid => "pid",
            Self::User => "user",
            Self::Cgroup => "cgroup",
        }
    }

    /// Resolve a descriptor key to a kind
    ///
    /// Returns `None` for names unknown to this build; callers treat that as
    /// "nothing to join", not as an error.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "mount" => Some(Self::Mount),
            "uts" => Some(Self::Uts),
            "ipc" => Some(Self::Ipc),
            "network" => Some(Self::Network),
            "pid" => Some(Self::Pid),
            "user" => Some(Self::User),
            "cgroup" => Some(Self::Cgroup),
            _ => None,
        }
    }

    /// The `unshare(2)`/`clone(2)` flag for this kind
    #[must_use]
    pub const fn clone_flag(self) -> CloneFlags {
        match self {
            Self::Mount => CloneFlags::CLONE_NEWNS,
            Self::Uts => CloneFlags::CLONE_NEWUTS,
            Self::Ipc => CloneFlags::CLONE_NEWIPC,
            Self::Network => CloneFlags::CLONE_NEWNET,
            Self::Pid => CloneFlags::CLONE_NEWPID,
            Self::User => CloneFlags::CLONE_NEWUSER,
            Self::Cgroup => CloneFlags::CLONE_NEWCGROUP,
        }
    }
}

/// Look up the clone flag for a descriptor key, absent for unknown names.
#[must_use]
pub fn clone_flag_for(name: &str) -> Option<CloneFlags> {
    NamespaceKind::from_name(name).map(NamespaceKind::clone_flag)
}
