//! Remounting `/proc` and `/sys` after a mount/pid namespace switch
//!
//! Both pseudo-filesystems key off process identity and mount context, so a
//! view inherited from before the switch is stale. The old mount is lazily
//! detached and a fresh one mounted in its place.

use nix::mount::{MntFlags, MsFlags, mount, umount2};
use nsjoin_core::{Error, Result};

/// nosuid,nodev,noexec - the flags these pseudo-filesystems always carry
fn default_mount_flags() -> MsFlags {
    MsFlags::MS_NOSUID | MsFlags::MS_NODEV | MsFlags::MS_NOEXEC
}

/// Remount `/proc` so it reflects the current pid and mount namespaces.
pub fn remount_proc() -> Result<()> {
    tracing::debug!("Remounting /proc");

    // The old mount may be pinned by the previous namespace; a lazy detach
    // is enough, and a failure here does not prevent the fresh mount.
    if let Err(e) = umount2("/proc", MntFlags::MNT_DETACH) {
        tracing::debug!(error = %e, "Could not detach old /proc, continuing");
    }

    mount(
        Some("proc"),
        "/proc",
        Some("proc"),
        default_mount_flags(),
        None::<&str>,
    )
    .map_err(|e| Error::Mount {
        message: format!("Failed to remount /proc: {e}"),
    })
}

/// Remount `/sys` so it reflects the current namespace context.
pub fn remount_sys() -> Result<()> {
    tracing::debug!("Remounting /sys");

    match umount2("/sys", MntFlags::MNT_DETACH) {
        Ok(()) => {}
        // EINVAL means /sys was not a mount point here; nothing to detach
        Err(nix::errno::Errno::EINVAL) => {}
        Err(e) => {
            return Err(Error::Mount {
                message: format!("Failed to detach old /sys: {e}"),
            });
        }
    }

    mount(
        Some("sysfs"),
        "/sys",
        Some("sysfs"),
        default_mount_flags(),
        None::<&str>,
    )
    .map_err(|e| Error::Mount {
        message: format!("Failed to remount /sys: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mount_flags() {
        let flags = default_mount_flags();
        assert!(flags.contains(MsFlags::MS_NOSUID));
        assert!(flags.contains(MsFlags::MS_NODEV));
        assert!(flags.contains(MsFlags::MS_NOEXEC));
        assert!(!flags.contains(MsFlags::MS_RDONLY));
    }
}
