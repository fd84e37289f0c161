//! Health check command implementation

use anyhow::Result;
use std::path::Path;

/// Execute health check command
pub fn execute() -> Result<()> {
    println!("\n🏥 Nsjoin Health Check\n");
    println!("{:-<60}", "");

    check_namespace_support()?;
    check_label_support();
    check_permissions();
    check_launcher();

    println!("{:-<60}", "");
    println!("\n✅ Health check complete\n");

    Ok(())
}

/// Check if running as root
fn is_root() -> bool {
    unsafe { libc::getuid() == 0 }
}

/// Check if namespace support is available
fn check_namespace_support() -> Result<()> {
    print!("Checking namespace support... ");

    let ns_dir = Path::new("/proc/self/ns");
    if !ns_dir.exists() {
        println!("❌ NOT SUPPORTED");
        anyhow::bail!(
            "Kernel doesn't support namespaces\n\
             \n\
             Your kernel may be too old or compiled without namespace support."
        );
    }

    let required = ["pid", "mnt", "uts", "ipc", "net"];
    let mut missing = Vec::new();

    for ns_type in &required {
        if !ns_dir.join(ns_type).exists() {
            missing.push(*ns_type);
        }
    }

    if !missing.is_empty() {
        println!("❌ INCOMPLETE");
        println!("   Missing: {}", missing.join(", "));
        anyhow::bail!(
            "Required namespace types not available\n\
             \n\
             Your kernel may need to be reconfigured."
        );
    }

    println!("✅ OK (all types available)");
    Ok(())
}

/// Check whether the kernel exposes process security labels
fn check_label_support() {
    print!("Checking security label support... ");

    match std::fs::read("/proc/self/attr/current") {
        Ok(raw) if !raw.is_empty() => println!("✅ OK"),
        Ok(_) => println!("⚠️  EMPTY (no LSM label, transitions will be skipped)"),
        Err(e) => {
            println!("⚠️  UNAVAILABLE ({e})");
            println!("   Label transitions will be skipped");
        }
    }
}

/// Check if running with proper permissions
fn check_permissions() {
    print!("Checking permissions... ");

    if is_root() {
        println!("✅ OK (root)");
    } else {
        println!("⚠️  NOT ROOT");
        println!("   exec-in needs root to join namespaces");
        println!("   Try: sudo nsjoin health");
    }
}

/// Check if the nsenter launcher is available on PATH
fn check_launcher() {
    print!("Checking for {} launcher... ", nsjoin_exec::execin::LAUNCHER);

    if let Some(path) = find_on_path(nsjoin_exec::execin::LAUNCHER) {
        println!("✅ OK ({})", path.display());
    } else {
        println!("❌ NOT FOUND");
        println!("   exec-in dispatches through nsenter; install util-linux");
    }
}

/// Resolve a program name against PATH
fn find_on_path(program: &str) -> Option<std::path::PathBuf> {
    let path = std::env::var_os("PATH")?;

    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_on_path_known_binary() {
        // sh is on PATH in any environment these tests run in
        assert!(find_on_path("sh").is_some());
    }

    #[test]
    fn test_find_on_path_missing_binary() {
        assert!(find_on_path("definitely-not-a-real-binary-name").is_none());
    }
}
