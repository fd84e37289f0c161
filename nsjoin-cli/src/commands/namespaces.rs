//! Namespaces command implementation

use anyhow::{Context, Result};
use nsjoin_core::ProcessId;
use nsjoin_namespace::NamespaceInfo;

pub fn execute(pid: Option<i32>) -> Result<()> {
    let target = pid.map_or_else(ProcessId::current, ProcessId::from_raw);

    println!("\n🔒 Namespace Information for PID {target}");
    println!("{:-<60}", "");

    let ns_info =
        NamespaceInfo::for_pid(target).context("Failed to get namespace information")?;

    print!("{ns_info}");

    // Compare against our own membership when inspecting another process
    if target != ProcessId::current() {
        match NamespaceInfo::current() {
            Ok(mine) if ns_info.shares_namespaces_with(&mine) => {
                println!("\n⚠️  Process shares this shell's namespaces");
            }
            Ok(_) => println!("\n✅ Process is in separate namespaces"),
            Err(e) => println!("\n❌ Failed to read own namespaces: {e}"),
        }
    }

    // Read hostname from /proc if UTS namespace info is available
    if ns_info.uts.is_some() {
        if let Ok(hostname) = std::fs::read_to_string("/proc/sys/kernel/hostname") {
            println!("Hostname: {}", hostname.trim());
        }
    }

    Ok(())
}
