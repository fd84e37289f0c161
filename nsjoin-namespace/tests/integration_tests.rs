use nix::sched::CloneFlags;
use nsjoin_core::ProcessId;
use nsjoin_namespace::kind::clone_flag_for;
use nsjoin_namespace::{NamespaceInfo, NamespaceKind};

#[test]
fn test_all_kinds_have_table_entries() {
    for kind in NamespaceKind::ALL {
        assert_eq!(clone_flag_for(kind.name()), Some(kind.clone_flag()));
    }
}

#[test]
fn test_unknown_kind_has_no_entry() {
    assert_eq!(clone_flag_for("cpuset"), None);
}

#[test]
fn test_pid_kind_resolves_to_newpid() {
    assert_eq!(
        NamespaceKind::Pid.clone_flag(),
        CloneFlags::CLONE_NEWPID
    );
}

#[test]
fn test_info_for_current_process() {
    let info = NamespaceInfo::for_pid(ProcessId::current()).unwrap();
    assert!(info.pid.is_some());
    assert!(info.pid.as_deref().unwrap().starts_with("pid:["));
}

#[test]
fn test_info_matches_init_or_not() {
    // Reading init's namespaces may be denied, but our own must agree with
    // themselves either way.
    let mine = NamespaceInfo::current().unwrap();
    let again = NamespaceInfo::current().unwrap();
    assert!(mine.shares_namespaces_with(&again));
}
