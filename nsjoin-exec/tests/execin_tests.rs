use nix::sched::CloneFlags;
use nsjoin_core::{Container, Error, ProcessId};
use nsjoin_exec::backend::{Call, MockSystem};
use nsjoin_exec::{ExecOutcome, exec_in};

fn cmd(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

fn full_container() -> Container {
    Container::new()
        .with_namespace("mount", true)
        .with_namespace("uts", true)
        .with_namespace("ipc", true)
        .with_namespace("network", true)
        .with_namespace("pid", true)
        .with_env("PATH", "/usr/sbin:/usr/bin:/sbin:/bin")
}

#[test]
fn pid_namespace_is_never_unshared_directly() {
    let container = Container::new()
        .with_namespace("pid", true)
        .with_namespace("uts", true);
    let mut sys = MockSystem::new();

    exec_in(&mut sys, &container, ProcessId::from_raw(1), &cmd(&["/bin/true"])).unwrap();

    assert_eq!(sys.unshared_flags(), vec![CloneFlags::CLONE_NEWUTS]);
}

#[test]
fn unknown_namespace_kind_is_skipped_without_error() {
    let container = Container::new()
        .with_namespace("time", true)
        .with_namespace("uts", true);
    let mut sys = MockSystem::new();

    let outcome =
        exec_in(&mut sys, &container, ProcessId::from_raw(1), &cmd(&["/bin/true"])).unwrap();

    assert_eq!(outcome, ExecOutcome::Replaced);
    assert_eq!(sys.unshared_flags(), vec![CloneFlags::CLONE_NEWUTS]);
}

#[test]
fn disabled_namespaces_are_not_joined() {
    let container = Container::new()
        .with_namespace("uts", false)
        .with_namespace("ipc", false);
    let mut sys = MockSystem::new();

    exec_in(&mut sys, &container, ProcessId::from_raw(1), &cmd(&["/bin/true"])).unwrap();

    assert!(sys.unshared_flags().is_empty());
}

#[test]
fn mount_and_pid_trigger_exactly_one_fork() {
    let mut sys = MockSystem::new().fork_as_parent(0);

    exec_in(
        &mut sys,
        &full_container(),
        ProcessId::from_raw(1),
        &cmd(&["/bin/true"]),
    )
    .unwrap();

    assert_eq!(sys.fork_count(), 1);
}

#[test]
fn parent_forwards_child_status_exactly() {
    for status in [0, 1, 2, 7, 42, 126, 127, 200, 255] {
        let mut sys = MockSystem::new().fork_as_parent(status);

        let outcome = exec_in(
            &mut sys,
            &full_container(),
            ProcessId::from_raw(1),
            &cmd(&["/bin/true"]),
        )
        .unwrap();

        assert_eq!(outcome, ExecOutcome::Forwarded { status });
        assert_eq!(outcome.exit_code(), status);
    }
}

#[test]
fn parent_never_reaches_label_set_or_exec() {
    let mut sys = MockSystem::new().fork_as_parent(3);

    exec_in(
        &mut sys,
        &full_container(),
        ProcessId::from_raw(1),
        &cmd(&["/bin/true"]),
    )
    .unwrap();

    assert!(sys.exec_argv().is_none());
    assert!(
        !sys.calls()
            .iter()
            .any(|c| matches!(c, Call::SetProcessLabel(_)))
    );
}

#[test]
fn mount_without_pid_does_not_fork() {
    let container = Container::new()
        .with_namespace("mount", true)
        .with_namespace("pid", false);
    let mut sys = MockSystem::new();

    exec_in(&mut sys, &container, ProcessId::from_raw(1), &cmd(&["/bin/ls"])).unwrap();

    assert_eq!(sys.fork_count(), 0);
}

#[test]
fn pid_without_mount_does_not_fork() {
    let container = Container::new().with_namespace("pid", true);
    let mut sys = MockSystem::new();

    exec_in(&mut sys, &container, ProcessId::from_raw(1), &cmd(&["/bin/ls"])).unwrap();

    assert_eq!(sys.fork_count(), 0);
}

#[test]
fn label_read_happens_before_fork_and_set_after_remounts() {
    let target = ProcessId::from_raw(4242);
    let mut sys = MockSystem::new();

    exec_in(&mut sys, &full_container(), target, &cmd(&["/bin/echo", "hi"])).unwrap();

    let read = sys.position_of(&Call::ProcessLabel(target)).unwrap();
    let forked = sys.position_of(&Call::Fork).unwrap();
    let proc_remounted = sys.position_of(&Call::RemountProc).unwrap();
    let sys_remounted = sys.position_of(&Call::RemountSys).unwrap();
    let set = sys
        .calls()
        .iter()
        .position(|c| matches!(c, Call::SetProcessLabel(_)))
        .unwrap();
    let execed = sys
        .calls()
        .iter()
        .position(|c| matches!(c, Call::Exec(_)))
        .unwrap();

    assert!(read < forked);
    assert!(forked < proc_remounted);
    assert!(proc_remounted < sys_remounted);
    assert!(sys_remounted < set);
    assert!(set < execed);
}

#[test]
fn child_scenario_mount_pid_enabled() {
    // {mount:true, pid:true, uts:false}, target 4242, /bin/echo hi
    let container = Container::new()
        .with_namespace("mount", true)
        .with_namespace("pid", true)
        .with_namespace("uts", false);
    let target = ProcessId::from_raw(4242);
    let mut sys = MockSystem::new();

    let outcome = exec_in(&mut sys, &container, target, &cmd(&["/bin/echo", "hi"])).unwrap();

    assert_eq!(outcome, ExecOutcome::Replaced);
    assert_eq!(sys.fork_count(), 1);
    assert_eq!(
        sys.exec_argv().unwrap(),
        cmd(&[
            "nsenter", "--target", "4242", "--mount", "--uts", "--ipc", "--net", "--pid",
            "/bin/echo", "hi",
        ])
    );
}

#[test]
fn direct_scenario_no_mount_no_pid() {
    // {mount:false, pid:false}, /bin/ls: no fork, label set, direct exec
    let container = Container::new()
        .with_namespace("mount", false)
        .with_namespace("pid", false);
    let target = ProcessId::from_raw(99);
    let mut sys = MockSystem::new();

    let outcome = exec_in(&mut sys, &container, target, &cmd(&["/bin/ls"])).unwrap();

    assert_eq!(outcome, ExecOutcome::Replaced);
    assert_eq!(sys.fork_count(), 0);

    let set = sys
        .calls()
        .iter()
        .position(|c| matches!(c, Call::SetProcessLabel(_)))
        .unwrap();
    let execed = sys
        .calls()
        .iter()
        .position(|c| matches!(c, Call::Exec(_)))
        .unwrap();
    assert!(set < execed);

    let argv = sys.exec_argv().unwrap();
    assert_eq!(argv[0], "nsenter");
    assert_eq!(argv[2], "99");
    assert_eq!(argv.last().map(String::as_str), Some("/bin/ls"));
}

#[test]
fn label_resolution_failure_aborts_before_exec() {
    let mut sys = MockSystem::new().fail_label_read();

    let err = exec_in(
        &mut sys,
        &full_container(),
        ProcessId::from_raw(1),
        &cmd(&["/bin/true"]),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Label { .. }));
    assert_eq!(sys.fork_count(), 0);
    assert!(sys.exec_argv().is_none());
}

#[test]
fn child_remount_failure_aborts_with_mount_error() {
    let mut sys = MockSystem::new().fail_remount_proc();

    let err = exec_in(
        &mut sys,
        &full_container(),
        ProcessId::from_raw(1),
        &cmd(&["/bin/true"]),
    )
    .unwrap_err();

    assert!(matches!(err, Error::Mount { .. }));
    assert_eq!(err.exit_code(), 6);
    assert!(sys.exec_argv().is_none());
}

#[test]
fn environment_is_loaded_before_any_join() {
    let mut sys = MockSystem::new();

    exec_in(
        &mut sys,
        &full_container(),
        ProcessId::from_raw(1),
        &cmd(&["/bin/true"]),
    )
    .unwrap();

    assert_eq!(sys.calls()[0], Call::LoadEnvironment);
    let first_unshare = sys
        .calls()
        .iter()
        .position(|c| matches!(c, Call::Unshare(_)))
        .unwrap();
    assert!(first_unshare >= 1);
}

#[test]
fn resolved_label_is_the_one_applied() {
    let container = Container::new();
    let mut sys = MockSystem::new().with_label("user_u:user_r:svirt_t:s0:c1,c2");

    exec_in(&mut sys, &container, ProcessId::from_raw(5), &cmd(&["/bin/true"])).unwrap();

    assert!(sys.calls().contains(&Call::SetProcessLabel(
        "user_u:user_r:svirt_t:s0:c1,c2".to_string()
    )));
}
