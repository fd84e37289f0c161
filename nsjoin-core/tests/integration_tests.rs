use nsjoin_core::{Container, Error, ProcessId};

#[test]
fn test_descriptor_json_roundtrip() {
    let container = Container::new()
        .with_namespace("mount", true)
        .with_namespace("network", false)
        .with_env("HOME", "/root");

    let json = serde_json::to_string(&container).unwrap();
    let parsed = Container::from_json(&json).unwrap();

    assert!(parsed.namespace_enabled("mount"));
    assert!(!parsed.namespace_enabled("network"));
    assert_eq!(parsed.env.get("HOME").map(String::as_str), Some("/root"));
}

#[test]
fn test_descriptor_keys_are_deduplicated() {
    // Map semantics: a duplicate key keeps the last value, never two entries
    let container = Container::new()
        .with_namespace("uts", false)
        .with_namespace("uts", true);

    assert_eq!(container.namespaces.len(), 1);
    assert!(container.namespace_enabled("uts"));
}

#[test]
fn test_error_category_exit_codes_are_stable() {
    // A forked helper reports its failure category through these codes;
    // changing them changes the observable contract.
    assert_eq!(
        Error::InvalidConfig {
            message: String::new()
        }
        .exit_code(),
        2
    );
    assert_eq!(
        Error::Mount {
            message: String::new()
        }
        .exit_code(),
        6
    );
    assert_eq!(
        Error::Exec {
            message: String::new()
        }
        .exit_code(),
        7
    );
}

#[test]
fn test_process_id_display_matches_raw() {
    let pid = ProcessId::from_raw(1234);
    assert_eq!(format!("{pid}"), "1234");
}
