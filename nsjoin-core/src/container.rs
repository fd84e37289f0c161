//! Container descriptor: declared namespaces and environment

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::{Error, Result};

/// Read-only description of an existing container.
///
/// Maps namespace-kind names (`mount`, `uts`, `ipc`, `network`, `pid`,
/// `user`, `cgroup`) to an enabled flag, and environment-variable names to
/// values. The descriptor is supplied by configuration; nsjoin never mutates
/// it during a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Container {
    /// Namespace kind name -> enabled
    #[serde(default)]
    pub namespaces: HashMap<String, bool>,

    /// Environment variable name -> value
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Container {
    /// Create an empty descriptor (no namespaces, no environment)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a namespace kind as enabled or disabled
    #[must_use]
    pub fn with_namespace(mut self, kind: impl Into<String>, enabled: bool) -> Self {
        self.namespaces.insert(kind.into(), enabled);
        self
    }

    /// Add an environment variable
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Check whether a namespace kind is declared and enabled
    #[must_use]
    pub fn namespace_enabled(&self, kind: &str) -> bool {
        self.namespaces.get(kind).copied().unwrap_or(false)
    }

    /// Parse a descriptor from a JSON document
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the document is malformed
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidConfig {
            message: format!("Malformed container descriptor: {e}"),
        })
    }

    /// Load a descriptor from a JSON file
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] if the file cannot be read or parsed
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::InvalidConfig {
            message: format!("Cannot read container descriptor {}: {e}", path.display()),
        })?;

        tracing::debug!(path = %path.display(), "Loaded container descriptor");
        Self::from_json(&json)
    }

    /// Environment as `KEY=VALUE` strings, the shape execvpe expects
    #[must_use]
    pub fn env_strings(&self) -> Vec<String> {
        self.env.iter().map(|(k, v)| format!("{k}={v}")).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_pattern() {
        let container = Container::new()
            .with_namespace("mount", true)
            .with_namespace("pid", false)
            .with_env("PATH", "/usr/bin");

        assert!(container.namespace_enabled("mount"));
        assert!(!container.namespace_enabled("pid"));
        assert_eq!(container.env.get("PATH").map(String::as_str), Some("/usr/bin"));
    }

    #[test]
    fn test_undeclared_namespace_is_disabled() {
        let container = Container::new();
        assert!(!container.namespace_enabled("network"));
    }

    #[test]
    fn test_from_json() {
        let container = Container::from_json(
            r#"{
                "namespaces": {"mount": true, "uts": false},
                "env": {"TERM": "xterm"}
            }"#,
        )
        .unwrap();

        assert!(container.namespace_enabled("mount"));
        assert!(!container.namespace_enabled("uts"));
        assert_eq!(container.env.get("TERM").map(String::as_str), Some("xterm"));
    }

    #[test]
    fn test_from_json_missing_sections_default_empty() {
        let container = Container::from_json("{}").unwrap();
        assert!(container.namespaces.is_empty());
        assert!(container.env.is_empty());
    }

    #[test]
    fn test_from_json_malformed() {
        let err = Container::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Container::from_json_file("/nonexistent/container.json").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
    }

    #[test]
    fn test_env_strings() {
        let container = Container::new().with_env("HOME", "/root");
        assert_eq!(container.env_strings(), vec!["HOME=/root".to_string()]);
    }
}
