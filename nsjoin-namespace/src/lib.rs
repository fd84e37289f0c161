//! Namespace primitives for joining an existing container
//!
//! This crate covers the namespace side of execute-in-namespace:
//! - The fixed namespace-kind enumeration and its kind -> `CloneFlags` table
//! - Remount primitives for `/proc` and `/sys` after a mount/pid switch
//! - `/proc/<pid>/ns` inspection for diagnostics

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod info;
pub mod kind;
pub mod mount;

pub use info::NamespaceInfo;
pub use kind::NamespaceKind;
