//! Execute-in-namespace pipeline
//!
//! Joins the calling process to a running container's namespaces and
//! replaces it with a caller-supplied command. The pipeline runs five stages
//! in strict sequence: load the container environment, join the enabled
//! namespaces (except pid), resolve the target's security label, optionally
//! fork to refresh `/proc` and `/sys`, then apply the label and exec.
//!
//! All OS effects go through the [`System`] backend trait, so the stage
//! sequencing is testable with [`MockSystem`] while production runs on
//! [`NativeSystem`].

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod backend;
pub mod execin;

pub use backend::{ExecOutcome, Fork, MockSystem, NativeSystem, System};
pub use execin::{exec_in, nsenter_argv};
