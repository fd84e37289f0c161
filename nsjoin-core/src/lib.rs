//! Nsjoin Core - Foundation types and errors
//!
//! This crate provides the core abstractions used throughout nsjoin:
//! the error taxonomy, the target process identity, and the container
//! descriptor that declares which namespaces a container enables and
//! which environment variables it carries.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod container;
pub mod error;
pub mod types;

pub use container::Container;
pub use error::{Error, Result};
pub use types::ProcessId;
