//! Base types and error handling.
//!
//! Provides the shared error taxonomy used by every component:
//! - [`NetError`]: one failure category plus diagnostic text per fault
//! - [`ErrorKind`]: the stable category identifiers

pub mod neterror;

pub use neterror::{ErrorKind, NetError};
