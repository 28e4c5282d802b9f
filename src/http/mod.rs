//! HTTP exchange engine.

pub mod exchange;

pub use exchange::{HttpExchange, DEFAULT_USER_AGENT};
