//! Connection establishment and the polymorphic transport.
//!
//! - [`stream`]: the `StreamSocket` trait and `BoxedSocket` wrapper that make
//!   plain-TCP and TLS transports interchangeable downstream
//! - [`connectjob`]: the resolve -> connect -> handshake pipeline

pub mod connectjob;
pub mod stream;

pub use connectjob::{ConnectConfig, ConnectJob};
pub use stream::{BoxedSocket, StreamSocket};
