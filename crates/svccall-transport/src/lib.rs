//! Duplex shell channel used to carry `service call` commands.
//!
//! The channel is established by an external procedure (usually a forwarded
//! TCP port in front of a privileged shell). This crate only wraps the already
//! listening endpoint in a [`ShellStream`] that implements `Read + Write`.
//! It never retries, polls, or validates who is on the other end.

pub mod error;
pub mod stream;

pub use error::{Result, TransportError};
pub use stream::ShellStream;
