//! Schema-driven `service call` dispatch over a shell channel.
//!
//! One call is one command line written to the channel followed by one
//! blocking read of the reply. There is no framing or correlation id, so a
//! channel carries a single outstanding request at a time; callers sharing
//! a channel must serialize access themselves.

pub mod caller;
pub mod command;
pub mod config;
pub mod error;

pub use caller::{call, format_call, ServiceCaller};
pub use command::{build_command, quote};
pub use config::{DispatchConfig, DEFAULT_MAX_REPLY_SIZE};
pub use error::{DispatchError, Result};
