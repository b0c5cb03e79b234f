//! Typed Android `service call` invocation over a shell channel.
//!
//! # Crate Structure
//!
//! - [`transport`] - Duplex shell channel over TCP or Unix sockets
//! - [`parcel`] - Wire types, value codec and record-dump decoding
//! - [`schema`] - AIDL parsing and per-interface call schemas
//! - [`dispatch`] - Command construction and request/reply dispatch
//!
//! ```no_run
//! use svccall::dispatch::ServiceCaller;
//! use svccall::schema::ServiceCatalog;
//! use svccall::transport::ShellStream;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = ServiceCatalog::builtin()?;
//! let stream = ShellStream::connect_tcp("127.0.0.1:1234")?;
//! let mut caller = ServiceCaller::new(stream);
//! let allowed = caller.call(catalog.get("oem_lock")?, "isOemUnlockAllowed", &[])?;
//! println!("{allowed:?}");
//! # Ok(())
//! # }
//! ```

/// Re-export transport types.
pub mod transport {
    pub use svccall_transport::*;
}

/// Re-export parcel types.
pub mod parcel {
    pub use svccall_parcel::*;
}

/// Re-export schema types.
pub mod schema {
    pub use svccall_schema::*;
}

/// Re-export dispatch types.
pub mod dispatch {
    pub use svccall_dispatch::*;
}
