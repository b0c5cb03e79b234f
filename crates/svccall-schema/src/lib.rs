//! AIDL-derived call schemas for `service call` transactions.
//!
//! An [`InterfaceRegistry`] is built once from an interface definition and
//! maps each method name to its transaction code and wire-level argument and
//! return types. Codes follow declaration order, exactly as the remote
//! runtime assigns them.
//!
//! Registries are immutable after construction and can be shared read-only
//! between any number of callers.

pub mod aidl;
pub mod catalog;
pub mod error;
pub mod registry;

pub use catalog::{ServiceCatalog, ServiceInterface, OEM_LOCK_AIDL};
pub use error::{Result, SchemaError, SchemaPart};
pub use registry::{map_type, DecodedReturn, InterfaceRegistry, MethodSchema};
