use std::fmt;

use svccall_parcel::ParcelError;

/// Which half of a method schema an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaPart {
    Arguments,
    Return,
}

impl fmt::Display for SchemaPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaPart::Arguments => f.write_str("argument"),
            SchemaPart::Return => f.write_str("return"),
        }
    }
}

/// Errors that can occur while building or using call schemas.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The interface definition text could not be parsed.
    #[error("AIDL parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The requested interface is not declared in the definition.
    #[error("interface not found: {0}")]
    InterfaceNotFound(String),

    /// The interface declares the same method name twice.
    #[error("method {method} declared more than once in {interface}")]
    DuplicateMethod { interface: String, method: String },

    /// The method is not part of the interface.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// No service is bound under that name.
    #[error("unknown service: {0}")]
    UnknownService(String),

    /// The definition used a type the schema builder cannot map.
    #[error("cannot marshal {part} types of {method}: schema unknown")]
    SchemaUnknown { method: String, part: SchemaPart },

    /// The caller supplied a different number of arguments than declared.
    #[error(
        "{method} takes {expected} argument{} but {given} {} given",
        plural(.expected),
        was_were(.given)
    )]
    ArityMismatch {
        method: String,
        expected: usize,
        given: usize,
    },

    /// Encoding or decoding a parcel value failed.
    #[error(transparent)]
    Parcel(#[from] ParcelError),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

fn plural(count: &usize) -> &'static str {
    if *count == 1 {
        ""
    } else {
        "s"
    }
}

fn was_were(count: &usize) -> &'static str {
    if *count == 1 {
        "was"
    } else {
        "were"
    }
}
