use std::fmt;
use std::io;

use svccall_dispatch::DispatchError;
use svccall_parcel::ParcelError;
use svccall_schema::SchemaError;
use svccall_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
/// The remote method ran and reported a nonzero status word.
pub const REMOTE_STATUS: i32 = 70;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound => FAILURE,
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Connect { source, target } => {
            io_error(&format!("{context} ({target})"), source)
        }
        TransportError::Io(source) => io_error(context, source),
    }
}

pub fn parcel_error(context: &str, err: ParcelError) -> CliError {
    match err {
        ParcelError::InvalidLiteral { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn schema_error(context: &str, err: SchemaError) -> CliError {
    match err {
        SchemaError::Parcel(err) => parcel_error(context, err),
        SchemaError::UnknownMethod(_)
        | SchemaError::UnknownService(_)
        | SchemaError::InterfaceNotFound(_)
        | SchemaError::ArityMismatch { .. }
        | SchemaError::SchemaUnknown { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}

pub fn dispatch_error(context: &str, err: DispatchError) -> CliError {
    match err {
        DispatchError::Schema(err) => schema_error(context, err),
        DispatchError::Parcel(err) => parcel_error(context, err),
        DispatchError::Io(source) => io_error(context, source),
        DispatchError::RemoteStatus { .. } => {
            CliError::new(REMOTE_STATUS, format!("{context}: {err}"))
        }
        DispatchError::ChannelClosed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use svccall_parcel::ParcelValue;

    use super::*;

    #[test]
    fn remote_status_maps_to_dedicated_code() {
        let err = dispatch_error(
            "call failed",
            DispatchError::RemoteStatus {
                method: "isOemUnlockAllowed".into(),
                arguments: vec![ParcelValue::Bool(true)],
                status: 1,
            },
        );
        assert_eq!(err.code, REMOTE_STATUS);
        assert_eq!(
            err.message,
            "call failed: service call isOemUnlockAllowed(true) returned error 1"
        );
    }

    #[test]
    fn caller_mistakes_are_usage_errors() {
        let err = dispatch_error(
            "call failed",
            DispatchError::Schema(SchemaError::UnknownMethod("nope".into())),
        );
        assert_eq!(err.code, USAGE);

        let err = schema_error(
            "bad argument",
            SchemaError::Parcel(ParcelError::InvalidLiteral {
                wire_type: svccall_parcel::WireType::Int32,
                literal: "x".into(),
            }),
        );
        assert_eq!(err.code, USAGE);
    }

    #[test]
    fn malformed_reply_is_data_invalid() {
        let err = dispatch_error(
            "call failed",
            DispatchError::Parcel(ParcelError::MalformedResponse),
        );
        assert_eq!(err.code, DATA_INVALID);
    }

    #[test]
    fn refused_connection_is_transport_error() {
        let err = transport_error(
            "connect failed",
            TransportError::Connect {
                target: "127.0.0.1:1".into(),
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
        assert!(err.message.contains("127.0.0.1:1"));
    }
}
