use svccall_parcel::{ParcelError, ParcelValue};
use svccall_schema::SchemaError;

use crate::caller::format_call;

/// Errors that can occur while dispatching a call.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Method lookup or schema checks failed.
    #[error(transparent)]
    Schema(SchemaError),

    /// Encoding arguments or decoding the reply failed at the parcel layer.
    #[error(transparent)]
    Parcel(#[from] ParcelError),

    /// The remote call ran but reported a nonzero status word.
    #[error("service call {} returned error {status}", format_call(.method, .arguments))]
    RemoteStatus {
        method: String,
        arguments: Vec<ParcelValue>,
        status: i32,
    },

    /// An I/O error occurred on the channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel reached EOF before any reply arrived.
    #[error("channel closed before a reply was received")]
    ChannelClosed,
}

// Parcel failures surface as `Parcel` whichever layer caught them.
impl From<SchemaError> for DispatchError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Parcel(err) => DispatchError::Parcel(err),
            other => DispatchError::Schema(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
