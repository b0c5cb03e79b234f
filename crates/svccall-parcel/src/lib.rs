//! Parcel wire types and `service call` record-dump decoding.
//!
//! Two representations meet here:
//! - Arguments go *out* as command-line tokens (`i32 5`, `s16 text`) that the
//!   remote `service call` utility turns into a parcel.
//! - Results come *back* as a textual hex dump of the reply parcel, which
//!   [`decode_record_dump`] turns into raw little-endian bytes that
//!   [`WireType::decode`] consumes.

pub mod dump;
pub mod error;
pub mod wire;

pub use dump::{decode_record_dump, swap_word_order};
pub use error::{ParcelError, Result};
pub use wire::{decode_int32, decode_sequence, ParcelValue, WireType};
