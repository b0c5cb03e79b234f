use std::sync::LazyLock;

use bytes::{BufMut, Bytes, BytesMut};
use regex::Regex;
use tracing::{debug, trace};

use crate::error::{ParcelError, Result};

/// Bytes per machine word in the dump.
pub const WORD_SIZE: usize = 4;

/// Matches either the single-line header or a continuation line:
///
/// ```text
/// Result: Parcel(00000000 00000001   '........')
///   0x00000010: 00000000 0000000e 00650074 '........t.e.')
/// ```
static DUMP_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Result: Parcel\(|  0x[0-9a-fA-F]+: )([0-9a-fA-F ]+)'[^']*'\)?$")
        .expect("dump line pattern is valid")
});

/// Decode the textual reply of `service call` into the raw parcel bytes.
///
/// Every line shaped like a parcel dump contributes its hex run, in order.
/// The dump prints each 32-bit word most significant byte first, so the
/// accumulated bytes are word-swapped back into little-endian order.
pub fn decode_record_dump(text: &str) -> Result<Bytes> {
    let mut raw = BytesMut::new();
    let mut matched_any = false;

    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(captures) = DUMP_LINE.captures(line) else {
            continue;
        };
        matched_any = true;

        let hex_run: String = captures[1].chars().filter(|c| *c != ' ').collect();
        let decoded = hex::decode(&hex_run).map_err(|source| ParcelError::InvalidHex {
            line: index + 1,
            source,
        })?;
        trace!(line = index + 1, bytes = decoded.len(), "parcel dump line");
        raw.put_slice(&decoded);
    }

    if !matched_any {
        debug!(reply = %text.trim_end(), "reply contained no parcel dump");
        return Err(ParcelError::MalformedResponse);
    }

    Ok(swap_word_order(&raw))
}

/// Reverse the byte order inside every full 4-byte word.
///
/// A trailing partial word is passed through unchanged.
pub fn swap_word_order(bytes: &[u8]) -> Bytes {
    let mut out = BytesMut::with_capacity(bytes.len());
    let mut words = bytes.chunks_exact(WORD_SIZE);
    for word in words.by_ref() {
        out.extend(word.iter().rev());
    }
    out.put_slice(words.remainder());
    out.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_header_line() {
        let reply = "Result: Parcel(00 00 00 00 00 00 00 01   '........')\n";
        let bytes = decode_record_dump(reply).unwrap();
        assert_eq!(bytes.as_ref(), &[0, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn word_reversal_is_observable() {
        let reply = "Result: Parcel(01 02 03 04 '....')";
        let bytes = decode_record_dump(reply).unwrap();
        assert_eq!(bytes.as_ref(), &[4, 3, 2, 1]);
    }

    #[test]
    fn android_word_grouped_dump() {
        let reply = "Result: Parcel(00000000 00000001   '........')\r\n";
        let bytes = decode_record_dump(reply).unwrap();
        assert_eq!(bytes.as_ref(), &[0, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn multi_line_dump_concatenates_in_order() {
        let reply = concat!(
            "Result: Parcel(\n",
            "  0x00000000: 00000000 0a0b0c0d '........'\n",
            "  0x00000008: 01020304          '....')\n",
        );
        let bytes = decode_record_dump(reply).unwrap();
        assert_eq!(
            bytes.as_ref(),
            &[0, 0, 0, 0, 0x0d, 0x0c, 0x0b, 0x0a, 4, 3, 2, 1]
        );
    }

    #[test]
    fn unrelated_lines_are_ignored() {
        let reply = concat!(
            "shell@device:/ $ service call oem_lock 5\n",
            "Result: Parcel(00000000 00000000   '........')\n",
            "shell@device:/ $ ",
        );
        let bytes = decode_record_dump(reply).unwrap();
        assert_eq!(bytes.as_ref(), &[0; 8]);
    }

    #[test]
    fn no_matching_line_is_malformed() {
        let reply = "service: Service oem_lock does not exist\n";
        assert!(matches!(
            decode_record_dump(reply),
            Err(ParcelError::MalformedResponse)
        ));
        assert!(matches!(
            decode_record_dump(""),
            Err(ParcelError::MalformedResponse)
        ));
    }

    #[test]
    fn odd_hex_run_is_rejected() {
        let reply = "Result: Parcel(000 '.')";
        assert!(matches!(
            decode_record_dump(reply),
            Err(ParcelError::InvalidHex { line: 1, .. })
        ));
    }

    #[test]
    fn partial_trailing_word_passes_through() {
        let swapped = swap_word_order(&[1, 2, 3, 4, 5, 6]);
        assert_eq!(swapped.as_ref(), &[4, 3, 2, 1, 5, 6]);
        assert!(swap_word_order(&[]).is_empty());
    }
}
