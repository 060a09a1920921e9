//! Record splitting, identifier decoding and serialization
//!
//! Each record is a 17-byte identifier. Records are separated by
//! [`DELIMITER`]; the last record runs into the end anchor with no
//! delimiter of its own.

use crate::pattern::{DELIMITER, find};

/// Length in bytes of one identifier payload
pub const RECORD_LEN: usize = 17;

/// Prefix shared by all Steam64 identifiers
pub const IDENTIFIER_PREFIX: &[u8; 4] = b"7656";

/// Split a payload into records on every delimiter occurrence
///
/// The final segment is always yielded, even when empty, matching a plain
/// split; callers drop what is too short.
pub fn split_records(payload: &[u8]) -> Vec<&[u8]> {
    let mut parts = Vec::new();
    let mut start = 0;

    while let Some(index) = find(payload, &DELIMITER, start) {
        parts.push(&payload[start..index]);
        start = index + DELIMITER.len();
    }
    parts.push(&payload[start..]);

    parts
}

/// Decode the first [`RECORD_LEN`] bytes of a record as text
///
/// Records shorter than [`RECORD_LEN`] yield `None`. The text is not
/// validated against the identifier shape.
pub fn decode_record(record: &[u8]) -> Option<String> {
    record
        .get(..RECORD_LEN)
        .map(|id| String::from_utf8_lossy(id).into_owned())
}

/// Decode every record of a payload, in order of appearance
pub fn extract_identifiers(payload: &[u8]) -> Vec<String> {
    split_records(payload)
        .into_iter()
        .filter_map(decode_record)
        .collect()
}

/// Join identifiers with [`DELIMITER`] between consecutive entries
///
/// No delimiter is written before the first or after the last identifier.
pub fn serialize_records<S: AsRef<str>>(identifiers: &[S]) -> Vec<u8> {
    let size = identifiers
        .iter()
        .map(|id| id.as_ref().len())
        .sum::<usize>()
        + DELIMITER.len() * identifiers.len().saturating_sub(1);

    let mut data = Vec::with_capacity(size);
    for (i, id) in identifiers.iter().enumerate() {
        if i > 0 {
            data.extend_from_slice(&DELIMITER);
        }
        data.extend_from_slice(id.as_ref().as_bytes());
    }
    data
}

/// Check whether bytes look like a Steam64 identifier: `7656` and 13 more digits
pub fn is_identifier_shaped(bytes: &[u8]) -> bool {
    bytes.len() == RECORD_LEN
        && bytes.starts_with(IDENTIFIER_PREFIX)
        && bytes.iter().all(u8::is_ascii_digit)
}
