//! List mutation and buffer rewriting
//!
//! A rewrite replaces everything between the two anchors with the new
//! serialized list, then patches the header fields in front of the start
//! anchor. The rest of the buffer is copied through untouched.

use crate::error::{FormatError, Result};
use crate::header::{ArrayHeader, COUNT_OFFSET, HEADER_LEN, MAX_COUNT};
use crate::pattern::ArrayRegion;
use crate::record::serialize_records;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Union of `existing` and `additions`, keeping first-seen order
///
/// Returns the merged list and how many identifiers were genuinely new.
/// Duplicates are removed from both inputs.
pub fn merge<S: AsRef<str>>(existing: &[String], additions: &[S]) -> (Vec<String>, usize) {
    let mut seen = HashSet::with_capacity(existing.len() + additions.len());
    let mut merged = Vec::with_capacity(existing.len() + additions.len());

    for id in existing
        .iter()
        .map(String::as_str)
        .chain(additions.iter().map(|id| id.as_ref()))
    {
        if seen.insert(id) {
            merged.push(id.to_string());
        }
    }

    let before = dedup_len(existing);
    let added = merged.len() - before;
    (merged, added)
}

fn dedup_len(ids: &[String]) -> usize {
    ids.iter().collect::<HashSet<_>>().len()
}

/// `existing` as a set, without `identifier`
///
/// Duplicates in `existing` are collapsed first, so the returned count is
/// 0 or 1.
pub fn without(existing: &[String], identifier: &str) -> (Vec<String>, usize) {
    let (unique, _) = merge::<&str>(existing, &[]);
    let before = unique.len();
    let remaining: Vec<String> = unique
        .into_iter()
        .filter(|id| id.as_str() != identifier)
        .collect();
    let removed = before - remaining.len();
    (remaining, removed)
}

/// Splice `identifiers` into `buffer` at `region` and patch the header
///
/// The returned buffer is `buffer[..payload_start] ++ records ++
/// buffer[end..]`. Header fields that would fall before offset 0 are
/// skipped.
pub fn rewrite<S: AsRef<str>>(
    buffer: &[u8],
    region: ArrayRegion,
    identifiers: &[S],
) -> Result<Vec<u8>> {
    if region.end > buffer.len() || region.payload_start() > region.end {
        return Err(FormatError::RegionOutOfBounds {
            start: region.start,
            end: region.end,
            len: buffer.len(),
        });
    }

    let records = serialize_records(identifiers);
    let mut updated =
        Vec::with_capacity(region.payload_start() + records.len() + buffer.len() - region.end);
    updated.extend_from_slice(&buffer[..region.payload_start()]);
    updated.extend_from_slice(&records);
    updated.extend_from_slice(&buffer[region.end..]);

    let count = identifiers.len();
    if count > MAX_COUNT {
        warn!(count, "record count exceeds the one-byte count field and wraps");
    }

    patch_header(&mut updated, region.start, count)?;

    debug!(
        count,
        old_len = buffer.len(),
        new_len = updated.len(),
        "rewrote ban list array"
    );
    Ok(updated)
}

fn patch_header(buffer: &mut [u8], start: usize, count: usize) -> Result<()> {
    if let Some(current) = ArrayHeader::read(buffer, start)? {
        ArrayHeader::for_count(count, current.opaque).write_at(buffer, start)?;
    } else if let Some(offset) = start.checked_sub(COUNT_OFFSET) {
        warn!(
            start,
            "start anchor within {HEADER_LEN} bytes of file start; allocation size not written"
        );
        buffer[offset] = count as u8;
    } else {
        warn!("start anchor at file start; header fields not written");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::header::allocation_size;
    use crate::pattern::{DELIMITER, END_ANCHOR, START_ANCHOR, locate};
    use crate::record::extract_identifiers;
    use pretty_assertions::assert_eq;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn save_with(list: &[&str]) -> Vec<u8> {
        let mut data = b"GVAS".to_vec();
        data.extend_from_slice(&allocation_size(list.len()).to_le_bytes());
        data.push(0x00);
        data.push(list.len() as u8);
        data.extend_from_slice(&START_ANCHOR);
        data.extend_from_slice(&serialize_records(list));
        data.extend_from_slice(&END_ANCHOR);
        data.extend_from_slice(b"None\0");
        data
    }

    #[test]
    fn test_merge_counts_new_only() {
        let existing = ids(&["a", "b"]);
        let (merged, added) = merge(&existing, &["b", "c", "c", "d"]);
        assert_eq!(merged, ids(&["a", "b", "c", "d"]));
        assert_eq!(added, 2);
    }

    #[test]
    fn test_merge_collapses_existing_duplicates() {
        let existing = ids(&["a", "a", "b"]);
        let (merged, added) = merge::<&str>(&existing, &[]);
        assert_eq!(merged, ids(&["a", "b"]));
        assert_eq!(added, 0);
    }

    #[test]
    fn test_without() {
        let existing = ids(&["a", "b", "c"]);
        assert_eq!(without(&existing, "b"), (ids(&["a", "c"]), 1));
        assert_eq!(without(&existing, "z"), (existing.clone(), 0));
    }

    #[test]
    fn test_without_counts_stored_duplicates_once() {
        let existing = ids(&["a", "b", "a", "c"]);
        assert_eq!(without(&existing, "a"), (ids(&["b", "c"]), 1));
        assert_eq!(without(&existing, "z"), (ids(&["a", "b", "c"]), 0));
    }

    #[test]
    fn test_rewrite_patches_header() {
        let data = save_with(&["76561198000000001"]);
        let region = locate(&data).unwrap();

        let list = ["76561198000000001", "76561198000000002", "76561198000000003"];
        let updated = rewrite(&data, region, &list).unwrap();

        let region = locate(&updated).unwrap();
        assert_eq!(region.start, 10);
        assert_eq!(updated[region.start - 1], 3);
        assert_eq!(&updated[4..8], &70u32.to_le_bytes());
        assert_eq!(extract_identifiers(region.payload(&updated)), list);
        assert!(updated.ends_with(b"None\0"));
        assert!(updated.starts_with(b"GVAS"));
    }

    #[test]
    fn test_rewrite_to_empty_list() {
        let data = save_with(&["76561198000000001", "76561198000000002"]);
        let region = locate(&data).unwrap();

        let updated = rewrite::<&str>(&data, region, &[]).unwrap();
        assert_eq!(updated, save_with(&[]));
    }

    #[test]
    fn test_rewrite_same_list_is_identity() {
        let list = ["76561198000000001", "76561198000000002"];
        let data = save_with(&list);
        let region = locate(&data).unwrap();

        assert_eq!(rewrite(&data, region, &list).unwrap(), data);
    }

    #[test]
    fn test_rewrite_without_room_for_header() {
        let mut data = START_ANCHOR.to_vec();
        data.extend_from_slice(b"76561198000000001");
        data.extend_from_slice(&END_ANCHOR);
        let region = locate(&data).unwrap();
        assert_eq!(region.start, 0);

        let updated = rewrite(&data, region, &["76561198000000001", "76561198000000002"]).unwrap();
        let mut expected = START_ANCHOR.to_vec();
        expected.extend_from_slice(b"76561198000000001");
        expected.extend_from_slice(&DELIMITER);
        expected.extend_from_slice(b"76561198000000002");
        expected.extend_from_slice(&END_ANCHOR);
        assert_eq!(updated, expected);
    }

    #[test]
    fn test_rewrite_count_byte_only() {
        let mut data = vec![0x09, 0x09, 0x09];
        data.extend_from_slice(&START_ANCHOR);
        data.extend_from_slice(&END_ANCHOR);
        let region = locate(&data).unwrap();

        let updated = rewrite(&data, region, &["76561198000000001"]).unwrap();
        assert_eq!(&updated[..3], &[0x09, 0x09, 0x01]);
    }

    #[test]
    fn test_rewrite_rejects_region_outside_buffer() {
        let data = save_with(&[]);
        let region = ArrayRegion::new(10, data.len() + 10).unwrap();
        assert!(matches!(
            rewrite::<&str>(&data, region, &[]),
            Err(FormatError::RegionOutOfBounds { .. })
        ));
    }
}
