//! Anchor patterns and the locator for the ban list array
//!
//! The save file is never parsed as a whole. The ban list array is found by
//! two short byte anchors that bracket it:
//!
//! ```text
//! ... [alloc u32 LE][?? u8][count u8][00 00 00 12 00 00 00] id [00 12 00 00 00] id ... [00 05 00 00 00] ...
//!                                     ^ start anchor                                    ^ end anchor
//! ```
//!
//! The end anchor is searched backward from the end of the buffer, then the
//! start anchor backward from just before it. Anchors may occur more than
//! once; the occurrence nearest the end of the file always wins.

use tracing::debug;

/// Start anchor, immediately preceding the first record
pub const START_ANCHOR: [u8; 7] = [0x00, 0x00, 0x00, 0x12, 0x00, 0x00, 0x00];

/// End anchor, immediately following the last record
pub const END_ANCHOR: [u8; 5] = [0x00, 0x05, 0x00, 0x00, 0x00];

/// Delimiter between two consecutive records
pub const DELIMITER: [u8; 5] = [0x00, 0x12, 0x00, 0x00, 0x00];

/// Bounds of the identifier array inside a save buffer
///
/// `start` is the offset of the start anchor (or the offset the canonical
/// anchor would have, when a shorter variant matched) and `end` is the
/// offset of the end anchor. Records live in `start + START_ANCHOR.len()..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayRegion {
    /// Offset of the start anchor
    pub start: usize,
    /// Offset of the end anchor
    pub end: usize,
}

impl ArrayRegion {
    /// Build a region, rejecting anchor pairs that overlap or are out of order
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start + START_ANCHOR.len() <= end).then_some(Self { start, end })
    }

    /// First byte of the record payload
    pub fn payload_start(&self) -> usize {
        self.start + START_ANCHOR.len()
    }

    /// Record payload between the two anchors, exclusive of both
    pub fn payload<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.payload_start()..self.end]
    }
}

/// Anchor offsets seen while locating the array
///
/// Kept for diagnostics and handed to the recovery chain when the
/// canonical layout does not produce a valid region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorProbe {
    /// Offset of the last end anchor in the buffer
    pub end: Option<usize>,
    /// Offset of the start anchor found backward from `end`
    pub start: Option<usize>,
}

/// Find the last occurrence of `pattern` that begins at or before `origin`
///
/// `origin` defaults to the last offset where the pattern still fits.
/// Matches are compared byte for byte; the buffer is not assumed to hold
/// text.
pub fn rfind(buffer: &[u8], pattern: &[u8], origin: Option<usize>) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() {
        return None;
    }

    let last_fit = buffer.len() - pattern.len();
    let from = origin.map_or(last_fit, |o| o.min(last_fit));

    (0..=from)
        .rev()
        .find(|&i| &buffer[i..i + pattern.len()] == pattern)
}

/// Find the first occurrence of `pattern` that begins at or after `from`
pub fn find(buffer: &[u8], pattern: &[u8], from: usize) -> Option<usize> {
    if pattern.is_empty() || buffer.len() < pattern.len() || from > buffer.len() - pattern.len() {
        return None;
    }

    buffer[from..]
        .windows(pattern.len())
        .position(|window| window == pattern)
        .map(|pos| from + pos)
}

/// Search origin for a start anchor that must begin before `end`
fn before(end: usize) -> Option<usize> {
    end.checked_sub(1)
}

/// Locate the array region with the canonical anchor layout
///
/// Returns the probe on failure so the caller can hand the offsets that
/// were found to the recovery chain.
pub fn locate(buffer: &[u8]) -> Result<ArrayRegion, AnchorProbe> {
    let mut probe = AnchorProbe {
        end: rfind(buffer, &END_ANCHOR, None),
        start: None,
    };

    let Some(end) = probe.end else {
        debug!(len = buffer.len(), "end anchor not found");
        return Err(probe);
    };

    let Some(origin) = before(end) else {
        return Err(probe);
    };

    probe.start = rfind(buffer, &START_ANCHOR, Some(origin));
    let Some(start) = probe.start else {
        debug!(end, "start anchor not found before end anchor");
        return Err(probe);
    };

    ArrayRegion::new(start, end).ok_or_else(|| {
        debug!(start, end, "anchors overlap or are out of order");
        probe
    })
}
