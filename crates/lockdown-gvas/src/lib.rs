//! Codec for the ban list array embedded in Lockdown Protocol save files
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for one-byte count field
#![allow(clippy::doc_markdown)] // GVAS-specific terms don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
//! The save file is an opaque GVAS blob. This crate does not parse it;
//! it finds the ban list array by byte anchors, decodes the 17-byte
//! identifier records between them, and writes a new list back while
//! keeping the two derived header fields consistent.
//!
//! # Format
//!
//! ```text
//! [alloc u32 LE][?? u8][count u8][00 00 00 12 00 00 00]
//!     id [00 12 00 00 00] id [00 12 00 00 00] ... id [00 05 00 00 00]
//! ```
//!
//! - `alloc` is always `22 * count + 4`
//! - `count` is a single byte and wraps above 255 entries
//!
//! # Components
//!
//! - [`pattern`]: anchor constants and the backward-scanning locator
//! - [`record`]: record splitting, decoding and serialization
//! - [`recovery`]: prioritized heuristics for non-canonical saves
//! - [`header`]: the allocation and count fields before the start anchor
//! - [`mutator`]: merge/remove and buffer rewriting
//!
//! # Example
//!
//! ```rust
//! use lockdown_gvas::{ParseSource, mutator, parse};
//!
//! let mut save = vec![0u8; 6];
//! save.extend_from_slice(&lockdown_gvas::pattern::START_ANCHOR);
//! save.extend_from_slice(b"76561198000000001");
//! save.extend_from_slice(&lockdown_gvas::pattern::END_ANCHOR);
//!
//! let parsed = parse(&save)?;
//! assert_eq!(parsed.source, ParseSource::Canonical);
//! assert_eq!(parsed.identifiers, vec!["76561198000000001"]);
//!
//! let (list, added) = mutator::merge(&parsed.identifiers, &["76561198000000002"]);
//! assert_eq!(added, 1);
//!
//! let updated = mutator::rewrite(&save, parsed.writable_region()?, &list)?;
//! assert_eq!(parse(&updated)?.identifiers.len(), 2);
//! # Ok::<(), lockdown_gvas::FormatError>(())
//! ```

#![warn(missing_docs)]

/// Codec error types
pub mod error;
pub mod header;
/// List mutation and buffer rewriting
pub mod mutator;
pub mod pattern;
pub mod record;
/// Heuristic recovery for saves without a canonical anchor layout
pub mod recovery;

pub use error::{FormatError, Result};
pub use header::ArrayHeader;
pub use pattern::ArrayRegion;
pub use recovery::Strategy;

use tracing::{debug, warn};

/// How a parse result was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSource {
    /// Empty buffer, nothing to decode
    Empty,
    /// Canonical anchor layout
    Canonical,
    /// A recovery strategy
    Recovered(Strategy),
}

/// Ban list decoded from a save buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBanList {
    /// Array bounds, absent when no anchor pair was located
    pub region: Option<ArrayRegion>,
    /// Identifiers in buffer order
    pub identifiers: Vec<String>,
    /// How the identifiers were found
    pub source: ParseSource,
    /// Length of the buffer the list was decoded from
    pub buffer_len: usize,
}

impl ParsedBanList {
    /// Region to splice a new list into
    ///
    /// Fails when the identifiers were recovered without locating the array.
    pub fn writable_region(&self) -> Result<ArrayRegion> {
        self.region.ok_or(FormatError::RegionNotWritable {
            len: self.buffer_len,
        })
    }
}

/// Decode the ban list from a raw save buffer
///
/// Tries the canonical anchor layout first, then each recovery strategy in
/// order. An empty buffer decodes to an empty list.
pub fn parse(buffer: &[u8]) -> Result<ParsedBanList> {
    if buffer.is_empty() {
        return Ok(ParsedBanList {
            region: None,
            identifiers: Vec::new(),
            source: ParseSource::Empty,
            buffer_len: 0,
        });
    }

    let probe = match pattern::locate(buffer) {
        Ok(region) => {
            let identifiers = record::extract_identifiers(region.payload(buffer));
            debug!(
                start = region.start,
                end = region.end,
                count = identifiers.len(),
                "located ban list array"
            );
            check_declared_count(buffer, region, identifiers.len());
            return Ok(ParsedBanList {
                region: Some(region),
                identifiers,
                source: ParseSource::Canonical,
                buffer_len: buffer.len(),
            });
        }
        Err(probe) => probe,
    };

    let Some(recovered) = recovery::recover(buffer, &probe) else {
        // A start anchor with no end anchor after it is only seen scanning forward
        let start = probe
            .start
            .or_else(|| pattern::find(buffer, &pattern::START_ANCHOR, 0));
        return Err(FormatError::InvalidFileFormat {
            len: buffer.len(),
            start,
            end: probe.end,
        });
    };

    warn!(
        strategy = %recovered.strategy,
        count = recovered.identifiers.len(),
        writable = recovered.region.is_some(),
        "canonical layout not found, recovered ban list heuristically"
    );

    Ok(ParsedBanList {
        region: recovered.region,
        identifiers: recovered.identifiers,
        source: ParseSource::Recovered(recovered.strategy),
        buffer_len: buffer.len(),
    })
}

fn check_declared_count(buffer: &[u8], region: ArrayRegion, decoded: usize) {
    if let Ok(Some(header)) = ArrayHeader::read(buffer, region.start) {
        if usize::from(header.count) != decoded % 256 {
            debug!(
                declared = header.count,
                decoded, "declared record count differs from decoded records"
            );
        }
    }
}
