//! Recovery strategies for saves that deviate from the canonical layout
//!
//! When the locator cannot produce a valid anchor pair, the strategies below
//! are tried in order and the first one that yields identifiers wins. The
//! chain is plain data ([`STRATEGIES`]); adding or reordering a heuristic
//! does not touch the driver.
//!
//! Only the anchor-based strategies recover an [`ArrayRegion`]. The
//! shape-based ones read identifiers but give the mutator nothing to splice
//! into.

use crate::pattern::{AnchorProbe, ArrayRegion, END_ANCHOR, START_ANCHOR, find, rfind};
use crate::record::{RECORD_LEN, extract_identifiers, is_identifier_shaped};
use std::fmt;
use tracing::debug;

/// Shorter start anchors tried when the canonical one is missing
///
/// These are the canonical anchor with leading zero bytes stripped. A
/// count byte above zero directly before the anchor (lists of 256 entries
/// or more) hides the canonical pattern but leaves these intact.
pub const START_ANCHOR_VARIANTS: &[&[u8]] = &[&[0x00, 0x00, 0x12, 0x00, 0x00, 0x00]];

/// Bytes scanned before the end anchor by the windowed strategy
pub const SCAN_WINDOW: usize = 500;

/// Bytes skipped past a windowed hit, on top of the regular one-byte step
pub const WINDOW_HIT_SKIP: usize = 16;

/// Name fragment searched for by the marker strategy
///
/// This is not the array property's field name. It matches the save's
/// class path (`/Script/LockdownProtocol.Save_BanList_C`) in the GVAS
/// header, which also appears in the file name, so the scan starts ahead
/// of the property data whatever the field is called.
pub const FIELD_MARKER: &[u8] = b"BanList";

/// Identifies a recovery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// First start anchor in the buffer, then the next end anchor after it
    ForwardAnchors,
    /// Backward search from the end anchor with shorter start anchors
    AnchorVariants,
    /// Identifier-shaped text in a fixed window before the end anchor
    WindowScan,
    /// Identifier-shaped text after the save class name marker
    MarkerScan,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ForwardAnchors => "forward anchor scan",
            Self::AnchorVariants => "start anchor variants",
            Self::WindowScan => "windowed identifier scan",
            Self::MarkerScan => "field marker scan",
        };
        f.write_str(name)
    }
}

/// Identifiers recovered by a strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recovered {
    /// Strategy that produced the result
    pub strategy: Strategy,
    /// Array bounds, when the strategy located both anchors
    pub region: Option<ArrayRegion>,
    /// Recovered identifiers in buffer order
    pub identifiers: Vec<String>,
}

type StrategyFn = fn(&[u8], &AnchorProbe) -> Option<Recovered>;

/// Recovery chain in priority order
pub const STRATEGIES: &[(Strategy, StrategyFn)] = &[
    (Strategy::ForwardAnchors, forward_anchors),
    (Strategy::AnchorVariants, anchor_variants),
    (Strategy::WindowScan, window_scan),
    (Strategy::MarkerScan, marker_scan),
];

/// Run the recovery chain, returning the first strategy that succeeds
pub fn recover(buffer: &[u8], probe: &AnchorProbe) -> Option<Recovered> {
    STRATEGIES.iter().find_map(|(strategy, run)| {
        let recovered = run(buffer, probe);
        if recovered.is_none() {
            debug!(%strategy, "recovery strategy not applicable");
        }
        recovered
    })
}

fn from_region(buffer: &[u8], strategy: Strategy, region: ArrayRegion) -> Recovered {
    Recovered {
        strategy,
        region: Some(region),
        identifiers: extract_identifiers(region.payload(buffer)),
    }
}

/// Start anchor searched from the front, end anchor searched forward from it
pub fn forward_anchors(buffer: &[u8], _probe: &AnchorProbe) -> Option<Recovered> {
    let start = find(buffer, &START_ANCHOR, 0)?;
    let end = find(buffer, &END_ANCHOR, start + START_ANCHOR.len())?;
    let region = ArrayRegion::new(start, end)?;

    Some(from_region(buffer, Strategy::ForwardAnchors, region))
}

/// Shorter start anchors searched backward from the end anchor
///
/// The returned region is normalized to the offset the canonical anchor
/// would have, so the payload and header offsets stay the same.
pub fn anchor_variants(buffer: &[u8], probe: &AnchorProbe) -> Option<Recovered> {
    let end = probe.end?;
    let origin = end.checked_sub(1)?;

    START_ANCHOR_VARIANTS.iter().find_map(|variant| {
        let found = rfind(buffer, variant, Some(origin))?;
        let start = (found + variant.len()).checked_sub(START_ANCHOR.len())?;
        let region = ArrayRegion::new(start, end)?;
        Some(from_region(buffer, Strategy::AnchorVariants, region))
    })
}

/// Identifier-shaped text in the [`SCAN_WINDOW`] bytes before the end anchor
pub fn window_scan(buffer: &[u8], probe: &AnchorProbe) -> Option<Recovered> {
    let end = probe.end?;
    let mut pos = end.saturating_sub(SCAN_WINDOW);
    let mut identifiers = Vec::new();

    while pos + RECORD_LEN <= end {
        let window = &buffer[pos..pos + RECORD_LEN];
        if is_identifier_shaped(window) {
            identifiers.push(String::from_utf8_lossy(window).into_owned());
            pos += WINDOW_HIT_SKIP;
        }
        pos += 1;
    }

    (!identifiers.is_empty()).then_some(Recovered {
        strategy: Strategy::WindowScan,
        region: None,
        identifiers,
    })
}

/// Identifier-shaped text anywhere after [`FIELD_MARKER`]
pub fn marker_scan(buffer: &[u8], _probe: &AnchorProbe) -> Option<Recovered> {
    let marker = find(buffer, FIELD_MARKER, 0)?;
    let mut pos = marker + FIELD_MARKER.len();
    let mut identifiers = Vec::new();

    while pos + RECORD_LEN <= buffer.len() {
        let window = &buffer[pos..pos + RECORD_LEN];
        if is_identifier_shaped(window) {
            identifiers.push(String::from_utf8_lossy(window).into_owned());
            pos += RECORD_LEN;
        } else {
            pos += 1;
        }
    }

    (!identifiers.is_empty()).then_some(Recovered {
        strategy: Strategy::MarkerScan,
        region: None,
        identifiers,
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pattern::{DELIMITER, locate};
    use pretty_assertions::assert_eq;

    const ID1: &[u8; 17] = b"76561198000000001";
    const ID2: &[u8; 17] = b"76561198000000002";

    fn probe_for(buffer: &[u8]) -> AnchorProbe {
        locate(buffer).unwrap_err()
    }

    #[test]
    fn test_forward_anchors_skips_overlapping_tail() {
        let mut data = vec![0xAA; 6];
        data.extend_from_slice(&START_ANCHOR);
        data.extend_from_slice(ID1);
        data.extend_from_slice(&END_ANCHOR);
        data.extend_from_slice(&[0xCC; 3]);
        // Start anchor whose last byte doubles as the first byte of an end anchor
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x12, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00]);

        let probe = probe_for(&data);
        let recovered = recover(&data, &probe).unwrap();
        assert_eq!(recovered.strategy, Strategy::ForwardAnchors);
        assert_eq!(recovered.region, ArrayRegion::new(6, 6 + 7 + 17));
        assert_eq!(recovered.identifiers, vec!["76561198000000001"]);
    }

    #[test]
    fn test_forward_anchors_requires_end_after_start() {
        let mut data = END_ANCHOR.to_vec();
        data.extend_from_slice(&START_ANCHOR);
        data.extend_from_slice(ID1);

        assert!(forward_anchors(&data, &AnchorProbe::default()).is_none());
    }

    #[test]
    fn test_anchor_variants_with_nonzero_high_count_byte() {
        let mut data = vec![0xAA; 6];
        // Count 0x0100: low byte before the anchor, high byte breaks the canonical pattern
        data.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x12, 0x00, 0x00, 0x00]);
        data.extend_from_slice(ID1);
        data.extend_from_slice(&DELIMITER);
        data.extend_from_slice(ID2);
        data.extend_from_slice(&END_ANCHOR);

        let probe = probe_for(&data);
        assert_eq!(probe.start, None);

        let recovered = recover(&data, &probe).unwrap();
        assert_eq!(recovered.strategy, Strategy::AnchorVariants);
        let region = recovered.region.unwrap();
        assert_eq!(region.start, 7);
        assert_eq!(region.payload_start(), 6 + 8);
        assert_eq!(
            recovered.identifiers,
            vec!["76561198000000001", "76561198000000002"]
        );
    }

    #[test]
    fn test_window_scan_recovers_identifiers() {
        let mut data = vec![0x11; 600];
        data[100..117].copy_from_slice(ID1);
        data[300..317].copy_from_slice(ID2);
        // Outside the 500-byte window
        data[20..37].copy_from_slice(b"76561198000000099");
        data.extend_from_slice(&END_ANCHOR);

        let probe = probe_for(&data);
        let recovered = recover(&data, &probe).unwrap();
        assert_eq!(recovered.strategy, Strategy::WindowScan);
        assert_eq!(recovered.region, None);
        assert_eq!(
            recovered.identifiers,
            vec!["76561198000000001", "76561198000000002"]
        );
    }

    #[test]
    fn test_window_scan_adjacent_identifiers() {
        let mut data = Vec::new();
        data.extend_from_slice(ID1);
        data.extend_from_slice(ID2);
        data.extend_from_slice(&END_ANCHOR);

        let recovered = window_scan(&data, &probe_for(&data)).unwrap();
        assert_eq!(
            recovered.identifiers,
            vec!["76561198000000001", "76561198000000002"]
        );
    }

    #[test]
    fn test_window_scan_needs_end_anchor() {
        assert!(window_scan(ID1, &AnchorProbe::default()).is_none());
    }

    #[test]
    fn test_marker_scan_recovers_identifiers() {
        let mut data = b"junk 76561198000000077 ".to_vec();
        data.extend_from_slice(b"/Script/Game.BanList\0");
        data.extend_from_slice(&[0x00, 0x01, 0x02]);
        data.extend_from_slice(ID1);
        data.extend_from_slice(&[0x00, 0xFF]);
        data.extend_from_slice(ID2);

        let probe = probe_for(&data);
        assert_eq!(probe.end, None);

        let recovered = recover(&data, &probe).unwrap();
        assert_eq!(recovered.strategy, Strategy::MarkerScan);
        assert_eq!(recovered.region, None);
        assert_eq!(
            recovered.identifiers,
            vec!["76561198000000001", "76561198000000002"]
        );
    }

    #[test]
    fn test_marker_scan_from_class_path() {
        let mut data = b"GVAS\x02\x00\x00\x00".to_vec();
        data.extend_from_slice(b"\x28\x00\x00\x00/Script/LockdownProtocol.Save_BanList_C\x00");
        data.extend_from_slice(b"\x0e\x00\x00\x00BannedPlayers\x00");
        data.extend_from_slice(b"\x0e\x00\x00\x00ArrayProperty\x00");
        // Damaged anchors: neither the start nor the end pattern survives
        data.extend_from_slice(&[0x1A, 0x00, 0x00, 0x00, 0x00, 0x01, 0xFF, 0x12, 0x00]);
        data.extend_from_slice(ID1);
        data.extend_from_slice(&[0xFF, 0x05, 0x00]);
        data.extend_from_slice(b"None\x00");

        let probe = probe_for(&data);
        assert_eq!(probe, AnchorProbe::default());

        let recovered = recover(&data, &probe).unwrap();
        assert_eq!(recovered.strategy, Strategy::MarkerScan);
        assert_eq!(recovered.identifiers, vec!["76561198000000001"]);
    }

    #[test]
    fn test_recover_exhausted() {
        let data = b"nothing to see here, not even a marker".to_vec();
        assert!(recover(&data, &probe_for(&data)).is_none());
        assert!(recover(&[], &AnchorProbe::default()).is_none());
    }

    #[test]
    fn test_strategy_order() {
        let order: Vec<Strategy> = STRATEGIES.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            order,
            vec![
                Strategy::ForwardAnchors,
                Strategy::AnchorVariants,
                Strategy::WindowScan,
                Strategy::MarkerScan,
            ]
        );
    }
}
