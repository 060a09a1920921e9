//! Community ban list decoding.
//!
//! The community list is plain text with one base64-encoded Steam64 ID per
//! line. Each line is decoded on its own; a bad line is skipped, not fatal.
//! Fetching the list is left to the caller.

use base64::{Engine as _, engine::general_purpose};
use tracing::warn;

/// Decode a community list into identifiers, in line order.
///
/// Lines are trimmed and blank lines ignored. Decoded identifiers are not
/// shape-checked here.
pub fn decode_community_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .filter_map(|(index, line)| match decode_line(line) {
            Some(id) => Some(id),
            None => {
                warn!(line = index + 1, "skipping undecodable community list entry");
                None
            }
        })
        .collect()
}

fn decode_line(line: &str) -> Option<String> {
    let bytes = general_purpose::STANDARD.decode(line).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    Some(text.trim().to_string())
}
