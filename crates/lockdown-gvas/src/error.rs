//! Error types for ban list decoding and re-serialization

use thiserror::Error;

/// Errors that can occur when decoding or rewriting the ban list array
#[derive(Debug, Error)]
pub enum FormatError {
    /// Neither the anchor layout nor any recovery strategy matched
    #[error(
        "ban list array not found in {len}-byte save (start anchor: {}, end anchor: {})",
        describe_offset(*.start),
        describe_offset(*.end)
    )]
    InvalidFileFormat {
        /// Length of the scanned buffer
        len: usize,
        /// Offset of the start anchor, if one was found
        start: Option<usize>,
        /// Offset of the end anchor, if one was found
        end: Option<usize>,
    },

    /// Identifiers were recovered heuristically, but no array region was
    /// located, so there is nowhere to splice a new list
    #[error("ban list array region not located in {len}-byte save; refusing to write")]
    RegionNotWritable {
        /// Length of the scanned buffer
        len: usize,
    },

    /// Region bounds do not fit the buffer being rewritten
    #[error("array region {start}..{end} does not fit a {len}-byte save")]
    RegionOutOfBounds {
        /// Start anchor offset
        start: usize,
        /// End anchor offset
        end: usize,
        /// Length of the buffer
        len: usize,
    },

    /// `BinRw` reading/writing error on the array header
    #[error("Binary format error: {0}")]
    BinRw(#[from] binrw::Error),
}

fn describe_offset(offset: Option<usize>) -> String {
    offset.map_or_else(|| "not found".to_string(), |o| format!("0x{o:x}"))
}

/// Type alias for codec results
pub type Result<T> = std::result::Result<T, FormatError>;
