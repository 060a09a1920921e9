//! Array header fields preceding the start anchor
//!
//! Two fields before the start anchor are derived from the record list and
//! must be rewritten whenever the list changes:
//!
//! ```text
//! start - 6  u32 LE  allocation size (22 * count + 4)
//! start - 2  u8      opaque, preserved as-is
//! start - 1  u8      record count (low byte)
//! start      start anchor
//! ```
//!
//! The count is written as a single byte, so lists longer than 255 entries
//! wrap. The allocation size assumes every record is followed by a
//! delimiter, even though the serialized list has no trailing one.

use crate::error::{FormatError, Result};
use crate::record::RECORD_LEN;
use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

/// Bytes accounted per record in the allocation size (identifier + delimiter)
pub const RECORD_STRIDE: u32 = 22;

/// Fixed trailer added to the allocation size
pub const ALLOCATION_TRAILER: u32 = 4;

/// Size of the full header in bytes
pub const HEADER_LEN: usize = 6;

/// Offset of the count byte before the start anchor
pub const COUNT_OFFSET: usize = 1;

/// Largest count that survives the one-byte count field
pub const MAX_COUNT: usize = u8::MAX as usize;

const _: () = assert!(RECORD_STRIDE as usize == RECORD_LEN + crate::pattern::DELIMITER.len());

/// Header fields stored immediately before the start anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(little)]
#[bw(little)]
pub struct ArrayHeader {
    /// Declared allocation size of the array
    pub allocation_size: u32,
    /// Byte between the two fields, never modified
    pub opaque: u8,
    /// Low byte of the record count
    pub count: u8,
}

impl ArrayHeader {
    /// Header describing `count` records, keeping an existing opaque byte
    pub fn for_count(count: usize, opaque: u8) -> Self {
        Self {
            allocation_size: allocation_size(count),
            opaque,
            count: count as u8,
        }
    }

    /// Read the header ending at `start`, if the buffer has room for it
    pub fn read(buffer: &[u8], start: usize) -> Result<Option<Self>> {
        let Some(offset) = start.checked_sub(HEADER_LEN) else {
            return Ok(None);
        };
        let Some(bytes) = buffer.get(offset..start) else {
            return Ok(None);
        };

        let mut cursor = Cursor::new(bytes);
        Ok(Some(Self::read_le(&mut cursor)?))
    }

    /// Write the header so that it ends at `start`
    ///
    /// Fails with `RegionOutOfBounds` when the six header bytes do not fit
    /// in `buffer` before `start`.
    pub fn write_at(&self, buffer: &mut [u8], start: usize) -> Result<()> {
        let len = buffer.len();
        let Some(bytes) = start
            .checked_sub(HEADER_LEN)
            .and_then(|offset| buffer.get_mut(offset..start))
        else {
            return Err(FormatError::RegionOutOfBounds {
                start: start.saturating_sub(HEADER_LEN),
                end: start,
                len,
            });
        };
        let mut cursor = Cursor::new(bytes);
        self.write_le(&mut cursor)?;
        Ok(())
    }
}

/// Allocation size for `count` records
pub fn allocation_size(count: usize) -> u32 {
    RECORD_STRIDE
        .wrapping_mul(count as u32)
        .wrapping_add(ALLOCATION_TRAILER)
}
