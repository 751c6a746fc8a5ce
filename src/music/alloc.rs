//! Bump allocation of the header and data regions

use crate::error::{Error, Result};
use crate::image::Image;
use crate::music::Layout;

/// Append-only cursors over the two music regions of the image.
///
/// The allocator is deliberately dumb: every write lands at the cursor and
/// advances it. Content-addressed reuse is the caller's concern.
pub struct SegmentAllocator {
    header_pos: usize,
    data_pos: usize,
    data_end: usize,
}

impl SegmentAllocator {
    pub fn new(layout: &Layout) -> Self {
        Self {
            header_pos: layout.song_headers(),
            data_pos: layout.music_data,
            data_end: layout.music_data + layout.music_data_size,
        }
    }

    /// Append a header record, returning its address
    pub fn write_header(&mut self, image: &mut Image, bytes: &[u8]) -> Result<usize> {
        let at = self.header_pos;
        self.header_pos += image.write(at, bytes.len(), bytes)?;
        Ok(at)
    }

    /// Append a channel data stream, returning its address.
    ///
    /// The write is refused outright if it would run past the data region:
    /// the bytes beyond it belong to other parts of the image.
    pub fn write_data(&mut self, image: &mut Image, bytes: &[u8]) -> Result<usize> {
        let at = self.data_pos;
        if at + bytes.len() > self.data_end {
            return Err(Error::DataCapacity {
                need: bytes.len(),
                capacity: self.data_end - at,
            });
        }
        self.data_pos += image.write(at, bytes.len(), bytes)?;
        Ok(at)
    }

    /// Bytes left in the data region
    pub fn data_remaining(&self) -> usize {
        self.data_end - self.data_pos
    }
}
