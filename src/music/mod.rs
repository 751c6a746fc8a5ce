//! Music compiler - notation to in-image tracker data
//!
//! Compilation runs in two strictly ordered phases. The clear phase writes a
//! silence song and points all 49 song-index slots at it, so the table never
//! holds an undefined index. The populate phase then compiles each piece from
//! the notation and relinks its slots.

pub mod alloc;
pub mod notation;
pub mod report;
pub mod rle;
pub mod song;
pub mod tables;

use crate::error::Result;
use crate::image::Image;
use alloc::SegmentAllocator;
use notation::{Notation, PatternRows};
use rle::Voice;
use song::{write_song, Channels};
use std::io::BufRead;
use tables::REST_CODE;

/// Speed byte for 150 BPM
pub const BPM150: u8 = 0x20;

/// Speed byte for 100 BPM
pub const BPM100: u8 = 0x18;

/// Fixed addresses of the music regions inside the image
#[derive(Debug, Clone)]
pub struct Layout {
    /// Base of the song-index table
    pub song_table: usize,
    /// Slots in the song-index table
    pub song_table_size: usize,
    /// First slot of the rotating overworld variations
    pub overworld_slots: usize,
    /// Slot of the underground theme
    pub underground_slot: usize,
    /// Base of the channel data region
    pub music_data: usize,
    /// Capacity of the channel data region in bytes
    pub music_data_size: usize,
}

impl Layout {
    /// Layout of the stock Super Mario Bros. PRG bank
    pub fn smb() -> Self {
        Self {
            song_table: 0x791D,
            song_table_size: 49,
            overworld_slots: 0x792D,
            underground_slot: 0x7927,
            music_data: 0x79C8,
            music_data_size: 1352,
        }
    }

    /// Base of the header region, immediately after the song-index table
    pub fn song_headers(&self) -> usize {
        self.song_table + self.song_table_size
    }
}

/// Compiles notation and patches the image's music regions
pub struct Patcher {
    layout: Layout,
}

impl Patcher {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Run the whole patch sequence against an in-memory image
    pub fn patch<R: BufRead>(&self, image: &mut Image, notation: R) -> Result<()> {
        let notation = Notation::parse(notation)?;
        let mut alloc = SegmentAllocator::new(&self.layout);
        self.clear(image, &mut alloc)?;
        self.populate(image, &mut alloc, &notation)
    }

    /// Clear phase: every slot points at a freshly written silence song
    fn clear(&self, image: &mut Image, alloc: &mut SegmentAllocator) -> Result<()> {
        let silence = Channels {
            melody: vec![REST_CODE],
            harmony: vec![REST_CODE],
            bass: vec![REST_CODE],
            noise: vec![REST_CODE],
        };
        let index = write_song(image, alloc, &self.layout, "Silence", BPM100, &silence)?;
        image.fill(self.layout.song_table, self.layout.song_table_size, index);
        Ok(())
    }

    /// Populate phase: compile the real pieces and relink their slots
    fn populate(
        &self,
        image: &mut Image,
        alloc: &mut SegmentAllocator,
        notation: &Notation,
    ) -> Result<()> {
        let ow = self.layout.overworld_slots;

        let intro = notation.require_pattern("overworld", 0)?;
        let index = self.compile(image, alloc, "Overworld Intro", BPM150, intro)?;
        image.set(ow, index);

        let a = notation.require_pattern("overworld", 1)?;
        let a = self.compile(image, alloc, "Overworld A", BPM150, a)?;
        let b = notation.require_pattern("overworld", 2)?;
        let b = self.compile(image, alloc, "Overworld B", BPM150, b)?;
        // The overworld theme rotates through aliased slots: intro, then
        // A B A B A B.
        for slot in [1, 3, 5] {
            image.set(ow + slot, a);
        }
        for slot in [2, 4, 6] {
            image.set(ow + slot, b);
        }

        let underground = notation.require_pattern("underground", 0)?;
        let index = self.compile(image, alloc, "Underground", BPM150, underground)?;
        image.set(self.layout.underground_slot, index);

        Ok(())
    }

    /// Compile one pattern into a song and return its table index
    fn compile(
        &self,
        image: &mut Image,
        alloc: &mut SegmentAllocator,
        name: &str,
        speed: u8,
        pattern: &PatternRows,
    ) -> Result<u8> {
        let len = pattern.cut_len();
        let channels = Channels {
            harmony: rle::compress(&pattern.column(0)[..len], Voice::Percussive)?,
            melody: rle::compress(&pattern.column(1)[..len], Voice::Melodic)?,
            bass: rle::compress(&pattern.column(2)[..len], Voice::Melodic)?,
            noise: Vec::new(),
        };
        write_song(image, alloc, &self.layout, name, speed, &channels)
    }
}
