//! Decoded view of a patched song table
//!
//! Walks the song-index table backwards through the header records and
//! channel streams, turning bytes back into notation tokens. Serialized by
//! the `rom2json` tool and used by the end-to-end tests.

use crate::error::{Error, Result};
use crate::image::{cpu_to_rom, Image, PRG_BANK_BASE};
use crate::music::tables::{harmony_parts, pitch_name, Duration, STOP_CODE};
use crate::music::Layout;
use serde::Serialize;

/// Decoded song-index table and every song it references
#[derive(Debug, Clone, Serialize)]
pub struct SongTableReport {
    /// Raw slot bytes in table order
    pub slots: Vec<u8>,
    /// Distinct referenced songs, in index order
    pub songs: Vec<SongReport>,
}

/// One decoded header record and its channel streams
#[derive(Debug, Clone, Serialize)]
pub struct SongReport {
    /// Byte stored in the song-index table
    pub index: u8,
    pub speed: u8,
    /// Melody base in the CPU address space
    pub base_cpu: u16,
    pub bass_offset: u8,
    pub harmony_offset: u8,
    pub noise_offset: u8,
    /// Melody stream decoded back to one token per pattern row
    pub melody_rows: Vec<String>,
    pub harmony_rows: Vec<String>,
    pub bass_rows: Vec<String>,
    pub noise_rows: Vec<String>,
}

impl SongTableReport {
    pub fn decode(image: &Image, layout: &Layout) -> Result<Self> {
        // The whole layout has to fit before any region is sliced.
        let needed = layout.music_data + layout.music_data_size;
        if image.len() < needed {
            return Err(Error::LengthMismatch {
                expected: needed,
                actual: image.len(),
            });
        }

        let slots = image
            .slice(layout.song_table, layout.song_table_size)
            .to_vec();

        let mut indices: Vec<u8> = slots.clone();
        indices.sort_unstable();
        indices.dedup();

        let songs = indices
            .into_iter()
            .map(|index| SongReport::decode(image, layout, index))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { slots, songs })
    }
}

impl SongReport {
    pub fn decode(image: &Image, layout: &Layout, index: u8) -> Result<Self> {
        let header = image.slice(layout.song_table + index as usize, 6);
        let speed = header[0];
        let base_cpu = (header[1] as u16) | ((header[2] as u16) << 8);
        let bass_offset = header[3];
        let harmony_offset = header[4];
        let noise_offset = header[5];

        // Arbitrary images can carry headers pointing anywhere; refuse bases
        // that would leave the data region rather than decode garbage.
        let bad_header = || Error::BadHeader { index, base_cpu };
        if (base_cpu as usize) < PRG_BANK_BASE {
            return Err(bad_header());
        }
        let base = cpu_to_rom(base_cpu as usize);
        let starts = [
            base,
            base + bass_offset as usize,
            base + harmony_offset as usize,
            base + noise_offset as usize,
        ];
        let region_end = layout.music_data + layout.music_data_size;
        if base < layout.music_data || starts.iter().any(|&s| s >= region_end) {
            return Err(bad_header());
        }
        let extent = |start: usize| stream_extent(image, &starts, region_end, start);

        Ok(Self {
            index,
            speed,
            base_cpu,
            bass_offset,
            harmony_offset,
            noise_offset,
            melody_rows: decode_melodic(extent(starts[0])),
            bass_rows: decode_melodic(extent(starts[1])),
            harmony_rows: decode_percussive(extent(starts[2])),
            noise_rows: decode_percussive(extent(starts[3])),
        })
    }
}

/// A stream without its own terminator ends where the next allocated stream
/// begins; failing that, decoding stops at the first stop byte.
fn stream_extent<'a>(
    image: &'a Image,
    starts: &[usize; 4],
    region_end: usize,
    start: usize,
) -> &'a [u8] {
    let end = starts
        .iter()
        .copied()
        .filter(|&s| s > start)
        .min()
        .unwrap_or(region_end);
    image.slice(start, end - start)
}

fn push_run(rows: &mut Vec<String>, token: &str, len: usize) {
    if token == "..." {
        rows.extend(std::iter::repeat("...".to_string()).take(len));
    } else {
        rows.push(token.to_string());
        rows.extend(std::iter::repeat("...".to_string()).take(len - 1));
    }
}

/// Decode a melodic stream (up to its terminator) back to pattern rows
fn decode_melodic(bytes: &[u8]) -> Vec<String> {
    let mut rows = Vec::new();
    let mut run_len = 1usize;
    for &byte in bytes {
        if byte == STOP_CODE {
            break;
        }
        if let Some(duration) = Duration::from_opcode(byte) {
            run_len = duration.run_length().unwrap_or(1);
        } else if let Some(token) = pitch_name(byte) {
            push_run(&mut rows, token, run_len);
        } else {
            break; // not a note stream
        }
    }
    rows
}

/// Decode a percussion stream back to pattern rows
fn decode_percussive(bytes: &[u8]) -> Vec<String> {
    let mut rows = Vec::new();
    for &byte in bytes {
        if byte == STOP_CODE {
            break;
        }
        let Some((duration, token)) = harmony_parts(byte) else {
            break;
        };
        push_run(&mut rows, token, duration.run_length().unwrap_or(1));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_melodic_expands_runs() {
        // q rest, s rest C-5  (five rests then a one-row note)
        let rows = decode_melodic(&[0x86, 0x04, 0x82, 0x04, 0x64, 0x00]);
        assert_eq!(rows, vec!["...", "...", "...", "...", "...", "C-5"]);
    }

    #[test]
    fn test_decode_melodic_sustained_note() {
        // i. C-5 = C-5 held three rows
        let rows = decode_melodic(&[0x85, 0x64, 0x00]);
        assert_eq!(rows, vec!["C-5", "...", "..."]);
    }

    #[test]
    fn test_decode_percussive() {
        // qO, s..., sK
        let rows = decode_percussive(&[0xB1, 0x84, 0xA0]);
        assert_eq!(rows, vec!["O", "...", "...", "...", "...", "K"]);
    }

    #[test]
    fn test_garbage_headers_are_refused() {
        use crate::image::MAGIC;

        let layout = Layout::smb();
        let mut data = vec![0u8; 0xA010];
        data[0..3].copy_from_slice(&MAGIC);
        let mut image = Image::from_bytes(data).unwrap();

        // Slot 0 points at an all-zero header: base address 0x0000 sits far
        // below the PRG bank and must not be translated.
        let err = SongReport::decode(&image, &layout, 0).unwrap_err();
        assert!(matches!(err, Error::BadHeader { index: 0, .. }));

        // A base past the end of the data region is refused too.
        image.set(layout.song_table + 1, 0xFF);
        image.set(layout.song_table + 2, 0xFF);
        let err = SongReport::decode(&image, &layout, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::BadHeader {
                index: 0,
                base_cpu: 0xFFFF
            }
        ));

        // The table walk surfaces the same error.
        assert!(SongTableReport::decode(&image, &layout).is_err());

        // A truncated image is rejected before any region is sliced.
        let mut short = vec![0u8; 0x100];
        short[0..3].copy_from_slice(&MAGIC);
        let short = Image::from_bytes(short).unwrap();
        assert!(matches!(
            SongTableReport::decode(&short, &layout),
            Err(Error::LengthMismatch { .. })
        ));
    }
}
