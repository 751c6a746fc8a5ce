//! Song header assembly with per-song content-addressed reuse

use crate::error::{Error, Result};
use crate::image::{rom_to_cpu, Image};
use crate::music::alloc::SegmentAllocator;
use crate::music::tables::{REST_CODE, STOP_CODE};
use crate::music::Layout;
use std::collections::HashMap;

/// The four channel byte streams of one song
#[derive(Debug, Clone, Default)]
pub struct Channels {
    pub melody: Vec<u8>,
    pub harmony: Vec<u8>,
    pub bass: Vec<u8>,
    pub noise: Vec<u8>,
}

fn offset_byte(offset: usize) -> Result<u8> {
    u8::try_from(offset).map_err(|_| Error::OffsetOutOfRange { offset })
}

/// Write one song's channel data and six-byte header record.
///
/// Channel streams that are byte-identical to one already written *for this
/// song* are not rewritten; the header just points at the earlier copy. The
/// reuse map lives and dies inside this call, so streams are never shared
/// across songs.
///
/// Returns the header's offset from the song-index table base, the byte to
/// store in a table slot.
pub fn write_song(
    image: &mut Image,
    alloc: &mut SegmentAllocator,
    layout: &Layout,
    name: &str,
    speed: u8,
    channels: &Channels,
) -> Result<u8> {
    // The player crashes on a zero-length noise region.
    let noise: &[u8] = if channels.noise.is_empty() {
        &[REST_CODE]
    } else {
        &channels.noise
    };

    let mut terminated = channels.melody.clone();
    terminated.push(STOP_CODE);
    let melody_addr = alloc.write_data(image, &terminated)?;

    let mut parts: HashMap<&[u8], usize> = HashMap::new();
    parts.insert(channels.melody.as_slice(), melody_addr);

    let bass_addr = match parts.get(channels.bass.as_slice()) {
        Some(&addr) => addr,
        None => {
            let addr = alloc.write_data(image, &channels.bass)?;
            parts.insert(channels.bass.as_slice(), addr);
            addr
        }
    };
    let harmony_addr = match parts.get(channels.harmony.as_slice()) {
        Some(&addr) => addr,
        None => {
            let addr = alloc.write_data(image, &channels.harmony)?;
            parts.insert(channels.harmony.as_slice(), addr);
            addr
        }
    };
    let noise_addr = match parts.get(noise) {
        Some(&addr) => addr,
        None => {
            let mut terminated = noise.to_vec();
            terminated.push(STOP_CODE);
            alloc.write_data(image, &terminated)?
        }
    };

    let cpu_base = rom_to_cpu(melody_addr);
    let header = [
        speed,
        (cpu_base & 0xFF) as u8,
        (cpu_base >> 8) as u8,
        offset_byte(bass_addr - melody_addr)?,
        offset_byte(harmony_addr - melody_addr)?,
        offset_byte(noise_addr - melody_addr)?,
    ];
    let header_addr = alloc.write_header(image, &header)?;
    let index = offset_byte(header_addr - layout.song_table)?;

    println!(
        "song {:<16} mel={:04x} bass={:04x} harm={:04x} noise={:04x} -> index {:02x}",
        name, melody_addr, bass_addr, harmony_addr, noise_addr, index
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MAGIC;

    fn fixture() -> (Image, Layout, SegmentAllocator) {
        let mut data = vec![0u8; 0x8000];
        data[0..3].copy_from_slice(&MAGIC);
        let image = Image::from_bytes(data).unwrap();
        let layout = Layout::smb();
        let alloc = SegmentAllocator::new(&layout);
        (image, layout, alloc)
    }

    #[test]
    fn test_identical_bass_reuses_the_melody_stream() {
        let (mut image, layout, mut alloc) = fixture();
        let channels = Channels {
            melody: vec![0x82, 0x64],
            harmony: vec![0xB0],
            bass: vec![0x82, 0x64],
            noise: vec![],
        };
        write_song(&mut image, &mut alloc, &layout, "dup", 0x20, &channels).unwrap();

        let header = image.slice(layout.song_headers(), 6);
        assert_eq!(header[0], 0x20);
        assert_eq!(header[3], 0, "bass offset must alias the melody base");
        assert_ne!(header[4], 0);
    }

    #[test]
    fn test_distinct_streams_allocate_in_order() {
        let (mut image, layout, mut alloc) = fixture();
        let channels = Channels {
            melody: vec![0x82, 0x64],
            harmony: vec![0xB0],
            bass: vec![0x82, 0x48],
            noise: vec![0xA0],
        };
        write_song(&mut image, &mut alloc, &layout, "distinct", 0x18, &channels)
            .unwrap();

        let header = image.slice(layout.song_headers(), 6);
        let bass = header[3];
        let harmony = header[4];
        let noise = header[5];
        assert!(0 < bass && bass < harmony && harmony < noise);
        // Melody is terminated, bass is not.
        assert_eq!(bass as usize, channels.melody.len() + 1);
    }

    #[test]
    fn test_header_encodes_the_cpu_base_address() {
        let (mut image, layout, mut alloc) = fixture();
        let channels = Channels {
            melody: vec![0x82, 0x64],
            ..Default::default()
        };
        write_song(&mut image, &mut alloc, &layout, "base", 0x20, &channels).unwrap();

        let header = image.slice(layout.song_headers(), 6);
        let cpu = (header[1] as usize) | ((header[2] as usize) << 8);
        assert_eq!(cpu, rom_to_cpu(layout.music_data));
    }

    #[test]
    fn test_no_memoization_across_calls() {
        let (mut image, layout, mut alloc) = fixture();
        let channels = Channels {
            melody: vec![0x82, 0x64],
            harmony: vec![0xB0],
            bass: vec![0x82, 0x48],
            noise: vec![],
        };
        let a = write_song(&mut image, &mut alloc, &layout, "one", 0x20, &channels)
            .unwrap();
        let b = write_song(&mut image, &mut alloc, &layout, "two", 0x20, &channels)
            .unwrap();
        assert_ne!(a, b, "each call gets its own header record");
        assert_eq!(b - a, 6);

        let first = image.slice(layout.song_table + a as usize, 6).to_vec();
        let second = image.slice(layout.song_table + b as usize, 6);
        // Same shape, different base address.
        assert_eq!(first[0], second[0]);
        assert_ne!(&first[1..3], &second[1..3]);
    }

    #[test]
    fn test_empty_noise_gets_a_placeholder() {
        let (mut image, layout, mut alloc) = fixture();
        let channels = Channels {
            melody: vec![0x82, 0x64],
            harmony: vec![0xB0],
            bass: vec![0x82, 0x48],
            noise: vec![],
        };
        write_song(&mut image, &mut alloc, &layout, "quiet", 0x20, &channels).unwrap();

        let header = image.slice(layout.song_headers(), 6);
        let noise_addr = layout.music_data + header[5] as usize;
        assert_eq!(image.slice(noise_addr, 2), &[REST_CODE, STOP_CODE]);
    }
}
