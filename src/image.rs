//! ROM image I/O and address translation

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// iNES image magic
pub const MAGIC: [u8; 3] = *b"NES";

/// CPU address of the PRG bank holding the music engine
pub const PRG_BANK_BASE: usize = 0x8000;

/// Size of the iNES format header preceding PRG data
pub const INES_HEADER_LEN: usize = 0x10;

/// Translate a CPU address to a raw image offset
pub fn cpu_to_rom(addr: usize) -> usize {
    addr - PRG_BANK_BASE + INES_HEADER_LEN
}

/// Translate a raw image offset to a CPU address
pub fn rom_to_cpu(addr: usize) -> usize {
    addr + PRG_BANK_BASE - INES_HEADER_LEN
}

/// The ROM image as a single mutable byte buffer
#[derive(Debug)]
pub struct Image {
    data: Vec<u8>,
}

impl Image {
    /// Take ownership of raw image bytes, validating the magic
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.len() < 3 || data[0..3] != MAGIC {
            let mut found = [0u8; 3];
            let n = data.len().min(3);
            found[..n].copy_from_slice(&data[..n]);
            return Err(Error::BadMagic { found });
        }
        Ok(Self { data })
    }

    /// Read a whole image file into memory
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_bytes(fs::read(path)?)
    }

    /// Write the whole image back out
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, &self.data)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, index: usize) -> u8 {
        self.data[index]
    }

    pub fn set(&mut self, index: usize, value: u8) {
        self.data[index] = value;
    }

    pub fn slice(&self, index: usize, len: usize) -> &[u8] {
        &self.data[index..index + len]
    }

    /// Read a little-endian u32
    pub fn read_u32(&self, index: usize) -> u32 {
        u32::from_le_bytes([
            self.data[index],
            self.data[index + 1],
            self.data[index + 2],
            self.data[index + 3],
        ])
    }

    /// Fixed-length write. Returns the number of bytes written.
    pub fn write(&mut self, index: usize, len: usize, data: &[u8]) -> Result<usize> {
        if data.len() != len {
            return Err(Error::LengthMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        self.data[index..index + len].copy_from_slice(data);
        Ok(len)
    }

    /// Fixed-length write, zero-filling past the end of `data`
    pub fn write_padded(&mut self, index: usize, len: usize, data: &[u8]) -> Result<usize> {
        if data.len() > len {
            return Err(Error::LengthMismatch {
                expected: len,
                actual: data.len(),
            });
        }
        self.data[index..index + data.len()].copy_from_slice(data);
        self.data[index + data.len()..index + len].fill(0);
        Ok(len)
    }

    /// Fill `len` consecutive bytes with one value
    pub fn fill(&mut self, index: usize, len: usize, value: u8) {
        self.data[index..index + len].fill(value);
    }
}
