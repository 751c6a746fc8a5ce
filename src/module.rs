//! Named-chunk accessors for FamiTracker module files
//!
//! Only the per-chunk view is modelled; parsing the surrounding container is
//! out of scope.

/// A named chunk of data from a FamiTracker module file
pub struct Chunk {
    pub name: String,
    pub version: u32,
    pub contents: Vec<u8>,
}

impl Chunk {
    pub fn new(name: String, version: u32, contents: Vec<u8>) -> Self {
        Self {
            name,
            version,
            contents,
        }
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.contents[index]
    }

    /// Read a little-endian u32
    pub fn u32(&self, index: usize) -> u32 {
        u32::from_le_bytes([
            self.contents[index],
            self.contents[index + 1],
            self.contents[index + 2],
            self.contents[index + 3],
        ])
    }

    pub fn string(&self, index: usize, len: usize) -> &[u8] {
        &self.contents[index..index + len]
    }

    /// NUL-terminated string starting at `index`
    pub fn c_string(&self, index: usize) -> Option<&[u8]> {
        let end = self.contents[index..].iter().position(|&b| b == 0)?;
        Some(&self.contents[index..index + end])
    }

    /// Iterate over `count` consecutive NUL-terminated strings
    pub fn c_strings(&self, index: usize, count: usize) -> CStrings<'_> {
        CStrings {
            chunk: self,
            index,
            remaining: count,
        }
    }
}

pub struct CStrings<'a> {
    chunk: &'a Chunk,
    index: usize,
    remaining: usize,
}

impl<'a> Iterator for CStrings<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let s = self.chunk.c_string(self.index)?;
        self.index += s.len() + 1;
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chunk() -> Chunk {
        let mut contents = vec![0x2A, 0x78, 0x56, 0x34, 0x12];
        contents.extend_from_slice(b"one\0two\0three\0");
        Chunk::new("PARAMS".to_string(), 6, contents)
    }

    #[test]
    fn test_scalar_accessors() {
        let chunk = sample_chunk();
        assert_eq!(chunk.byte(0), 0x2A);
        assert_eq!(chunk.u32(1), 0x12345678);
        assert_eq!(chunk.string(5, 3), b"one");
    }

    #[test]
    fn test_c_strings() {
        let chunk = sample_chunk();
        assert_eq!(chunk.c_string(5), Some(&b"one"[..]));
        let strings: Vec<&[u8]> = chunk.c_strings(5, 3).collect();
        assert_eq!(strings, vec![&b"one"[..], &b"two"[..], &b"three"[..]]);
    }
}
