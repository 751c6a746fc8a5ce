//! Fixed-width text to glyph transliteration

use crate::error::{Error, Result};
use crate::image::Image;

/// Glyph tiles in tile-index order
const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ    -\u{d7} !";

/// Image offset of the credits text field
pub const CREDITS_ADDR: usize = 0x09FB5;

/// Width of the credits text field in glyphs
pub const CREDITS_LEN: usize = 14;

/// Transliterate text to glyph tile indices
pub fn glyphs(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| {
            CHARSET
                .chars()
                .position(|g| g == c)
                .map(|i| i as u8)
                .ok_or(Error::UnknownGlyph(c))
        })
        .collect()
}

/// Write centered credits text into the fixed credits field
pub fn write_credits(image: &mut Image, text: &str) -> Result<()> {
    let text = center(text, CREDITS_LEN);
    image.write(CREDITS_ADDR, CREDITS_LEN, &glyphs(&text)?)?;
    Ok(())
}

/// Pad with spaces on both sides to `width` (extra space goes on the right)
fn center(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::MAGIC;

    #[test]
    fn test_glyph_indices() {
        assert_eq!(glyphs("0AZ").unwrap(), vec![0, 10, 35]);
        // Space resolves to the first of the blank tiles.
        assert_eq!(glyphs(" -\u{d7}!").unwrap(), vec![36, 40, 41, 43]);
        assert!(matches!(glyphs("a"), Err(Error::UnknownGlyph('a'))));
    }

    #[test]
    fn test_center() {
        assert_eq!(center("ABC", 7), "  ABC  ");
        assert_eq!(center("ABCD", 7), " ABCD  ");
        assert_eq!(center("TOOLONGTEXT", 4), "TOOLONGTEXT");
    }

    #[test]
    fn test_write_credits() {
        let mut data = vec![0u8; 0xA000];
        data[0..3].copy_from_slice(&MAGIC);
        let mut image = Image::from_bytes(data).unwrap();
        write_credits(&mut image, "TEST 1").unwrap();
        let field = image.slice(CREDITS_ADDR, CREDITS_LEN);
        assert_eq!(field.len(), CREDITS_LEN);
        // "    TEST 1    "
        assert_eq!(&field[4..8], &glyphs("TEST").unwrap()[..]);
        assert_eq!(field[0], 36);
        assert_eq!(field[13], 36);
    }
}
