//! Note and duration token tables
//!
//! Tokens follow the tracker notation: pitches like `C-5` / `A#3` / `Bb4`,
//! `...` for a rest, `---` for the stop byte, and ZZT #PLAY-style duration
//! letters (`q` quarter, `i` eighth, `s` sixteenth, `z` thirty-second, with
//! `.` dotted and `t` triplet variants).

use crate::error::{Error, Result};

/// Byte code of the rest pitch
pub const REST_CODE: u8 = 0x04;

/// Byte code of the stop opcode (also the stream terminator)
pub const STOP_CODE: u8 = 0x00;

/// Note duration selected by a run length or fused into a percussion token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Duration {
    Sixteenth,
    SixteenthTriplet,
    Eighth,
    EighthTriplet,
    DottedEighth,
    Quarter,
    DottedQuarter,
    ThirtySecond,
}

impl Duration {
    /// Notation symbol for this duration
    pub fn symbol(self) -> &'static str {
        match self {
            Duration::Sixteenth => "s",
            Duration::SixteenthTriplet => "st",
            Duration::Eighth => "i",
            Duration::EighthTriplet => "it",
            Duration::DottedEighth => "i.",
            Duration::Quarter => "q",
            Duration::DottedQuarter => "q.",
            Duration::ThirtySecond => "z",
        }
    }

    /// Duration opcode byte on the melodic channels
    pub fn opcode(self) -> u8 {
        match self {
            Duration::DottedQuarter => 0x80,
            Duration::ThirtySecond => 0x81,
            Duration::Sixteenth => 0x82,
            Duration::SixteenthTriplet => 0x83,
            Duration::Eighth => 0x84,
            Duration::DottedEighth => 0x85,
            Duration::Quarter => 0x86,
            Duration::EighthTriplet => 0x87,
        }
    }

    /// Bits OR-ed onto a base code on the percussion channel
    pub fn mask(self) -> u8 {
        match self {
            Duration::DottedQuarter => 0x00,
            Duration::Quarter => 0x81,
            Duration::DottedEighth => 0x41,
            Duration::Eighth => 0x01,
            Duration::EighthTriplet => 0xC1,
            Duration::Sixteenth => 0x80,
            Duration::SixteenthTriplet => 0xC0,
            Duration::ThirtySecond => 0x40,
        }
    }

    /// Duration covering a run of `len` rows
    pub fn from_run_length(len: usize) -> Result<Self> {
        match len {
            1 => Ok(Duration::Sixteenth),
            2 => Ok(Duration::Eighth),
            3 => Ok(Duration::DottedEighth),
            4 => Ok(Duration::Quarter),
            6 => Ok(Duration::DottedQuarter),
            n => Err(Error::BadRunLength(n)),
        }
    }

    /// Rows covered by this duration (inverse of `from_run_length`)
    pub fn run_length(self) -> Option<usize> {
        match self {
            Duration::Sixteenth => Some(1),
            Duration::Eighth => Some(2),
            Duration::DottedEighth => Some(3),
            Duration::Quarter => Some(4),
            Duration::DottedQuarter => Some(6),
            _ => None,
        }
    }

    /// Decode a melodic duration opcode byte
    pub fn from_opcode(byte: u8) -> Option<Self> {
        match byte {
            0x80 => Some(Duration::DottedQuarter),
            0x81 => Some(Duration::ThirtySecond),
            0x82 => Some(Duration::Sixteenth),
            0x83 => Some(Duration::SixteenthTriplet),
            0x84 => Some(Duration::Eighth),
            0x85 => Some(Duration::DottedEighth),
            0x86 => Some(Duration::Quarter),
            0x87 => Some(Duration::EighthTriplet),
            _ => None,
        }
    }

    /// Decode percussion duration bits (`byte & 0xC1`)
    pub fn from_mask(bits: u8) -> Option<Self> {
        match bits {
            0x00 => Some(Duration::DottedQuarter),
            0x81 => Some(Duration::Quarter),
            0x41 => Some(Duration::DottedEighth),
            0x01 => Some(Duration::Eighth),
            0xC1 => Some(Duration::EighthTriplet),
            0x80 => Some(Duration::Sixteenth),
            0xC0 => Some(Duration::SixteenthTriplet),
            0x40 => Some(Duration::ThirtySecond),
            _ => None,
        }
    }
}

/// Pitch (or rest) token to byte code. Enharmonic spellings share a code.
pub fn pitch_code(name: &str) -> Option<u8> {
    let code = match name {
        "G-6" => 0x58,
        "E-6" => 0x56,
        "D-6" => 0x02,
        "C-6" => 0x54,
        "Bb5" | "A#5" => 0x52,
        "Ab5" | "G#5" => 0x50,
        "G-5" => 0x4E,
        "F-5" => 0x4C,
        "E-5" => 0x44,
        "D#5" | "Eb5" => 0x4A,
        "D-5" => 0x48,
        "Db5" | "C#5" => 0x46,
        "C-5" => 0x64,
        "B-4" => 0x42,
        "Bb4" | "A#4" => 0x3E,
        "A-4" => 0x40,
        "Ab4" | "G#4" => 0x3C,
        "G-4" => 0x3A,
        "Gb4" | "F#4" => 0x38,
        "F-4" => 0x36,
        "E-4" => 0x34,
        "Eb4" | "D#4" => 0x32,
        "D-4" => 0x30,
        "Db4" | "C#4" => 0x2E,
        "C-4" => 0x2C,
        "B-3" => 0x2A,
        "Bb3" | "A#3" => 0x28,
        "A-3" => 0x26,
        "Ab3" | "G#3" => 0x24,
        "G-3" => 0x22,
        "Gb3" | "F#3" => 0x20,
        "F-3" => 0x1E,
        "E-3" => 0x1C,
        "Eb3" | "D#3" => 0x1A,
        "D-3" => 0x18,
        "Db3" | "C#3" => 0x16,
        "C-3" => 0x14,
        "B-2" => 0x12,
        "Bb2" | "A#2" => 0x10,
        "A-2" => 0x62,
        "Ab2" | "G#2" => 0x0E,
        "G-2" => 0x0C,
        "Gb2" | "F#2" => 0x0A,
        "F-2" => 0x08,
        "E-2" => 0x06,
        "Eb2" | "D#2" => 0x60,
        "D-2" => 0x5E,
        "C-2" => 0x5C,
        "G-1" => 0x5A,
        "..." => REST_CODE,
        _ => return None,
    };
    Some(code)
}

/// Canonical token for a pitch byte code
pub fn pitch_name(code: u8) -> Option<&'static str> {
    let name = match code {
        0x58 => "G-6",
        0x56 => "E-6",
        0x02 => "D-6",
        0x54 => "C-6",
        0x52 => "Bb5",
        0x50 => "Ab5",
        0x4E => "G-5",
        0x4C => "F-5",
        0x44 => "E-5",
        0x4A => "D#5",
        0x48 => "D-5",
        0x46 => "C#5",
        0x64 => "C-5",
        0x42 => "B-4",
        0x3E => "Bb4",
        0x40 => "A-4",
        0x3C => "Ab4",
        0x3A => "G-4",
        0x38 => "F#4",
        0x36 => "F-4",
        0x34 => "E-4",
        0x32 => "Eb4",
        0x30 => "D-4",
        0x2E => "C#4",
        0x2C => "C-4",
        0x2A => "B-3",
        0x28 => "Bb3",
        0x26 => "A-3",
        0x24 => "Ab3",
        0x22 => "G-3",
        0x20 => "F#3",
        0x1E => "F-3",
        0x1C => "E-3",
        0x1A => "Eb3",
        0x18 => "D-3",
        0x16 => "C#3",
        0x14 => "C-3",
        0x12 => "B-2",
        0x10 => "Bb2",
        0x62 => "A-2",
        0x0E => "Ab2",
        0x0C => "G-2",
        0x0A => "Gb2",
        0x08 => "F-2",
        0x06 => "E-2",
        0x60 => "Eb2",
        0x5E => "D-2",
        0x5C => "C-2",
        0x5A => "G-1",
        REST_CODE => "...",
        _ => return None,
    };
    Some(name)
}

/// Drum token to base code on the percussion channel
fn drum_code(name: &str) -> Option<u8> {
    match name {
        "O" => Some(0x30), // open hat
        "K" => Some(0x20), // kick
        "C" => Some(0x10), // closed hat
        _ => None,
    }
}

fn drum_name(code: u8) -> Option<&'static str> {
    match code {
        0x30 => Some("O"),
        0x20 => Some("K"),
        0x10 => Some("C"),
        _ => None,
    }
}

/// Melodic-channel byte for a token (pitch, rest, stop or duration opcode)
pub fn melody_byte(token: &str) -> Result<u8> {
    let byte = match token {
        "---" => STOP_CODE,
        "q." => 0x80,
        "z" => 0x81,
        "s" => 0x82,
        "st" => 0x83,
        "i" => 0x84,
        "i." => 0x85,
        "q" => 0x86,
        "it" => 0x87,
        _ => pitch_code(token).ok_or_else(|| Error::UnknownToken {
            token: token.to_string(),
        })?,
    };
    Ok(byte)
}

/// Percussion-channel byte: duration fused onto the drum or pitch base code.
///
/// Pitches with codes at or above 0x40 are out of this channel's range and
/// fail the lookup.
pub fn harmony_byte(duration: Duration, token: &str) -> Result<u8> {
    let base = drum_code(token)
        .or_else(|| pitch_code(token).filter(|&c| c < 0x40))
        .ok_or_else(|| Error::UnknownToken {
            token: format!("{}{}", duration.symbol(), token),
        })?;
    Ok(base | duration.mask())
}

/// Decode a melodic byte back to its token
pub fn melody_token(byte: u8) -> Option<&'static str> {
    if byte == STOP_CODE {
        return Some("---");
    }
    match Duration::from_opcode(byte) {
        Some(d) => Some(d.symbol()),
        None => pitch_name(byte),
    }
}

/// Decode a percussion byte into its duration and base token
pub fn harmony_parts(byte: u8) -> Option<(Duration, &'static str)> {
    let duration = Duration::from_mask(byte & 0xC1)?;
    let base = byte & 0x3E;
    let token = drum_name(base).or_else(|| pitch_name(base))?;
    Some((duration, token))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_length_durations() {
        assert_eq!(Duration::from_run_length(1).unwrap(), Duration::Sixteenth);
        assert_eq!(Duration::from_run_length(4).unwrap(), Duration::Quarter);
        assert_eq!(
            Duration::from_run_length(6).unwrap(),
            Duration::DottedQuarter
        );
        assert!(matches!(
            Duration::from_run_length(5),
            Err(Error::BadRunLength(5))
        ));
        for len in [1, 2, 3, 4, 6] {
            let d = Duration::from_run_length(len).unwrap();
            assert_eq!(d.run_length(), Some(len));
        }
    }

    #[test]
    fn test_melody_bytes() {
        assert_eq!(melody_byte("C-5").unwrap(), 0x64);
        assert_eq!(melody_byte("G-4").unwrap(), 0x3A);
        assert_eq!(melody_byte("...").unwrap(), REST_CODE);
        assert_eq!(melody_byte("---").unwrap(), STOP_CODE);
        assert_eq!(melody_byte("q").unwrap(), 0x86);
        assert!(melody_byte("H-4").is_err());
    }

    #[test]
    fn test_enharmonic_spellings_share_codes() {
        assert_eq!(pitch_code("A#3"), pitch_code("Bb3"));
        assert_eq!(pitch_code("C#4"), pitch_code("Db4"));
        assert_eq!(pitch_code("G#5"), pitch_code("Ab5"));
    }

    #[test]
    fn test_harmony_composition() {
        // Values from the player's fused duration+note encoding.
        assert_eq!(harmony_byte(Duration::Quarter, "G-4").unwrap(), 0xBB);
        assert_eq!(harmony_byte(Duration::DottedQuarter, "G-4").unwrap(), 0x3A);
        assert_eq!(harmony_byte(Duration::Sixteenth, "O").unwrap(), 0xB0);
        assert_eq!(harmony_byte(Duration::Eighth, "K").unwrap(), 0x21);
        assert_eq!(harmony_byte(Duration::EighthTriplet, "C").unwrap(), 0xD1);
        assert_eq!(harmony_byte(Duration::Quarter, "...").unwrap(), 0x85);
        // C-5 sits above the percussion range.
        assert!(harmony_byte(Duration::Quarter, "C-5").is_err());
    }

    #[test]
    fn test_reverse_lookups() {
        for token in ["C-5", "G-4", "E-2", "...", "---", "q", "s"] {
            let byte = melody_byte(token).unwrap();
            assert_eq!(melody_token(byte), Some(token));
        }
        let byte = harmony_byte(Duration::Quarter, "G-4").unwrap();
        assert_eq!(harmony_parts(byte), Some((Duration::Quarter, "G-4")));
        let byte = harmony_byte(Duration::Sixteenth, "O").unwrap();
        assert_eq!(harmony_parts(byte), Some((Duration::Sixteenth, "O")));
    }
}
