use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not a ROM image: bad magic {found:02x?}")]
    BadMagic { found: [u8; 3] },

    #[error("Notation error at line {line}: {message}")]
    Grammar { line: usize, message: String },

    #[error("Unknown note/opcode token: '{token}'")]
    UnknownToken { token: String },

    #[error("No duration opcode for run length {0}")]
    BadRunLength(usize),

    #[error("Expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Music data region overflow: write of {need} bytes, {capacity} left")]
    DataCapacity { need: usize, capacity: usize },

    #[error("Channel offset {offset} does not fit in a header byte")]
    OffsetOutOfRange { offset: usize },

    #[error("Notation has no pattern {pattern} in track '{track}'")]
    MissingPattern { track: String, pattern: u32 },

    #[error("Song header {index:02x} points outside the data region (base {base_cpu:04x})")]
    BadHeader { index: u8, base_cpu: u16 },

    #[error("Character '{0}' has no glyph")]
    UnknownGlyph(char),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
