//! Run-length compression of pattern rows into channel byte streams

use crate::error::Result;
use crate::music::tables::{harmony_byte, melody_byte, Duration};

/// Token vocabulary for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    /// Pitch tokens plus standalone duration opcodes
    Melodic,
    /// Drum/pitch tokens with the duration fused into each byte
    Percussive,
}

/// Rest (empty row) token
const REST: &str = "...";

/// Longest run the duration table can express in one byte
const MAX_RUN: usize = 4;

struct Run<'a> {
    token: &'a str,
    len: usize,
}

/// Coalesce rows into (token, length) runs.
///
/// A rest row extends the current run — sustaining whatever token opened it —
/// until the run reaches [`MAX_RUN`] rows; the next rest then opens a rest run
/// of its own. A non-rest token always opens a fresh run of length 1.
fn runs<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec<Run<'a>> {
    // Zero-length sentinel so a leading rest has a run to extend.
    let mut runs = vec![Run { token: REST, len: 0 }];
    for token in tokens {
        let last = runs.last_mut().unwrap();
        if token == REST && last.len < MAX_RUN {
            last.len += 1;
        } else {
            runs.push(Run { token, len: 1 });
        }
    }
    runs.retain(|r| r.len > 0);
    runs
}

/// Compress one column's rows into a channel byte stream.
///
/// Each row's first whitespace field is the token. A duration byte (melodic)
/// or fused duration (percussive) is selected whenever the run length changes.
pub fn compress(rows: &[String], voice: Voice) -> Result<Vec<u8>> {
    let tokens = rows
        .iter()
        .map(|row| row.split_whitespace().next().unwrap_or(""));

    let mut bytes = Vec::new();
    let mut current_len = 0usize;
    for run in runs(tokens) {
        let changed = run.len != current_len;
        current_len = run.len;
        match voice {
            Voice::Melodic => {
                if changed {
                    bytes.push(Duration::from_run_length(run.len)?.opcode());
                }
                bytes.push(melody_byte(run.token)?);
            }
            Voice::Percussive => {
                let duration = Duration::from_run_length(run.len)?;
                bytes.push(harmony_byte(duration, run.token)?);
            }
        }
    }
    Ok(bytes)
}
