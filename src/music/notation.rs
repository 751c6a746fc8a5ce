//! Line-oriented tracker notation parser
//!
//! Three statement kinds, one per line:
//!
//! ```text
//! TRACK "overworld"
//! PATTERN 0
//! ROW 00 : sK ; : C-5 .. ; : C-3 .. ;
//! ```
//!
//! Blank lines and `;` comment lines are skipped; anything else is a grammar
//! error with its line number.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::io::BufRead;

/// Number of note columns per row
pub const COLUMNS: usize = 3;

/// Maximum rows per pattern
pub const MAX_ROWS: usize = 64;

/// Stop marker recognized in any later field of a row column
pub const STOP_MARKER: &str = "D00";

/// One parsed statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Track(String),
    Pattern(u32),
    Row([String; COLUMNS]),
}

/// Tokenize one line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str, lineno: usize) -> Result<Option<Statement>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with(';') {
        return Ok(None);
    }
    let grammar = |message: String| Error::Grammar {
        line: lineno,
        message,
    };

    if let Some(rest) = line.strip_prefix("TRACK") {
        let name = rest.trim();
        let name = name
            .strip_prefix('"')
            .and_then(|n| n.strip_suffix('"'))
            .ok_or_else(|| grammar("TRACK name must be double-quoted".to_string()))?;
        return Ok(Some(Statement::Track(name.to_string())));
    }

    if let Some(rest) = line.strip_prefix("PATTERN") {
        let index = rest
            .trim()
            .parse::<u32>()
            .map_err(|_| grammar(format!("bad PATTERN index '{}'", rest.trim())))?;
        return Ok(Some(Statement::Pattern(index)));
    }

    if let Some(rest) = line.strip_prefix("ROW") {
        // The field before the first delimiter is a row label, ignored.
        let mut fields = rest.split(" : ");
        fields.next();
        let cols: Vec<&str> = fields.collect();
        if cols.len() != COLUMNS {
            return Err(grammar(format!(
                "ROW needs {} columns, got {}",
                COLUMNS,
                cols.len()
            )));
        }
        let row: [String; COLUMNS] =
            std::array::from_fn(|i| cols[i].trim_end().to_string());
        return Ok(Some(Statement::Row(row)));
    }

    Err(grammar(format!("unrecognized statement: '{}'", line)))
}

/// Rows of one pattern, one ordered column per channel role
/// (0 harmony/percussion, 1 melody, 2 bass)
#[derive(Debug, Clone, Default)]
pub struct PatternRows {
    columns: [Vec<String>; COLUMNS],
}

impl PatternRows {
    fn push_row(&mut self, row: [String; COLUMNS]) {
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.push(value);
        }
    }

    pub fn column(&self, index: usize) -> &[String] {
        &self.columns[index]
    }

    pub fn row_count(&self) -> usize {
        self.columns[0].len()
    }

    /// Rows up to and including the first stop-marker row. With no marker
    /// in the first [`MAX_ROWS`] rows the pattern is simply full-length.
    pub fn cut_len(&self) -> usize {
        let limit = self.row_count().min(MAX_ROWS);
        for i in 0..limit {
            let stopped = self.columns.iter().any(|column| {
                column[i]
                    .split_whitespace()
                    .skip(1)
                    .any(|field| field == STOP_MARKER)
            });
            if stopped {
                return i + 1;
            }
        }
        limit
    }
}

/// Parsed notation: track name -> pattern index -> rows
#[derive(Debug, Clone, Default)]
pub struct Notation {
    tracks: HashMap<String, BTreeMap<u32, PatternRows>>,
}

impl Notation {
    /// Parse a whole notation source
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut notation = Self::default();
        let mut track: Option<String> = None;
        let mut pattern: Option<u32> = None;

        for (i, line) in reader.lines().enumerate() {
            let lineno = i + 1;
            let Some(statement) = parse_line(&line?, lineno)? else {
                continue;
            };
            match statement {
                Statement::Track(name) => {
                    track = Some(name);
                    pattern = None;
                }
                Statement::Pattern(index) => {
                    if track.is_none() {
                        return Err(Error::Grammar {
                            line: lineno,
                            message: "PATTERN before any TRACK".to_string(),
                        });
                    }
                    pattern = Some(index);
                }
                Statement::Row(row) => {
                    let (Some(track), Some(pattern)) = (track.as_deref(), pattern) else {
                        return Err(Error::Grammar {
                            line: lineno,
                            message: "ROW before any TRACK/PATTERN".to_string(),
                        });
                    };
                    notation
                        .tracks
                        .entry(track.to_string())
                        .or_default()
                        .entry(pattern)
                        .or_default()
                        .push_row(row);
                }
            }
        }
        Ok(notation)
    }

    pub fn pattern(&self, track: &str, index: u32) -> Option<&PatternRows> {
        self.tracks.get(track)?.get(&index)
    }

    /// Like [`pattern`](Self::pattern) but a missing entry is an error
    pub fn require_pattern(&self, track: &str, index: u32) -> Result<&PatternRows> {
        self.pattern(track, index).ok_or_else(|| Error::MissingPattern {
            track: track.to_string(),
            pattern: index,
        })
    }
}
