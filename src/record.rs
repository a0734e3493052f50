//! Per-line records with their key and precomputed typed values
//!
//! Every typed interpretation the active configuration may ask for is parsed
//! once, when the record is built. Comparisons only read the cached values.

use crate::config::{SortConfig, SortMode};
use std::ops::Range;

const MONTHS: [&[u8; 3]; 12] = [
    b"jan", b"feb", b"mar", b"apr", b"may", b"jun", b"jul", b"aug", b"sep", b"oct", b"nov",
    b"dec",
];

const HUMAN_UNITS: &[u8] = b"kmgtpe";

/// One input line, immutable after construction
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    line: Box<[u8]>,
    /// Byte range of the key within `line`
    key: Range<usize>,
    /// End of `key` once trailing blanks are dropped (equals `key.end` without -b)
    key_trim_end: usize,
    /// Length of `line` once trailing blanks are dropped
    line_trim_len: usize,
    numeric: Option<f64>,
    human: Option<f64>,
    month: Option<u8>,
}

impl Record {
    /// Build a record from a raw line (without its terminator)
    pub fn new(line: &[u8], config: &SortConfig) -> Self {
        let key = match config.key_column {
            Some(column) => column_range(line, column.get()),
            None => 0..line.len(),
        };

        let (key_trim_end, line_trim_len) = if config.ignore_trailing_blanks {
            (
                key.start + trim_trailing_blanks(&line[key.clone()]).len(),
                trim_trailing_blanks(line).len(),
            )
        } else {
            (key.end, line.len())
        };

        let typed = line[key.start..key_trim_end].trim_ascii();

        Self {
            numeric: if config.numeric { parse_numeric(typed) } else { None },
            human: if config.human_numeric {
                parse_human(typed)
            } else {
                None
            },
            month: if config.month { parse_month(typed) } else { None },
            line: line.into(),
            key,
            key_trim_end,
            line_trim_len,
        }
    }

    /// The raw line as read
    pub fn line(&self) -> &[u8] {
        &self.line
    }

    /// The extracted key (whole line or one column)
    pub fn key(&self) -> &[u8] {
        &self.line[self.key.clone()]
    }

    /// The line used in comparisons: trailing blanks removed under -b
    pub fn line_trim(&self) -> &[u8] {
        &self.line[..self.line_trim_len]
    }

    /// The key used in comparisons: trailing blanks removed under -b
    pub fn key_trim(&self) -> &[u8] {
        &self.line[self.key.start..self.key_trim_end]
    }

    pub fn numeric(&self) -> Option<f64> {
        self.numeric
    }

    pub fn human(&self) -> Option<f64> {
        self.human
    }

    /// Month number, 1 for January through 12 for December
    pub fn month(&self) -> Option<u8> {
        self.month
    }

    /// Whether the typed value required by `config` could not be parsed
    pub fn typed_parse_failed(&self, config: &SortConfig) -> bool {
        match config.mode() {
            SortMode::Lexicographic => false,
            SortMode::Numeric => self.numeric.is_none(),
            SortMode::HumanNumeric => self.human.is_none(),
            SortMode::Month => self.month.is_none(),
        }
    }
}

/// Byte range of the `column`-th tab-delimited field (1-based).
/// A column past the last tab yields an empty range.
fn column_range(line: &[u8], column: usize) -> Range<usize> {
    let mut start = 0;
    for _ in 1..column {
        match line[start..].iter().position(|&b| b == b'\t') {
            Some(tab) => start += tab + 1,
            None => return line.len()..line.len(),
        }
    }
    let end = line[start..]
        .iter()
        .position(|&b| b == b'\t')
        .map_or(line.len(), |tab| start + tab);
    start..end
}

fn trim_trailing_blanks(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|&b| b != b' ' && b != b'\t')
        .map_or(0, |last| last + 1);
    &bytes[..end]
}

/// Strict float parse of the whole text.
///
/// NaN is rejected, and so is a finite literal that overflows to infinity;
/// only a spelled-out `inf`/`infinity` yields an infinite value.
pub fn parse_numeric(text: &[u8]) -> Option<f64> {
    let text = std::str::from_utf8(text).ok()?;
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() || (value.is_infinite() && names_infinity(text)))
}

fn names_infinity(text: &str) -> bool {
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Parse a number with an optional K/M/G/T/P/E suffix, each step a factor of 1024
pub fn parse_human(text: &[u8]) -> Option<f64> {
    let text = text.trim_ascii();
    let (&last, rest) = text.split_last()?;

    let (digits, power) = if last.is_ascii_alphabetic() {
        let unit = last.to_ascii_lowercase();
        let power = HUMAN_UNITS.iter().position(|&u| u == unit)? + 1;
        (rest.trim_ascii(), power as i32)
    } else {
        (text, 0)
    };

    if digits.is_empty() {
        return None;
    }
    let value = parse_numeric(digits)?;
    Some(value * 1024f64.powi(power))
}

/// Match the first three letters, case-insensitively, against the month table
pub fn parse_month(text: &[u8]) -> Option<u8> {
    let prefix = text.trim_ascii().get(..3)?.to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|month| month[..] == prefix[..])
        .map(|index| index as u8 + 1)
}
