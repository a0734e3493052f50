//! Three-way record comparison, one strategy per sort mode
//!
//! Comparators give the natural (ascending) order only. Reversal is applied by
//! the caller so the same comparator serves both sorting and checking.

use crate::config::{SortConfig, SortMode};
use crate::record::Record;
use std::cmp::Ordering;

/// Natural-order comparison of two records
pub trait RecordComparator {
    fn compare(&self, a: &Record, b: &Record) -> Ordering;
}

/// Byte-wise order of the trimmed key, then of the trimmed line
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexicographic;

impl RecordComparator for Lexicographic {
    #[inline]
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        compare_text(a, b)
    }
}

/// Orders by the plain numeric value of the key
#[derive(Debug, Clone, Copy, Default)]
pub struct Numeric;

impl RecordComparator for Numeric {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.numeric(), b.numeric()) {
            (Some(x), Some(y)) => compare_floats(x, y),
            _ => compare_text(a, b),
        }
    }
}

/// Orders by the suffix-scaled value of the key
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanNumeric;

impl RecordComparator for HumanNumeric {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.human(), b.human()) {
            (Some(x), Some(y)) => compare_floats(x, y),
            _ => compare_text(a, b),
        }
    }
}

/// Orders by the month named at the start of the key
#[derive(Debug, Clone, Copy, Default)]
pub struct Month;

impl RecordComparator for Month {
    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        match (a.month(), b.month()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => compare_text(a, b),
        }
    }
}

/// Select the comparator for the configured mode, once per run
pub fn comparator_for(config: &SortConfig) -> Box<dyn RecordComparator> {
    match config.mode() {
        SortMode::Month => Box::new(Month),
        SortMode::HumanNumeric => Box::new(HumanNumeric),
        SortMode::Numeric => Box::new(Numeric),
        SortMode::Lexicographic => Box::new(Lexicographic),
    }
}

/// Apply the requested direction to a natural-order result
#[inline]
pub fn directed(ordering: Ordering, reverse: bool) -> Ordering {
    if reverse {
        ordering.reverse()
    } else {
        ordering
    }
}

/// Fallback chain shared by every mode
#[inline]
fn compare_text(a: &Record, b: &Record) -> Ordering {
    a.key_trim()
        .cmp(b.key_trim())
        .then_with(|| a.line_trim().cmp(b.line_trim()))
}

/// Parsed values are never NaN, so equal is the only leftover case
#[inline]
fn compare_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}
