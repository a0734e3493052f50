//! Line-oriented sort utility
//!
//! Reads text lines from files or standard input, keys each line on the whole
//! line or one tab-delimited column, and either writes a stable ordering or
//! checks that the input already is one. Keys compare as text, numbers,
//! human-readable sizes or month names.

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

pub mod error;
pub mod config;
pub mod args;

pub mod record;
pub mod input;
pub mod compare;
pub mod core_sort;
pub mod output;

use std::ffi::OsString;

// Re-export commonly used types
pub use error::{SortError, SortResult};
pub use config::{SortConfig, SortMode};
pub use core_sort::CoreSort;

/// Exit codes matching GNU sort
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const SORT_FAILURE: i32 = 2;

/// Sort (or check) the given inputs according to `config`
pub fn sort(config: &SortConfig, input_files: &[OsString]) -> SortResult<i32> {
    CoreSort::new(config.clone(), input_files).run()?;
    Ok(EXIT_SUCCESS)
}
