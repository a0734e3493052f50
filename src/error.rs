//! Error handling for the sort utility

use std::io;
use thiserror::Error;

/// Custom error type for sort operations
#[derive(Error, Debug)]
pub enum SortError {
    #[error("invalid option: {option}")]
    InvalidOption { option: String },

    #[error("invalid {option} value: {value:?}")]
    InvalidArgument { option: String, value: String },

    #[error("cannot open {source_name}: {error}")]
    SourceOpen { source_name: String, error: io::Error },

    #[error("reading {source_name}: {error}")]
    SourceRead { source_name: String, error: io::Error },

    #[error("write error: {0}")]
    SinkWrite(io::Error),

    #[error("not sorted: line {}: {first:?} > {second:?}", .index + 1)]
    NotSorted {
        /// 0-based index of the first line of the offending pair
        index: usize,
        first: String,
        second: String,
    },
}

impl SortError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            SortError::InvalidOption { .. }
            | SortError::InvalidArgument { .. }
            | SortError::SourceOpen { .. }
            | SortError::SourceRead { .. } => crate::SORT_FAILURE,

            SortError::SinkWrite(_) | SortError::NotSorted { .. } => crate::EXIT_FAILURE,
        }
    }

    /// Whether the usage summary should follow the diagnostic
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            SortError::InvalidOption { .. } | SortError::InvalidArgument { .. }
        )
    }

    /// Create an invalid option error
    pub fn invalid_option(option: &str) -> Self {
        SortError::InvalidOption {
            option: option.to_string(),
        }
    }

    /// Create an invalid argument error for `option`
    pub fn invalid_argument(option: &str, value: &str) -> Self {
        SortError::InvalidArgument {
            option: option.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a not sorted error; lines are rendered lossily for the diagnostic
    pub fn not_sorted(index: usize, first: &[u8], second: &[u8]) -> Self {
        SortError::NotSorted {
            index,
            first: String::from_utf8_lossy(first).into_owned(),
            second: String::from_utf8_lossy(second).into_owned(),
        }
    }
}

/// Result type for sort operations
pub type SortResult<T> = Result<T, SortError>;

/// Context trait for attributing io errors to a source or the sink
pub trait SortContext<T> {
    fn with_open_context(self, source_name: &str) -> SortResult<T>;

    fn with_read_context(self, source_name: &str) -> SortResult<T>;

    fn with_write_context(self) -> SortResult<T>;
}

impl<T> SortContext<T> for Result<T, io::Error> {
    fn with_open_context(self, source_name: &str) -> SortResult<T> {
        self.map_err(|error| SortError::SourceOpen {
            source_name: source_name.to_string(),
            error,
        })
    }

    fn with_read_context(self, source_name: &str) -> SortResult<T> {
        self.map_err(|error| SortError::SourceRead {
            source_name: source_name.to_string(),
            error,
        })
    }

    fn with_write_context(self) -> SortResult<T> {
        self.map_err(SortError::SinkWrite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(SortError::invalid_option("-x").exit_code(), crate::SORT_FAILURE);
        assert_eq!(SortError::invalid_argument("-k", "0").exit_code(), crate::SORT_FAILURE);
        assert_eq!(
            SortError::not_sorted(0, b"b", b"a").exit_code(),
            crate::EXIT_FAILURE
        );
        let write = SortError::SinkWrite(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert_eq!(write.exit_code(), crate::EXIT_FAILURE);
    }

    #[test]
    fn test_not_sorted_message_is_one_based() {
        let err = SortError::not_sorted(2, b"pear", b"apple");
        assert_eq!(err.to_string(), "not sorted: line 3: \"pear\" > \"apple\"");
    }

    #[test]
    fn test_read_context_names_source() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "boom"));
        let err = result.with_read_context("data.txt").unwrap_err();
        assert!(matches!(err, SortError::SourceRead { ref source_name, .. } if source_name == "data.txt"));
        assert_eq!(err.to_string(), "reading data.txt: boom");
    }

    #[test]
    fn test_invalid_argument_names_text() {
        let err = SortError::invalid_argument("-k", "abc");
        assert_eq!(err.to_string(), "invalid -k value: \"abc\"");
    }

    #[test]
    fn test_usage_errors() {
        assert!(SortError::invalid_option("-x").is_usage());
        assert!(!SortError::not_sorted(0, b"b", b"a").is_usage());
    }
}
