//! Configuration management for sort operations

use crate::error::{SortError, SortResult};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::str::FromStr;

/// Main configuration structure for sort operations
///
/// Immutable once built: every later stage only reads it.
#[derive(Debug, Clone, Default)]
pub struct SortConfig {
    /// Tab-delimited column used as the key (1-based); `None` keys on the whole line
    pub key_column: Option<NonZeroUsize>,
    /// Compare keys as plain floating point numbers
    pub numeric: bool,
    /// Compare keys as numbers with K/M/G/T/P/E suffixes (base 1024)
    pub human_numeric: bool,
    /// Compare keys by three-letter month abbreviation
    pub month: bool,
    /// Reverse the final ordering
    pub reverse: bool,
    /// Output only the first of a run of equal lines
    pub unique: bool,
    /// Ignore trailing blanks in comparisons and uniqueness
    pub ignore_trailing_blanks: bool,
    /// Check if input is already sorted
    pub check: bool,
    /// Output file path
    pub output_file: Option<PathBuf>,
    /// Diagnostics on stderr
    pub debug: bool,
}

/// Primary ranking mode, resolved from the typed flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Byte-wise ordering of the key
    Lexicographic,
    /// Floating point value of the key
    Numeric,
    /// Human-readable numeric value (with suffixes like K, M, G)
    HumanNumeric,
    /// Month name ordering
    Month,
}

impl SortConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// The mode that ranks records: month wins over human, human over numeric
    pub fn mode(&self) -> SortMode {
        if self.month {
            SortMode::Month
        } else if self.human_numeric {
            SortMode::HumanNumeric
        } else if self.numeric {
            SortMode::Numeric
        } else {
            SortMode::Lexicographic
        }
    }

    /// Typed flags that were set but are shadowed by a higher-priority mode
    pub fn ignored_modes(&self) -> Vec<SortMode> {
        let active = self.mode();
        [
            (self.human_numeric, SortMode::HumanNumeric),
            (self.numeric, SortMode::Numeric),
        ]
        .into_iter()
        .filter(|&(set, mode)| set && mode != active)
        .map(|(_, mode)| mode)
        .collect()
    }

    /// Set the key column (1-based)
    pub fn with_key_column(mut self, column: Option<NonZeroUsize>) -> Self {
        self.key_column = column;
        self
    }

    /// Enable reverse sorting
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Enable unique output
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Enable check mode
    pub fn with_check(mut self, check: bool) -> Self {
        self.check = check;
        self
    }

    /// Ignore trailing blanks
    pub fn with_ignore_trailing_blanks(mut self, ignore: bool) -> Self {
        self.ignore_trailing_blanks = ignore;
        self
    }

    /// Set output file
    pub fn with_output_file(mut self, output_file: Option<PathBuf>) -> Self {
        self.output_file = output_file;
        self
    }

    /// Validate configuration for consistency
    pub fn validate(&self) -> SortResult<()> {
        if self.check {
            if let Some(output) = &self.output_file {
                return Err(SortError::invalid_argument(
                    "-o",
                    &output.to_string_lossy(),
                ));
            }
        }
        Ok(())
    }
}

impl FromStr for SortMode {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lexicographic" | "text" | "default" => Ok(SortMode::Lexicographic),
            "numeric" | "n" => Ok(SortMode::Numeric),
            "human-numeric" | "h" => Ok(SortMode::HumanNumeric),
            "month" | "m" => Ok(SortMode::Month),
            _ => Err(SortError::invalid_argument("--sort", s)),
        }
    }
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SortMode::Lexicographic => "lexicographic",
            SortMode::Numeric => "numeric",
            SortMode::HumanNumeric => "human-numeric",
            SortMode::Month => "month",
        };
        write!(f, "{name}")
    }
}

/// Builder pattern for creating configurations
pub struct SortConfigBuilder {
    config: SortConfig,
}

impl SortConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: SortConfig::default(),
        }
    }

    /// Turn on the flag for a typed mode; lexicographic clears nothing
    pub fn mode(mut self, mode: SortMode) -> Self {
        match mode {
            SortMode::Lexicographic => {}
            SortMode::Numeric => self.config.numeric = true,
            SortMode::HumanNumeric => self.config.human_numeric = true,
            SortMode::Month => self.config.month = true,
        }
        self
    }

    pub fn key_column(mut self, column: NonZeroUsize) -> Self {
        self.config.key_column = Some(column);
        self
    }

    pub fn reverse(mut self) -> Self {
        self.config.reverse = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.config.unique = true;
        self
    }

    pub fn ignore_trailing_blanks(mut self) -> Self {
        self.config.ignore_trailing_blanks = true;
        self
    }

    pub fn check(mut self) -> Self {
        self.config.check = true;
        self
    }

    pub fn output_file(mut self, file: PathBuf) -> Self {
        self.config.output_file = Some(file);
        self
    }

    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Build the final configuration
    pub fn build(self) -> SortResult<SortConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SortConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
