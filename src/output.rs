//! Emitting records in their resolved order

use crate::config::SortConfig;
use crate::error::{SortContext, SortResult};
use crate::record::Record;
use itertools::Itertools;
use std::io::{BufWriter, Write};

/// Whether two records count as duplicates for -u.
///
/// Only the text matters (trimmed under -b); typed equality does not merge lines.
pub fn same_line(a: &Record, b: &Record, config: &SortConfig) -> bool {
    if config.ignore_trailing_blanks {
        a.line_trim() == b.line_trim()
    } else {
        a.line() == b.line()
    }
}

/// Write `records` in `order`, one line each, collapsing adjacent duplicates under -u
pub fn write_output<W: Write>(
    records: &[Record],
    order: &[usize],
    config: &SortConfig,
    output: W,
) -> SortResult<()> {
    let mut output = BufWriter::new(output);
    let lines = order.iter().map(|&index| &records[index]);

    if config.unique {
        write_lines(
            &mut output,
            lines.dedup_by(|a, b| same_line(a, b, config)),
        )?;
    } else {
        write_lines(&mut output, lines)?;
    }

    output.flush().with_write_context()
}

fn write_lines<'a, W, I>(output: &mut W, lines: I) -> SortResult<()>
where
    W: Write,
    I: Iterator<Item = &'a Record>,
{
    for record in lines {
        output.write_all(record.line()).with_write_context()?;
        output.write_all(b"\n").with_write_context()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortError;
    use std::io;
    use std::num::NonZeroUsize;

    fn records(lines: &[&str], config: &SortConfig) -> Vec<Record> {
        lines
            .iter()
            .map(|line| Record::new(line.as_bytes(), config))
            .collect()
    }

    fn emit(lines: &[&str], config: &SortConfig) -> String {
        let recs = records(lines, config);
        let order: Vec<usize> = (0..recs.len()).collect();
        let mut out = Vec::new();
        write_output(&recs, &order, config, &mut out).expect("write to memory");
        String::from_utf8(out).expect("utf-8 output")
    }

    /// A sink that accepts `budget` bytes, then fails
    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
            }
            let written = buf.len().min(self.budget);
            self.budget -= written;
            Ok(written)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_output_follows_order() {
        let config = SortConfig::default();
        let recs = records(&["a", "b", "c"], &config);
        let mut out = Vec::new();
        write_output(&recs, &[2, 0, 1], &config, &mut out).expect("write to memory");
        assert_eq!(out, b"c\na\nb\n");
    }

    #[test]
    fn test_empty_output() {
        let config = SortConfig::default().with_unique(true);
        assert_eq!(emit(&[], &config), "");
    }

    #[test]
    fn test_unique_only_merges_adjacent() {
        let config = SortConfig::default().with_unique(true);
        assert_eq!(emit(&["b", "a", "b", "a"], &config), "b\na\nb\na\n");
        assert_eq!(emit(&["a", "a", "b", "a"], &config), "a\nb\na\n");
    }

    #[test]
    fn test_unique_keeps_first_of_run() {
        let config = SortConfig::default()
            .with_unique(true)
            .with_ignore_trailing_blanks(true);
        assert_eq!(emit(&["x ", "x", "x\t"], &config), "x \n");
    }

    #[test]
    fn test_unique_trailing_blanks_toggle() {
        let lines = ["x\t1 ", "x\t1"];
        let column = NonZeroUsize::new(1);

        let config = SortConfig::default()
            .with_key_column(column)
            .with_unique(true)
            .with_ignore_trailing_blanks(true);
        assert_eq!(emit(&lines, &config), "x\t1 \n");

        let config = SortConfig::default().with_key_column(column).with_unique(true);
        assert_eq!(emit(&lines, &config), "x\t1 \nx\t1\n");
    }

    #[test]
    fn test_unique_ignores_typed_equality() {
        let config = crate::config::SortConfigBuilder::new()
            .mode(crate::SortMode::Numeric)
            .unique()
            .build()
            .expect("Failed to build test config");
        assert_eq!(emit(&["2", "2.0", "2"], &config), "2\n2.0\n2\n");
    }

    #[test]
    fn test_write_failure_is_sink_error() {
        let config = SortConfig::default();
        let long_line = "y".repeat(64 * 1024);
        let recs = records(&[long_line.as_str(), long_line.as_str()], &config);
        let err = write_output(&recs, &[0, 1], &config, FailingWriter { budget: 10 })
            .expect_err("write must fail");
        assert!(matches!(err, SortError::SinkWrite(_)));
    }
}
