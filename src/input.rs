//! Line sources: standard input and files
//!
//! Regular files are memory-mapped and split in place; stdin and other
//! non-regular files (pipes, fifos) are streamed through a buffered reader.

use crate::config::SortConfig;
use crate::error::{SortContext, SortResult};
use crate::record::Record;
use memmap2::Mmap;
use std::fs::File;
use std::ffi::OsString;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

/// Name under which standard input is reported
pub const STDIN_NAME: &str = "-";

/// One input source, consumed in full before the next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Resolve the source names given on the command line; none means stdin
    pub fn from_names(names: &[OsString]) -> Vec<InputSource> {
        if names.is_empty() {
            return vec![InputSource::Stdin];
        }
        names
            .iter()
            .map(|name| {
                if *name == STDIN_NAME {
                    InputSource::Stdin
                } else {
                    InputSource::File(PathBuf::from(name))
                }
            })
            .collect()
    }

    /// Name used in diagnostics
    pub fn name(&self) -> String {
        match self {
            InputSource::Stdin => STDIN_NAME.to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Append one record per line of this source to `records`
    pub fn read_into(&self, config: &SortConfig, records: &mut Vec<Record>) -> SortResult<()> {
        let name = self.name();
        match self {
            InputSource::Stdin => {
                let stdin = io::stdin();
                read_stream(stdin.lock(), config, records).with_read_context(&name)
            }
            InputSource::File(path) => {
                let file = File::open(path).with_open_context(&name)?;
                let metadata = file.metadata().with_read_context(&name)?;
                // Zero-length regular files (procfs, sysfs) may still have content
                if metadata.is_file() && metadata.len() > 0 {
                    let mapped = MappedFile::new(&file).with_read_context(&name)?;
                    records.extend(mapped.lines().map(|line| Record::new(line, config)));
                    Ok(())
                } else {
                    read_stream(file, config, records).with_read_context(&name)
                }
            }
        }
    }
}

/// Read every source in order and build the full record list
pub fn read_records(sources: &[InputSource], config: &SortConfig) -> SortResult<Vec<Record>> {
    let mut records = Vec::new();
    for source in sources {
        let before = records.len();
        source.read_into(config, &mut records)?;
        if config.debug {
            eprintln!(
                "sort: read {} lines from {}",
                records.len() - before,
                source.name()
            );
        }
    }
    Ok(records)
}

/// Memory-mapped regular file
struct MappedFile {
    mmap: Mmap,
}

impl MappedFile {
    fn new(file: &File) -> io::Result<Self> {
        // SAFETY: the map is read-only and lives only while its lines are turned
        // into owned records. The file must not be truncated during that window.
        let mmap = unsafe { Mmap::map(file)? };
        Ok(Self { mmap })
    }

    fn lines(&self) -> Lines<'_> {
        Lines::new(&self.mmap[..])
    }
}

/// Splits a buffer into lines without their terminators
pub struct Lines<'a> {
    rest: &'a [u8],
}

impl<'a> Lines<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { rest: data }
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let line = match self.rest.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                let line = &self.rest[..newline];
                self.rest = &self.rest[newline + 1..];
                line
            }
            // Handle last line if it doesn't end with newline
            None => std::mem::take(&mut self.rest),
        };
        Some(strip_cr(line))
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Stream lines from a reader that cannot be mapped
fn read_stream<R: Read>(
    reader: R,
    config: &SortConfig,
    records: &mut Vec<Record>,
) -> io::Result<()> {
    let mut reader = BufReader::new(reader);
    let mut buffer = Vec::with_capacity(64 * 1024);
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(());
        }
        let line = buffer.strip_suffix(b"\n").unwrap_or(&buffer[..]);
        records.push(Record::new(strip_cr(line), config));
    }
}
