use crate::compare::{comparator_for, directed, RecordComparator};
use crate::config::SortConfig;
use crate::error::{SortContext, SortError, SortResult};
use crate::input::{read_records, InputSource};
use crate::output::write_output;
use crate::record::Record;
use std::cmp::Ordering;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, Write};

/// Runs below this length are insertion sorted before merging
const INSERTION_RUN: usize = 16;

/// One sort or check run over a fixed set of sources
pub struct CoreSort {
    config: SortConfig,
    sources: Vec<InputSource>,
}

impl CoreSort {
    pub fn new(config: SortConfig, files: &[OsString]) -> Self {
        Self {
            config,
            sources: InputSource::from_names(files),
        }
    }

    /// Read all input, then check it or sort it to the configured destination
    pub fn run(&self) -> SortResult<()> {
        let records = self.load()?;
        if self.config.check {
            return self.check(&records);
        }

        // Created only now, so the output file may also be one of the inputs
        match &self.config.output_file {
            Some(path) => {
                let file = File::create(path).with_write_context()?;
                self.sort_into(&records, file)
            }
            None => self.sort_into(&records, io::stdout().lock()),
        }
    }

    /// Build records from every source, in order
    pub fn load(&self) -> SortResult<Vec<Record>> {
        if self.config.debug {
            self.debug_settings();
        }
        let records = read_records(&self.sources, &self.config)?;
        if self.config.debug {
            let fallbacks = records
                .iter()
                .filter(|record| record.typed_parse_failed(&self.config))
                .count();
            if fallbacks > 0 {
                eprintln!(
                    "sort: {fallbacks} of {} keys are not {} and compare as text",
                    records.len(),
                    self.config.mode()
                );
            }
        }
        Ok(records)
    }

    /// Verify the input order without producing output
    pub fn check(&self, records: &[Record]) -> SortResult<()> {
        if self.config.debug {
            eprintln!("sort: checking order of {} lines", records.len());
        }
        let comparator = comparator_for(&self.config);
        verify(records, &*comparator, self.config.reverse)
    }

    /// Sort and emit `records` to `output`
    pub fn sort_into<W: Write>(&self, records: &[Record], output: W) -> SortResult<()> {
        if self.config.debug {
            eprintln!("sort: sorting {} lines", records.len());
        }
        let comparator = comparator_for(&self.config);
        let order = sort_indices(records, &*comparator, self.config.reverse);
        write_output(records, &order, &self.config, output)
    }

    fn debug_settings(&self) {
        eprintln!("sort: comparison mode: {}", self.config.mode());
        for ignored in self.config.ignored_modes() {
            eprintln!(
                "sort: {ignored} ordering ignored, {} takes precedence",
                self.config.mode()
            );
        }
        match self.config.key_column {
            Some(column) => eprintln!("sort: key: tab-delimited column {column}"),
            None => eprintln!("sort: key: whole line"),
        }
    }
}

/// Stable ordering of record indices under `comparator`, optionally reversed.
///
/// Records that compare equal keep their input order in both directions.
/// Bottom-up merge sort over insertion-sorted runs.
///
/// Mixed typed/text keys can make the comparator intransitive. The result is
/// still a permutation in which no adjacent pair is out of order, and input
/// that [`verify`] accepts comes back unchanged, so sorting is idempotent and
/// agrees with check mode on any input.
pub fn sort_indices(
    records: &[Record],
    comparator: &dyn RecordComparator,
    reverse: bool,
) -> Vec<usize> {
    let len = records.len();
    let mut order: Vec<usize> = (0..len).collect();
    if first_disorder(records, comparator, reverse).is_none() {
        return order;
    }

    let less = |a: usize, b: usize| {
        directed(comparator.compare(&records[a], &records[b]), reverse) == Ordering::Less
    };

    for run in order.chunks_mut(INSERTION_RUN) {
        insertion_sort(run, &less);
    }

    let mut scratch = vec![0; len];
    let mut width = INSERTION_RUN;
    while width < len {
        for start in (0..len).step_by(2 * width) {
            let mid = (start + width).min(len);
            let end = (start + 2 * width).min(len);
            merge(
                &order[start..mid],
                &order[mid..end],
                &mut scratch[start..end],
                &less,
            );
        }
        std::mem::swap(&mut order, &mut scratch);
        width *= 2;
    }

    // Linear when the merge left no adjacent disorder
    insertion_sort(&mut order, &less);
    order
}

fn insertion_sort<F>(run: &mut [usize], less: &F)
where
    F: Fn(usize, usize) -> bool,
{
    for i in 1..run.len() {
        let mut j = i;
        while j > 0 && less(run[j], run[j - 1]) {
            run.swap(j, j - 1);
            j -= 1;
        }
    }
}

/// Merge two sorted runs; on ties the left run wins
fn merge<F>(left: &[usize], right: &[usize], out: &mut [usize], less: &F)
where
    F: Fn(usize, usize) -> bool,
{
    let (mut l, mut r) = (0, 0);
    for slot in out.iter_mut() {
        let take_right = l == left.len() || (r < right.len() && less(right[r], left[l]));
        if take_right {
            *slot = right[r];
            r += 1;
        } else {
            *slot = left[l];
            l += 1;
        }
    }
}

/// Index of the first adjacent pair that is out of order, if any
pub fn first_disorder(
    records: &[Record],
    comparator: &dyn RecordComparator,
    reverse: bool,
) -> Option<usize> {
    records.windows(2).position(|pair| {
        directed(comparator.compare(&pair[0], &pair[1]), reverse) == Ordering::Greater
    })
}

/// Fails with `NotSorted` naming the first offending pair
pub fn verify(
    records: &[Record],
    comparator: &dyn RecordComparator,
    reverse: bool,
) -> SortResult<()> {
    match first_disorder(records, comparator, reverse) {
        Some(index) => Err(SortError::not_sorted(
            index,
            records[index].line(),
            records[index + 1].line(),
        )),
        None => Ok(()),
    }
}
