//! Read counting and per-chromosome aggregation.
//!
//! - [`counter::count_reads`]: total and aligned reads across files
//! - [`aggregator::aggregate_by_chromosome`]: aligned reads per accession,
//!   joined to chromosome names and sorted by count
//! - [`summarize`]: both of the above from a single pass over each file
//!
//! ## Example
//!
//! ```rust,no_run
//! use align_stats::core::types::{DuplicateAccessionPolicy, ReadErrorPolicy};
//! use align_stats::parsing::ncbi_report::build_chromosome_map;
//! use align_stats::stats::summarize;
//! use std::path::Path;
//!
//! let map = build_chromosome_map(
//!     Path::new("assembly_report.txt"),
//!     DuplicateAccessionPolicy::Last,
//! )
//! .unwrap();
//! let summary = summarize(&["a.sam", "b.sam"], &map, ReadErrorPolicy::FailFast).unwrap();
//!
//! println!("{} of {} reads aligned", summary.counters.aligned_reads, summary.counters.total_reads);
//! for row in &summary.rows {
//!     println!("{}\t{}\t{}", row.accession, row.chromosome, row.count);
//! }
//! ```

use std::io::BufRead;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::chromosome_map::ChromosomeMap;
use crate::core::types::{FileCounts, ReadErrorPolicy, ReportRow, RunCounters};
use crate::parsing::sam::{open_input, read_records, ParseError};

pub mod aggregator;
pub mod counter;

use aggregator::{join_chromosomes, AccessionTally};

/// Per-file results from [`for_each_input`]
pub(crate) struct Processed<T> {
    pub files: Vec<(PathBuf, T)>,
    pub skipped: Vec<PathBuf>,
}

/// Run `f` on each input in order.
///
/// Under [`ReadErrorPolicy::Skip`], files that are missing or fail while being
/// read are logged and left out; their partial results are discarded. Any other
/// error is returned regardless of policy.
pub(crate) fn for_each_input<P, T, F>(
    paths: &[P],
    policy: ReadErrorPolicy,
    mut f: F,
) -> Result<Processed<T>, ParseError>
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> Result<T, ParseError>,
{
    let mut processed = Processed {
        files: Vec::with_capacity(paths.len()),
        skipped: Vec::new(),
    };

    for path in paths {
        let path = path.as_ref();
        match f(path) {
            Ok(value) => processed.files.push((path.to_path_buf(), value)),
            Err(e) if policy == ReadErrorPolicy::Skip && e.is_unreadable() => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable alignment file");
                processed.skipped.push(path.to_path_buf());
            }
            Err(e) => return Err(e),
        }
    }

    Ok(processed)
}

/// Counters and accession tally for one alignment file
#[derive(Debug, Clone, Default)]
pub struct FileTally {
    pub counters: RunCounters,
    pub accessions: AccessionTally,
}

/// Count reads and tally aligned accessions from an open SAM stream in one pass
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream fails part way through.
pub fn tally_reader<R: BufRead>(reader: R, path: &Path) -> Result<FileTally, ParseError> {
    let mut tally = FileTally::default();
    read_records(reader, path, |record| {
        let aligned = record.aligned_reference();
        tally.counters.observe(aligned.is_some());
        if let Some(accession) = aligned {
            tally.accessions.observe(accession);
        }
    })?;
    Ok(tally)
}

/// Everything the report needs from a run
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub counters: RunCounters,
    pub per_file: Vec<FileCounts>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
    pub chromosome_map_size: usize,
    #[serde(rename = "chromosomes")]
    pub rows: Vec<ReportRow>,
}

/// Counters, per-file sub-totals and per-chromosome rows from a single read of
/// each alignment file. Agrees with [`counter::count_reads`] and
/// [`aggregator::aggregate_by_chromosome`] run separately.
///
/// # Errors
///
/// Under [`ReadErrorPolicy::FailFast`], returns the first `ParseError::MissingFile`
/// or `ParseError::Io` encountered.
pub fn summarize<P: AsRef<Path>>(
    paths: &[P],
    map: &ChromosomeMap,
    policy: ReadErrorPolicy,
) -> Result<Summary, ParseError> {
    let processed = for_each_input(paths, policy, |path| {
        let tally = tally_reader(open_input(path)?, path)?;
        debug!(
            path = %path.display(),
            total_reads = tally.counters.total_reads,
            aligned_reads = tally.counters.aligned_reads,
            accessions = tally.accessions.len(),
            "Processed alignment file"
        );
        Ok(tally)
    })?;

    let mut counters = RunCounters::default();
    let mut accessions = AccessionTally::new();
    let mut per_file = Vec::with_capacity(processed.files.len());

    for (path, tally) in &processed.files {
        counters.merge(&tally.counters);
        accessions.merge(&tally.accessions);
        per_file.push(FileCounts {
            path: path.display().to_string(),
            counters: tally.counters,
        });
    }

    Ok(Summary {
        counters,
        per_file,
        skipped: processed
            .skipped
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        chromosome_map_size: map.len(),
        rows: join_chromosomes(&accessions, map),
    })
}
