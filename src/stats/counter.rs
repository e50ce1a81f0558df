use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::core::types::{ReadErrorPolicy, RunCounters};
use crate::parsing::sam::{open_input, read_records, ParseError};
use crate::stats::for_each_input;

/// Count total and aligned records in an open SAM stream
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream fails part way through.
pub fn count_reads_in<R: BufRead>(reader: R, path: &Path) -> Result<RunCounters, ParseError> {
    let mut counters = RunCounters::default();
    read_records(reader, path, |record| counters.observe(record.is_aligned()))?;
    Ok(counters)
}

/// Count total and aligned reads across alignment files, in the order given.
///
/// Per-file sub-totals are logged at debug level. With [`ReadErrorPolicy::Skip`]
/// a missing or failing file contributes nothing to the result.
///
/// # Errors
///
/// Under [`ReadErrorPolicy::FailFast`], returns the first `ParseError::MissingFile`
/// or `ParseError::Io` encountered.
pub fn count_reads<P: AsRef<Path>>(
    paths: &[P],
    policy: ReadErrorPolicy,
) -> Result<RunCounters, ParseError> {
    let per_file = for_each_input(paths, policy, |path| {
        let counters = count_reads_in(open_input(path)?, path)?;
        debug!(
            path = %path.display(),
            total_reads = counters.total_reads,
            aligned_reads = counters.aligned_reads,
            "Counted reads"
        );
        Ok(counters)
    })?;

    Ok(per_file.files.into_iter().map(|(_, counters)| counters).sum())
}
