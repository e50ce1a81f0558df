//! Parser for NCBI assembly report files.
//!
//! Assembly reports are tab-delimited with `#` comment lines. The columns used
//! here are:
//!
//! - Column 1, Sequence-Name: the molecule label (e.g., "2L", "X", "MT")
//! - Column 5, GenBank-Accn: GenBank accession (e.g., "CP122180.1")
//!
//! Alignment files produced against a GenBank assembly use the accession as the
//! reference name, so this is the lookup used to label per-chromosome counts.

use std::io::BufRead;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::chromosome_map::{ChromosomeMap, DuplicateAccession};
use crate::core::types::DuplicateAccessionPolicy;
use crate::parsing::sam::{for_each_line, open_input, ParseError};

/// Prefix of assembly report comment lines
pub const COMMENT_PREFIX: char = '#';

/// Minimum number of tab-delimited fields on a report data line
pub const MIN_REPORT_FIELDS: usize = 8;

/// Zero-based index of the Sequence-Name column
pub const SEQUENCE_NAME_COLUMN: usize = 0;

/// Zero-based index of the GenBank-Accn column
pub const GENBANK_ACCESSION_COLUMN: usize = 4;

/// The two columns of an assembly report line used for chromosome lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyRecord {
    /// Primary sequence name (column 1)
    pub sequence_name: String,
    /// GenBank accession (column 5)
    pub genbank_accession: String,
}

impl AssemblyRecord {
    /// Extract a record from a data line.
    ///
    /// Returns `None` for comment lines, lines with fewer than five columns, or
    /// lines where either column is empty. The accession format is not checked.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        if is_comment_line(line) {
            return None;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let sequence_name = fields.get(SEQUENCE_NAME_COLUMN)?.trim();
        let genbank_accession = fields.get(GENBANK_ACCESSION_COLUMN)?.trim();

        if sequence_name.is_empty() || genbank_accession.is_empty() {
            return None;
        }

        Some(Self {
            sequence_name: sequence_name.to_string(),
            genbank_accession: genbank_accession.to_string(),
        })
    }
}

#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    line.starts_with(COMMENT_PREFIX)
}

/// Build the accession to chromosome lookup from an assembly report file.
///
/// A missing report is not an error: a warning is logged and an empty map is
/// returned, which labels every chromosome as unknown downstream.
///
/// # Errors
///
/// Returns `ParseError::Io` if the report exists but cannot be read, or
/// `ParseError::ConflictingAccession` under [`DuplicateAccessionPolicy::Reject`].
pub fn build_chromosome_map(
    path: &Path,
    policy: DuplicateAccessionPolicy,
) -> Result<ChromosomeMap, ParseError> {
    let reader = match open_input(path) {
        Ok(reader) => reader,
        Err(ParseError::MissingFile { .. }) => {
            warn!(
                path = %path.display(),
                "Assembly report not found, chromosome names will be reported as Unknown"
            );
            return Ok(ChromosomeMap::new(policy));
        }
        Err(e) => return Err(e),
    };

    let map = parse_chromosome_map(reader, path, policy)?;
    if map.is_empty() {
        warn!(
            path = %path.display(),
            "Assembly report has no usable entries, chromosome names will be reported as Unknown"
        );
    }
    Ok(map)
}

/// Build the accession to chromosome lookup from an open assembly report
///
/// # Errors
///
/// Returns `ParseError::Io` on read failure, or `ParseError::ConflictingAccession`
/// when the policy rejects conflicting duplicates.
pub fn parse_chromosome_map<R: BufRead>(
    reader: R,
    path: &Path,
    policy: DuplicateAccessionPolicy,
) -> Result<ChromosomeMap, ParseError> {
    let mut map = ChromosomeMap::new(policy);

    for_each_line(reader, path, |line_number, line| {
        let Some(record) = AssemblyRecord::from_line(line) else {
            return Ok(());
        };

        match map.insert(
            record.genbank_accession.clone(),
            record.sequence_name.clone(),
        ) {
            None | Some(DuplicateAccession::Identical) => {}
            Some(DuplicateAccession::Resolved { kept, discarded }) => {
                warn!(
                    accession = %record.genbank_accession,
                    kept = %kept,
                    discarded = %discarded,
                    line = line_number,
                    "Duplicate accession in assembly report"
                );
            }
            Some(DuplicateAccession::Rejected { existing }) => {
                return Err(ParseError::ConflictingAccession {
                    path: path.to_path_buf(),
                    line: line_number,
                    accession: record.genbank_accession,
                    existing,
                    conflicting: record.sequence_name,
                });
            }
        }
        Ok(())
    })?;

    debug!(
        path = %path.display(),
        entries = map.len(),
        policy = %policy,
        "Built chromosome map"
    );
    Ok(map)
}
