//! Structural sanity checks run on every input before it is counted.
//!
//! Validation only samples the start of a file: the first data line must have
//! the expected column count, and for assembly reports its GenBank accession
//! must look like one. Nothing past that line is inspected.

use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::core::record::{is_header_line, MIN_ALIGNMENT_FIELDS};
use crate::parsing::ncbi_report::{is_comment_line, GENBANK_ACCESSION_COLUMN, MIN_REPORT_FIELDS};
use crate::parsing::sam::{decode_line, next_line, open_input, ParseError};

/// Maximum number of lines sampled from the start of a file
pub const MAX_VALIDATION_LINES: usize = 100;

/// Validate that a string looks like a GenBank accession: two uppercase letters,
/// digits, a dot, then the version digits.
///
/// # Examples
///
/// ```
/// use align_stats::utils::validation::is_valid_genbank_accession;
///
/// assert!(is_valid_genbank_accession("CP122180.1"));
/// assert!(is_valid_genbank_accession("CM000663.2"));
/// assert!(!is_valid_genbank_accession("ABC1.2")); // three letters
/// assert!(!is_valid_genbank_accession("NC_000001.11"));
/// assert!(!is_valid_genbank_accession("CP122180"));
/// ```
#[must_use]
pub fn is_valid_genbank_accession(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() < 2 || !bytes[..2].iter().all(u8::is_ascii_uppercase) {
        return false;
    }

    let Some((number, version)) = s[2..].split_once('.') else {
        return false;
    };

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(number) && all_digits(version)
}

/// Read at most [`MAX_VALIDATION_LINES`] lines and run `check` on the first one
/// that `skip` does not reject. Returns whether a data line was found.
fn check_first_data_line<R, S, C>(
    mut reader: R,
    path: &Path,
    skip: S,
    check: C,
) -> Result<bool, ParseError>
where
    R: BufRead,
    S: Fn(&str) -> bool,
    C: FnOnce(usize, &str) -> Result<(), ParseError>,
{
    let mut buf = Vec::new();

    for line_number in 1..=MAX_VALIDATION_LINES {
        if !next_line(&mut reader, &mut buf, path)? {
            break;
        }

        let line = decode_line(&buf);
        if skip(&line) {
            continue;
        }

        check(line_number, &line)?;
        debug!(path = %path.display(), line = line_number, "Validated first data line");
        return Ok(true);
    }

    debug!(path = %path.display(), "No data line in sampled prefix");
    Ok(false)
}

fn too_few_columns(path: &Path, line: usize, found: usize, expected: usize) -> ParseError {
    ParseError::TooFewColumns {
        path: path.to_path_buf(),
        line,
        found,
        expected,
    }
}

/// Check the first SAM data line of an open stream for the minimum column count.
///
/// Header-only samples are accepted.
///
/// # Errors
///
/// Returns `ParseError::TooFewColumns` if the first data line has fewer than
/// 11 tab-delimited fields, or `ParseError::Io` on read failure.
pub fn validate_alignment_reader<R: BufRead>(reader: R, path: &Path) -> Result<(), ParseError> {
    check_first_data_line(reader, path, is_header_line, |line_number, line| {
        let found = line.split('\t').count();
        if found < MIN_ALIGNMENT_FIELDS {
            return Err(too_few_columns(path, line_number, found, MIN_ALIGNMENT_FIELDS));
        }
        Ok(())
    })?;
    Ok(())
}

/// Check the first assembly report data line of an open stream.
///
/// Comment-only samples are accepted.
///
/// # Errors
///
/// Returns `ParseError::TooFewColumns` if the first data line has fewer than
/// 8 fields, `ParseError::BadAccession` if column 5 is not a GenBank accession,
/// or `ParseError::Io` on read failure.
pub fn validate_assembly_reader<R: BufRead>(reader: R, path: &Path) -> Result<(), ParseError> {
    check_first_data_line(reader, path, is_comment_line, |line_number, line| {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_REPORT_FIELDS {
            return Err(too_few_columns(
                path,
                line_number,
                fields.len(),
                MIN_REPORT_FIELDS,
            ));
        }

        let accession = fields[GENBANK_ACCESSION_COLUMN];
        if !is_valid_genbank_accession(accession) {
            return Err(ParseError::BadAccession {
                path: path.to_path_buf(),
                line: line_number,
                value: accession.to_string(),
            });
        }
        Ok(())
    })?;
    Ok(())
}

/// Sanity-check that a file looks like SAM text
///
/// # Errors
///
/// Returns `ParseError::MissingFile` if the file does not exist, otherwise as
/// [`validate_alignment_reader`].
pub fn validate_alignment_format(path: &Path) -> Result<(), ParseError> {
    validate_alignment_reader(open_input(path)?, path)
}

/// Sanity-check that a file looks like an NCBI assembly report
///
/// # Errors
///
/// Returns `ParseError::MissingFile` if the file does not exist, otherwise as
/// [`validate_assembly_reader`].
pub fn validate_assembly_format(path: &Path) -> Result<(), ParseError> {
    validate_assembly_reader(open_input(path)?, path)
}
