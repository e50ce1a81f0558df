use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::record::AlignmentRecord;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Input file not found or unreadable: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Invalid format in {} at line {line}: too few columns ({found} found, at least {expected} required)",
        .path.display()
    )]
    TooFewColumns {
        path: PathBuf,
        line: usize,
        found: usize,
        expected: usize,
    },

    #[error(
        "Invalid format in {} at line {line}: bad accession '{value}' in column 5",
        .path.display()
    )]
    BadAccession {
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error(
        "Conflicting accession in {} at line {line}: {accession} maps to both '{existing}' and '{conflicting}'",
        .path.display()
    )]
    ConflictingAccession {
        path: PathBuf,
        line: usize,
        accession: String,
        existing: String,
        conflicting: String,
    },
}

impl ParseError {
    /// The file this error refers to
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::MissingFile { path }
            | Self::Io { path, .. }
            | Self::TooFewColumns { path, .. }
            | Self::BadAccession { path, .. }
            | Self::ConflictingAccession { path, .. } => path,
        }
    }

    /// Whether this is a file-access problem rather than bad content
    #[must_use]
    pub fn is_unreadable(&self) -> bool {
        matches!(self, Self::MissingFile { .. } | Self::Io { .. })
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Open a text input for buffered reading
///
/// # Errors
///
/// Returns `ParseError::MissingFile` if the path does not exist or is not a
/// regular file, or `ParseError::Io` if it cannot be opened.
pub fn open_input(path: &Path) -> Result<BufReader<File>, ParseError> {
    if !path.is_file() {
        return Err(ParseError::MissingFile {
            path: path.to_path_buf(),
        });
    }

    File::open(path)
        .map(BufReader::new)
        .map_err(|e| ParseError::io(path, e))
}

/// Check that every input exists before any processing starts
///
/// # Errors
///
/// Returns `ParseError::MissingFile` for the first path that is not a readable file.
pub fn check_inputs_exist<P: AsRef<Path>>(paths: &[P]) -> Result<(), ParseError> {
    for path in paths {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ParseError::MissingFile {
                path: path.to_path_buf(),
            });
        }
    }
    Ok(())
}

/// Read the next raw line into `buf`. Returns `false` at end of input.
///
/// # Errors
///
/// Returns `ParseError::Io` naming `path` if reading fails.
pub(crate) fn next_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    path: &Path,
) -> Result<bool, ParseError> {
    buf.clear();
    let read = reader
        .read_until(b'\n', buf)
        .map_err(|e| ParseError::io(path, e))?;
    Ok(read > 0)
}

/// Decode a raw line, dropping its terminator. Invalid UTF-8 (e.g. in read
/// names or quality strings) is replaced rather than treated as a read failure.
pub(crate) fn decode_line(buf: &[u8]) -> Cow<'_, str> {
    let end = buf
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    String::from_utf8_lossy(&buf[..end])
}

/// Stream lines from `reader`, calling `f` with the 1-based line number and the
/// line content without its terminator.
///
/// # Errors
///
/// Returns `ParseError::Io` naming `path` if reading fails, or whatever `f` returns.
pub fn for_each_line<R, F>(mut reader: R, path: &Path, mut f: F) -> Result<(), ParseError>
where
    R: BufRead,
    F: FnMut(usize, &str) -> Result<(), ParseError>,
{
    let mut buf = Vec::new();
    let mut line_number = 0;

    while next_line(&mut reader, &mut buf, path)? {
        line_number += 1;
        f(line_number, &decode_line(&buf))?;
    }

    Ok(())
}

/// Stream the data records of a SAM text file, skipping header lines
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream fails part way through.
pub fn read_records<R, F>(reader: R, path: &Path, mut f: F) -> Result<(), ParseError>
where
    R: BufRead,
    F: FnMut(AlignmentRecord<'_>),
{
    let mut records = 0usize;
    for_each_line(reader, path, |_, line| {
        if let Some(record) = AlignmentRecord::from_line(line) {
            records += 1;
            f(record);
        }
        Ok(())
    })?;

    debug!(path = %path.display(), records, "Finished reading alignment records");
    Ok(())
}

/// Open a SAM file and stream its data records
///
/// # Errors
///
/// Returns `ParseError::MissingFile` if the file does not exist, or
/// `ParseError::Io` if it cannot be read to the end.
pub fn read_records_from_file<F>(path: &Path, f: F) -> Result<(), ParseError>
where
    F: FnMut(AlignmentRecord<'_>),
{
    let reader = open_input(path)?;
    read_records(reader, path, f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    const SAM: &str = "@HD\tVN:1.6\n\
@SQ\tSN:CP1.1\tLN:1000\n\
r1\t0\tCP1.1\t100\t60\t4M\t*\t0\t0\tACGT\tIIII\n\
r2\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\r\n";

    #[test]
    fn test_read_records_skips_headers() {
        let mut names = Vec::new();
        read_records(Cursor::new(SAM), Path::new("test.sam"), |record| {
            names.push(record.reference_name().map(str::to_string));
        })
        .unwrap();

        assert_eq!(
            names,
            vec![Some("CP1.1".to_string()), Some("*".to_string())]
        );
    }

    #[test]
    fn test_invalid_utf8_is_not_a_read_failure() {
        let mut sam = b"r1\t0\tCP1.1\t100\t60\t4M\t*\t0\t0\tACGT\tIIII\n".to_vec();
        sam.extend_from_slice(b"r\xe92\t0\tCP1.1\t200\t60\t4M\t*\t0\t0\tACGT\tIIII\n");

        let mut aligned = Vec::new();
        read_records(Cursor::new(sam), Path::new("latin1.sam"), |record| {
            aligned.push(record.aligned_reference().map(str::to_string));
        })
        .unwrap();

        assert_eq!(
            aligned,
            vec![Some("CP1.1".to_string()), Some("CP1.1".to_string())]
        );
    }

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"a\tb\r\n"), "a\tb");
        assert_eq!(decode_line(b"\n"), "");
        assert_eq!(decode_line(b"r\xe9"), "r\u{fffd}");
    }

    #[test]
    fn test_for_each_line_strips_terminators() {
        let mut lines = Vec::new();
        for_each_line(Cursor::new("a\r\nb\nc"), Path::new("x"), |n, line| {
            lines.push((n, line.to_string()));
            Ok(())
        })
        .unwrap();
        assert_eq!(
            lines,
            vec![
                (1, "a".to_string()),
                (2, "b".to_string()),
                (3, "c".to_string())
            ]
        );
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.served {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "device went away",
                ));
            }
            self.served = true;
            let data = b"r1\t0\tCP1.1\t1\t60\t1M\t*\t0\t0\tA\tI\n";
            buf[..data.len()].copy_from_slice(data);
            Ok(data.len())
        }
    }

    #[test]
    fn test_mid_stream_failure_is_io_error() {
        let reader = BufReader::new(FailingReader { served: false });
        let mut seen = 0;
        let err = read_records(reader, Path::new("broken.sam"), |_| seen += 1).unwrap_err();

        assert_eq!(seen, 1);
        assert!(err.is_unreadable());
        assert_eq!(err.path(), Path::new("broken.sam"));
        assert!(err.to_string().contains("broken.sam"));
    }

    #[test]
    fn test_open_missing_file() {
        let err = open_input(Path::new("/definitely/not/here.sam")).unwrap_err();
        assert!(matches!(err, ParseError::MissingFile { .. }));
    }

    #[test]
    fn test_check_inputs_exist() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(check_inputs_exist(&[file.path()]).is_ok());

        let missing = Path::new("/definitely/not/here.sam");
        let err = check_inputs_exist(&[file.path(), missing]).unwrap_err();
        assert_eq!(err.path(), missing);
    }
}
