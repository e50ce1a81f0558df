/// Prefix marking a SAM header line
pub const HEADER_PREFIX: char = '@';

/// Reference name used by unmapped records
pub const NO_REFERENCE: &str = "*";

/// Minimum number of tab-delimited fields on a SAM data line
pub const MIN_ALIGNMENT_FIELDS: usize = 11;

/// A borrowed view of one SAM data line.
///
/// Only the reference name (column 3) and position (column 4) are interpreted.
/// Lines with fewer columns are still accepted here; the format validator is
/// responsible for rejecting structurally short input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentRecord<'a> {
    reference_name: Option<&'a str>,
    position: Option<&'a str>,
}

impl<'a> AlignmentRecord<'a> {
    /// View a data line. Returns `None` for header lines.
    #[must_use]
    pub fn from_line(line: &'a str) -> Option<Self> {
        if is_header_line(line) {
            return None;
        }

        let mut fields = line.split('\t');
        let reference_name = fields.nth(2);
        let position = fields.next();

        Some(Self {
            reference_name,
            position,
        })
    }

    /// Reference name (column 3), if present
    #[must_use]
    pub fn reference_name(&self) -> Option<&'a str> {
        self.reference_name
    }

    /// 1-based position (column 4). Missing or non-numeric values read as `None`.
    #[must_use]
    pub fn position(&self) -> Option<u64> {
        self.position.and_then(|p| p.trim().parse().ok())
    }

    /// A record is aligned when it names a reference and has a position greater than zero.
    #[must_use]
    pub fn is_aligned(&self) -> bool {
        self.aligned_reference().is_some()
    }

    /// The reference name of an aligned record, `None` otherwise
    #[must_use]
    pub fn aligned_reference(&self) -> Option<&'a str> {
        let name = self.reference_name?;
        if name == NO_REFERENCE || !self.position().is_some_and(|p| p > 0) {
            return None;
        }
        Some(name)
    }
}

/// Header lines start with `@` and are excluded from every count
#[must_use]
pub fn is_header_line(line: &str) -> bool {
    line.starts_with(HEADER_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALIGNED: &str =
        "read1\t0\tCP122180.1\t100\t60\t50M\t*\t0\t0\tACGT\tIIII";
    const UNMAPPED: &str = "read2\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII";

    #[test]
    fn test_header_lines_are_skipped() {
        assert!(AlignmentRecord::from_line("@HD\tVN:1.6").is_none());
        assert!(AlignmentRecord::from_line("@SQ\tSN:chr1\tLN:100").is_none());
    }

    #[test]
    fn test_aligned_record() {
        let record = AlignmentRecord::from_line(ALIGNED).unwrap();
        assert_eq!(record.reference_name(), Some("CP122180.1"));
        assert_eq!(record.position(), Some(100));
        assert!(record.is_aligned());
        assert_eq!(record.aligned_reference(), Some("CP122180.1"));
    }

    #[test]
    fn test_unmapped_record() {
        let record = AlignmentRecord::from_line(UNMAPPED).unwrap();
        assert!(!record.is_aligned());
        assert_eq!(record.aligned_reference(), None);
    }

    #[test]
    fn test_reference_with_zero_position_is_not_aligned() {
        let record =
            AlignmentRecord::from_line("r\t0\tCP1.1\t0\t0\t*\t*\t0\t0\tA\tI").unwrap();
        assert!(!record.is_aligned());
    }

    #[test]
    fn test_non_numeric_position_is_not_aligned() {
        for pos in ["abc", "-5", "", "1.5"] {
            let line = format!("r\t0\tCP1.1\t{pos}\t0\t*\t*\t0\t0\tA\tI");
            let record = AlignmentRecord::from_line(&line).unwrap();
            assert!(!record.is_aligned(), "position '{pos}' should not count");
        }
    }

    #[test]
    fn test_short_line_is_not_aligned() {
        let record = AlignmentRecord::from_line("r\t0\tCP1.1").unwrap();
        assert_eq!(record.reference_name(), Some("CP1.1"));
        assert_eq!(record.position(), None);
        assert!(!record.is_aligned());
    }
}
