use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::debug;

use crate::core::chromosome_map::ChromosomeMap;
use crate::core::types::{ReadErrorPolicy, ReportRow, UNKNOWN_CHROMOSOME};
use crate::parsing::sam::{open_input, read_records, ParseError};
use crate::stats::for_each_input;

/// Count of aligned records per reference accession.
///
/// Accessions are kept in first-seen order so that equal counts sort
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessionTally {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl AccessionTally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one aligned record for `accession`
    pub fn observe(&mut self, accession: &str) {
        self.add(accession, 1);
    }

    fn add(&mut self, accession: &str, count: u64) {
        if let Some(&idx) = self.index.get(accession) {
            self.counts[idx].1 += count;
        } else {
            self.index.insert(accession.to_string(), self.counts.len());
            self.counts.push((accession.to_string(), count));
        }
    }

    /// Fold another tally into this one. Accessions new to `self` are appended
    /// in `other`'s order.
    pub fn merge(&mut self, other: &AccessionTally) {
        for (accession, count) in &other.counts {
            self.add(accession, *count);
        }
    }

    #[must_use]
    pub fn count(&self, accession: &str) -> u64 {
        self.index
            .get(accession)
            .map_or(0, |&idx| self.counts[idx].1)
    }

    /// Number of distinct accessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(acc, c)| (acc.as_str(), *c))
    }
}

/// Tally aligned records by reference name in an open SAM stream
///
/// # Errors
///
/// Returns `ParseError::Io` if the stream fails part way through.
pub fn tally_accessions_in<R: BufRead>(reader: R, path: &Path) -> Result<AccessionTally, ParseError> {
    let mut tally = AccessionTally::new();
    read_records(reader, path, |record| {
        if let Some(accession) = record.aligned_reference() {
            tally.observe(accession);
        }
    })?;
    Ok(tally)
}

/// Join accession counts against the chromosome map and order by count.
///
/// With a non-empty map this is an inner join: accessions absent from the map
/// produce no row. With an empty map every accession is kept and labelled
/// [`UNKNOWN_CHROMOSOME`]. Rows are sorted by descending count; ties keep
/// first-seen order.
#[must_use]
pub fn join_chromosomes(tally: &AccessionTally, map: &ChromosomeMap) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = if map.is_empty() {
        tally
            .iter()
            .map(|(accession, count)| ReportRow::new(accession, UNKNOWN_CHROMOSOME, count))
            .collect()
    } else {
        tally
            .iter()
            .filter_map(|(accession, count)| {
                let chromosome = map.get(accession)?;
                Some(ReportRow::new(accession, chromosome, count))
            })
            .collect()
    };

    let dropped = tally.len() - rows.len();
    if dropped > 0 {
        debug!(dropped, "Accessions without an assembly report entry were dropped");
    }

    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// Aligned-read counts per chromosome across all alignment files combined.
///
/// # Errors
///
/// Under [`ReadErrorPolicy::FailFast`], returns the first `ParseError::MissingFile`
/// or `ParseError::Io` encountered.
pub fn aggregate_by_chromosome<P: AsRef<Path>>(
    paths: &[P],
    map: &ChromosomeMap,
    policy: ReadErrorPolicy,
) -> Result<Vec<ReportRow>, ParseError> {
    let per_file = for_each_input(paths, policy, |path| {
        tally_accessions_in(open_input(path)?, path)
    })?;

    let mut tally = AccessionTally::new();
    for (_, file_tally) in &per_file.files {
        tally.merge(file_tally);
    }

    Ok(join_chromosomes(&tally, map))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn tally_of(pairs: &[(&str, u64)]) -> AccessionTally {
        let mut tally = AccessionTally::new();
        for (acc, n) in pairs {
            for _ in 0..*n {
                tally.observe(acc);
            }
        }
        tally
    }

    fn assert_sorted(rows: &[ReportRow]) {
        for pair in rows.windows(2) {
            assert!(pair[0].count >= pair[1].count, "rows out of order: {rows:?}");
        }
    }

    #[test]
    fn test_tally_counts_aligned_only() {
        let sam = "@SQ\tSN:CP1.1\tLN:10
r1\t0\tCP1.1\t1\t60\t1M\t*\t0\t0\tA\tI
r2\t0\tCP2.1\t5\t60\t1M\t*\t0\t0\tA\tI
r3\t0\tCP1.1\t9\t60\t1M\t*\t0\t0\tA\tI
r4\t4\t*\t0\t0\t*\t*\t0\t0\tA\tI
r5\t4\tCP2.1\t0\t0\t*\t*\t0\t0\tA\tI
";
        let tally = tally_accessions_in(Cursor::new(sam), Path::new("a.sam")).unwrap();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.count("CP1.1"), 2);
        assert_eq!(tally.count("CP2.1"), 1);
        assert_eq!(tally.count("*"), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_merge_preserves_first_seen_order() {
        let mut a = tally_of(&[("CP2.1", 1), ("CP1.1", 2)]);
        let b = tally_of(&[("CP3.1", 1), ("CP1.1", 1)]);
        a.merge(&b);

        let order: Vec<_> = a.iter().collect();
        assert_eq!(order, vec![("CP2.1", 1), ("CP1.1", 3), ("CP3.1", 1)]);
    }

    #[test]
    fn test_join_inner() {
        let tally = tally_of(&[("CP1.1", 3), ("CP2.1", 7), ("CP9.1", 50)]);
        let map: ChromosomeMap = [("CP1.1", "2L"), ("CP2.1", "2R")].into_iter().collect();

        let rows = join_chromosomes(&tally, &map);
        assert_eq!(
            rows,
            vec![
                ReportRow::new("CP2.1", "2R", 7),
                ReportRow::new("CP1.1", "2L", 3),
            ]
        );
    }

    #[test]
    fn test_join_empty_map_is_unknown() {
        let tally = tally_of(&[("CP1.1", 3), ("CP2.1", 7)]);
        let rows = join_chromosomes(&tally, &ChromosomeMap::default());

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.chromosome == UNKNOWN_CHROMOSOME));
        assert_eq!(rows[0], ReportRow::new("CP2.1", UNKNOWN_CHROMOSOME, 7));
        assert_eq!(rows[1], ReportRow::new("CP1.1", UNKNOWN_CHROMOSOME, 3));
    }

    #[test]
    fn test_join_ties_keep_first_seen_order() {
        let tally = tally_of(&[("CP3.1", 2), ("CP1.1", 5), ("CP2.1", 2)]);
        let rows = join_chromosomes(&tally, &ChromosomeMap::default());
        let accessions: Vec<_> = rows.iter().map(|r| r.accession.as_str()).collect();
        assert_eq!(accessions, vec!["CP1.1", "CP3.1", "CP2.1"]);
        assert_sorted(&rows);
    }

    #[test]
    fn test_join_no_aligned_records() {
        let map: ChromosomeMap = [("CP1.1", "2L")].into_iter().collect();
        assert!(join_chromosomes(&AccessionTally::new(), &map).is_empty());
        assert!(join_chromosomes(&AccessionTally::new(), &ChromosomeMap::default()).is_empty());
    }
}
