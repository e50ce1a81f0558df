use serde::{Deserialize, Serialize};

/// Chromosome label used for every row when no assembly report mapping is available
pub const UNKNOWN_CHROMOSOME: &str = "Unknown";

/// Helper function to convert a read count to f64 with explicit precision loss allowance
#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Total and aligned read counts accumulated over one or more alignment files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    /// Number of non-header records
    pub total_reads: u64,
    /// Number of records with a reference name and a positive position
    pub aligned_reads: u64,
}

impl RunCounters {
    #[must_use]
    pub fn new(total_reads: u64, aligned_reads: u64) -> Self {
        Self {
            total_reads,
            aligned_reads,
        }
    }

    /// Record one non-header record
    pub fn observe(&mut self, aligned: bool) {
        self.total_reads += 1;
        if aligned {
            self.aligned_reads += 1;
        }
    }

    /// Add another set of counters into this one
    pub fn merge(&mut self, other: &RunCounters) {
        self.total_reads += other.total_reads;
        self.aligned_reads += other.aligned_reads;
    }

    /// Percentage of reads that aligned, or `None` when no reads were seen
    #[must_use]
    pub fn alignment_rate(&self) -> Option<f64> {
        if self.total_reads == 0 {
            return None;
        }
        Some(count_to_f64(self.aligned_reads) / count_to_f64(self.total_reads) * 100.0)
    }
}

impl std::ops::Add for RunCounters {
    type Output = RunCounters;

    fn add(mut self, rhs: RunCounters) -> RunCounters {
        self.merge(&rhs);
        self
    }
}

impl std::iter::Sum for RunCounters {
    fn sum<I: Iterator<Item = RunCounters>>(iter: I) -> Self {
        iter.fold(RunCounters::default(), |acc, c| acc + c)
    }
}

/// Counters for a single alignment file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCounts {
    pub path: String,
    #[serde(flatten)]
    pub counters: RunCounters,
}

/// One line of the per-chromosome table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Reference accession as it appears in the alignment records
    pub accession: String,
    /// Sequence name from the assembly report, or [`UNKNOWN_CHROMOSOME`]
    pub chromosome: String,
    /// Number of aligned records referencing this accession
    pub count: u64,
}

impl ReportRow {
    pub fn new(accession: impl Into<String>, chromosome: impl Into<String>, count: u64) -> Self {
        Self {
            accession: accession.into(),
            chromosome: chromosome.into(),
            count,
        }
    }
}

/// What to do when an alignment file is missing or fails while being read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ReadErrorPolicy {
    /// Abort the run on the first unreadable file
    #[default]
    FailFast,
    /// Warn and leave the file out of every count
    Skip,
}

/// How repeated accessions in the assembly report are resolved
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateAccessionPolicy {
    /// Keep the first sequence name seen for an accession
    First,
    /// Later lines overwrite earlier ones
    #[default]
    Last,
    /// Fail when an accession maps to two different sequence names
    Reject,
}

impl std::fmt::Display for DuplicateAccessionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Last => write!(f, "last"),
            Self::Reject => write!(f, "reject"),
        }
    }
}
