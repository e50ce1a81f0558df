//! Command-line interface for align-stats.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **summarize**: Count total/aligned reads and aligned reads per chromosome
//! - **validate**: Only run the format checks on the inputs
//!
//! ## Usage
//!
//! ```text
//! # Summarize two SAM files against an NCBI assembly report
//! align-stats summarize sample1.sam sample2.sam GCA_000001215.4_assembly_report.txt
//!
//! # JSON output for scripting, written to a file
//! align-stats summarize sample.sam report.txt --format json -o summary.json
//!
//! # Keep going when an input cannot be read
//! align-stats summarize a.sam missing.sam report.txt --skip-unreadable
//!
//! # Check inputs without counting
//! align-stats validate a.sam b.sam --assembly-report report.txt
//! ```

use clap::{Parser, Subcommand};

pub mod summarize;
pub mod validate;

#[derive(Parser)]
#[command(name = "align-stats")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Summarize alignment rates and per-chromosome read counts from SAM files")]
#[command(
    long_about = "align-stats reads one or more SAM text files and an NCBI assembly report and reports:\n- Total number of reads\n- Number of aligned reads and the alignment rate\n- Aligned reads per chromosome, with GenBank accessions resolved to chromosome names"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count reads and aligned reads per chromosome
    Summarize(summarize::SummarizeArgs),

    /// Check that inputs have the expected tabular layout
    Validate(validate::ValidateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
