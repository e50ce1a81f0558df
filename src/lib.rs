//! # align-stats
//!
//! A library for summarizing how many reads in a set of SAM files aligned, and
//! to which chromosomes.
//!
//! Reads aligned against a GenBank assembly carry the sequence accession
//! (e.g. `CP122180.1`) as their reference name, which says little on its own.
//! `align-stats` joins those accessions against the assembly's NCBI assembly
//! report so that per-chromosome counts are labelled with names like `2L` or `X`.
//!
//! ## Features
//!
//! - **Read counting**: Total and aligned reads across any number of SAM files
//! - **Per-chromosome counts**: Aligned reads grouped by accession, joined to
//!   chromosome names, sorted by count
//! - **Format checks**: Quick structural validation before any counting
//! - **Explicit policies**: Opt-in skipping of unreadable inputs and a chosen
//!   rule for duplicate accessions in the assembly report
//!
//! ## Example
//!
//! ```rust,no_run
//! use align_stats::{ChromosomeMap, ReadErrorPolicy, DuplicateAccessionPolicy};
//! use align_stats::parsing::ncbi_report::build_chromosome_map;
//! use align_stats::stats::{aggregator::aggregate_by_chromosome, counter::count_reads};
//! use std::path::Path;
//!
//! let inputs = ["sample1.sam", "sample2.sam"];
//! let counters = count_reads(&inputs, ReadErrorPolicy::FailFast).unwrap();
//!
//! let map: ChromosomeMap = build_chromosome_map(
//!     Path::new("assembly_report.txt"),
//!     DuplicateAccessionPolicy::Last,
//! )
//! .unwrap();
//! let rows = aggregate_by_chromosome(&inputs, &map, ReadErrorPolicy::FailFast).unwrap();
//!
//! println!("{:.2}% aligned", counters.alignment_rate().unwrap_or(0.0));
//! for row in rows {
//!     println!("{}\t{}\t{}", row.accession, row.chromosome, row.count);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Records, counters, report rows and the chromosome map
//! - [`parsing`]: Streaming readers for SAM text and NCBI assembly reports
//! - [`stats`]: Read counting and per-chromosome aggregation
//! - [`utils`]: Input format validation
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod parsing;
pub mod stats;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::chromosome_map::ChromosomeMap;
pub use crate::core::record::AlignmentRecord;
pub use crate::core::types::*;
pub use crate::parsing::sam::ParseError;
pub use crate::stats::{summarize, Summary};
