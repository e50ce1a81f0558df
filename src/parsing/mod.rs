//! Streaming readers for the two input formats.
//!
//! - **SAM text files**: data records are streamed line by line; header lines
//!   (`@HD`, `@SQ`, `@RG`, `@PG`, `@CO`) are skipped
//! - **NCBI assembly reports**: parsed into a [`ChromosomeMap`](crate::core::chromosome_map::ChromosomeMap)
//!
//! ## Example
//!
//! ```rust,no_run
//! use align_stats::core::types::DuplicateAccessionPolicy;
//! use align_stats::parsing::ncbi_report::build_chromosome_map;
//! use align_stats::parsing::sam::read_records_from_file;
//! use std::path::Path;
//!
//! let map = build_chromosome_map(
//!     Path::new("GCA_000001215.4_assembly_report.txt"),
//!     DuplicateAccessionPolicy::Last,
//! )
//! .unwrap();
//!
//! read_records_from_file(Path::new("sample.sam"), |record| {
//!     if let Some(accession) = record.aligned_reference() {
//!         println!("{accession} -> {:?}", map.get(accession));
//!     }
//! })
//! .unwrap();
//! ```
//!
//! Both formats are tab-delimited text. Compressed and binary inputs (BAM, CRAM,
//! gzip) are not read.

pub mod ncbi_report;
pub mod sam;
