//! Core data types for alignment summaries.
//!
//! - [`AlignmentRecord`](record::AlignmentRecord): a borrowed view of one SAM data line
//! - [`ChromosomeMap`](chromosome_map::ChromosomeMap): GenBank accession to sequence name lookup
//! - [`RunCounters`](types::RunCounters), [`ReportRow`](types::ReportRow): summary outputs
//!
//! ## Aligned reads
//!
//! A record counts as aligned when column 3 (reference name) is not `*` and
//! column 4 (position) parses as an integer greater than zero:
//!
//! | RNAME | POS | Total | Aligned |
//! |-------|-----|-------|---------|
//! | `CP122180.1` | `100` | yes | yes |
//! | `CP122180.1` | `0`   | yes | no  |
//! | `*`          | `0`   | yes | no  |
//! | `CP122180.1` | `abc` | yes | no  |
//!
//! Header lines (`@HD`, `@SQ`, ...) are never counted.

pub mod chromosome_map;
pub mod record;
pub mod types;
