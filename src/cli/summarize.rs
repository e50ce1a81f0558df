use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::OutputFormat;
use crate::core::types::{DuplicateAccessionPolicy, ReadErrorPolicy};
use crate::parsing::ncbi_report::build_chromosome_map;
use crate::parsing::sam::{check_inputs_exist, ParseError};
use crate::stats::{summarize, Summary};
use crate::utils::validation::{validate_alignment_format, validate_assembly_format};

/// Printed instead of the chromosome table when no read aligned
pub const NO_CHROMOSOME_DATA: &str = "No chromosome alignment data available";

#[derive(Args)]
pub struct SummarizeArgs {
    /// One or more SAM files followed by the NCBI assembly report
    #[arg(required = true, num_args = 2.., value_name = "FILE")]
    pub inputs: Vec<PathBuf>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip alignment files that are missing or fail to read, instead of aborting
    #[arg(long)]
    pub skip_unreadable: bool,

    /// How to resolve an accession listed more than once in the assembly report
    #[arg(long, value_enum, default_value = "last")]
    pub duplicate_accessions: DuplicateAccessionPolicy,

    /// Do not run the format checks before counting
    #[arg(long)]
    pub no_validate: bool,

    /// Include per-file read counts in the report
    #[arg(long)]
    pub per_file: bool,
}

impl SummarizeArgs {
    /// Split the positional inputs into alignment files and the assembly report
    #[must_use]
    pub fn split_inputs(&self) -> (&[PathBuf], &Path) {
        match self.inputs.split_last() {
            Some((report, alignments)) => (alignments, report.as_path()),
            None => (&[], Path::new("")),
        }
    }

    #[must_use]
    pub fn read_error_policy(&self) -> ReadErrorPolicy {
        if self.skip_unreadable {
            ReadErrorPolicy::Skip
        } else {
            ReadErrorPolicy::FailFast
        }
    }
}

/// Execute summarize subcommand
///
/// # Errors
///
/// Returns an error if an input is missing (unless skipping), fails validation,
/// cannot be read, or the report cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: SummarizeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let started = Instant::now();
    let (alignments, report_path) = args.split_inputs();
    let policy = args.read_error_policy();

    info!(
        alignments = alignments.len(),
        assembly_report = %report_path.display(),
        "Starting alignment summary"
    );

    if policy == ReadErrorPolicy::FailFast {
        check_inputs_exist(alignments)?;
    }

    if !args.no_validate {
        validate_inputs(alignments, report_path, policy)?;
    }

    let map = build_chromosome_map(report_path, args.duplicate_accessions)?;
    info!(entries = map.len(), "Loaded chromosome map");

    let summary = summarize(alignments, &map, policy)?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_report(&mut writer, &summary, alignments, format, args.per_file || verbose)?;
            writer.flush()?;
            info!(path = %path.display(), "Wrote report");
        }
        None => {
            let stdout = std::io::stdout();
            let mut writer = stdout.lock();
            write_report(&mut writer, &summary, alignments, format, args.per_file || verbose)?;
        }
    }

    info!(
        elapsed_ms = started.elapsed().as_millis(),
        total_reads = summary.counters.total_reads,
        aligned_reads = summary.counters.aligned_reads,
        "Finished alignment summary"
    );
    Ok(())
}

/// Run the format checks on every alignment file and the assembly report.
///
/// Unreadable alignment files are left for the counting pass to skip when the
/// policy allows it. A missing assembly report is not checked.
fn validate_inputs(
    alignments: &[PathBuf],
    report_path: &Path,
    policy: ReadErrorPolicy,
) -> Result<(), ParseError> {
    for path in alignments {
        match validate_alignment_format(path) {
            Ok(()) => debug!(path = %path.display(), "Alignment file passed validation"),
            Err(e) if policy == ReadErrorPolicy::Skip && e.is_unreadable() => {}
            Err(e) => return Err(e),
        }
    }

    if report_path.is_file() {
        validate_assembly_format(report_path)?;
        debug!(path = %report_path.display(), "Assembly report passed validation");
    }
    Ok(())
}

/// Render the summary in the requested format
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_report<W: Write>(
    w: &mut W,
    summary: &Summary,
    alignments: &[PathBuf],
    format: OutputFormat,
    per_file: bool,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => write_text_report(w, summary, per_file)?,
        OutputFormat::Json => write_json_report(w, summary, alignments, per_file)?,
        OutputFormat::Tsv => write_tsv_report(w, summary)?,
    }
    Ok(())
}

fn format_rate(summary: &Summary) -> String {
    format!("{:.2}", summary.counters.alignment_rate().unwrap_or(0.0))
}

/// The plain text report
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_text_report<W: Write>(
    w: &mut W,
    summary: &Summary,
    per_file: bool,
) -> std::io::Result<()> {
    if per_file {
        for file in &summary.per_file {
            writeln!(
                w,
                "{}: {} reads, {} aligned",
                file.path, file.counters.total_reads, file.counters.aligned_reads
            )?;
        }
        for skipped in &summary.skipped {
            writeln!(w, "{skipped}: skipped (unreadable)")?;
        }
        writeln!(w)?;
    }

    writeln!(
        w,
        "Total number of reads processed: {}",
        summary.counters.total_reads
    )?;
    writeln!(w, "Number of aligned reads: {}", summary.counters.aligned_reads)?;
    writeln!(w, "Alignment rate: {}%", format_rate(summary))?;
    writeln!(w)?;
    writeln!(w, "Reads aligned per chromosome:")?;

    if summary.rows.is_empty() {
        writeln!(w, "{NO_CHROMOSOME_DATA}")?;
        return Ok(());
    }

    writeln!(w, "ACC\tCHR\tCOUNT")?;
    for row in &summary.rows {
        writeln!(w, "{}\t{}\t{}", row.accession, row.chromosome, row.count)?;
    }
    Ok(())
}

/// JSON document: run metadata followed by the serialized [`Summary`]
#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    inputs: Vec<String>,
    alignment_rate: Option<f64>,
    #[serde(flatten)]
    summary: &'a Summary,
}

fn write_json_report<W: Write>(
    w: &mut W,
    summary: &Summary,
    alignments: &[PathBuf],
    per_file: bool,
) -> anyhow::Result<()> {
    let report = JsonReport {
        generated_at: Utc::now(),
        inputs: alignments.iter().map(|p| p.display().to_string()).collect(),
        alignment_rate: summary.counters.alignment_rate(),
        summary,
    };

    let mut output = serde_json::to_value(&report)?;
    if !per_file {
        if let Some(fields) = output.as_object_mut() {
            fields.remove("per_file");
        }
    }

    writeln!(w, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn write_tsv_report<W: Write>(w: &mut W, summary: &Summary) -> std::io::Result<()> {
    writeln!(w, "#total_reads\t{}", summary.counters.total_reads)?;
    writeln!(w, "#aligned_reads\t{}", summary.counters.aligned_reads)?;
    writeln!(w, "#alignment_rate\t{}", format_rate(summary))?;
    writeln!(w, "accession\tchromosome\tcount")?;
    for row in &summary.rows {
        writeln!(w, "{}\t{}\t{}", row.accession, row.chromosome, row.count)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FileCounts, ReportRow, RunCounters, UNKNOWN_CHROMOSOME};

    fn summary(rows: Vec<ReportRow>, counters: RunCounters) -> Summary {
        Summary {
            counters,
            per_file: vec![FileCounts {
                path: "a.sam".to_string(),
                counters,
            }],
            skipped: Vec::new(),
            chromosome_map_size: 1,
            rows,
        }
    }

    fn render(summary: &Summary, format: OutputFormat, per_file: bool) -> String {
        let mut out = Vec::new();
        write_report(&mut out, summary, &[PathBuf::from("a.sam")], format, per_file).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_text_report() {
        let s = summary(vec![ReportRow::new("CP1.1", "2L", 8)], RunCounters::new(10, 8));
        let text = render(&s, OutputFormat::Text, false);
        assert_eq!(
            text,
            "Total number of reads processed: 10\n\
Number of aligned reads: 8\n\
Alignment rate: 80.00%\n\
\n\
Reads aligned per chromosome:\n\
ACC\tCHR\tCOUNT\n\
CP1.1\t2L\t8\n"
        );
    }

    #[test]
    fn test_text_report_no_reads() {
        let s = summary(Vec::new(), RunCounters::default());
        let text = render(&s, OutputFormat::Text, false);
        assert!(text.contains("Alignment rate: 0.00%"));
        assert!(text.ends_with(&format!("{NO_CHROMOSOME_DATA}\n")));
        assert!(!text.contains("ACC\tCHR\tCOUNT"));
    }

    #[test]
    fn test_text_report_per_file() {
        let s = summary(Vec::new(), RunCounters::new(3, 1));
        let text = render(&s, OutputFormat::Text, true);
        assert!(text.starts_with("a.sam: 3 reads, 1 aligned\n"));
    }

    #[test]
    fn test_json_report() {
        let s = summary(
            vec![ReportRow::new("CP1.1", UNKNOWN_CHROMOSOME, 8)],
            RunCounters::new(10, 8),
        );
        let json: serde_json::Value =
            serde_json::from_str(&render(&s, OutputFormat::Json, false)).unwrap();

        assert_eq!(json["total_reads"], 10);
        assert_eq!(json["aligned_reads"], 8);
        let rate = json["alignment_rate"].as_f64().unwrap();
        assert!((rate - 80.0).abs() < 1e-9);
        assert_eq!(json["chromosomes"][0]["chromosome"], "Unknown");
        assert_eq!(json["chromosomes"][0]["count"], 8);
        assert!(json["generated_at"].is_string());
        assert!(json.get("per_file").is_none());
        assert!(json.get("skipped").is_none());
        assert_eq!(json["inputs"][0], "a.sam");
    }

    #[test]
    fn test_json_report_lists_skipped_files() {
        let mut s = summary(Vec::new(), RunCounters::new(2, 1));
        s.skipped = vec!["gone.sam".to_string()];
        let json: serde_json::Value =
            serde_json::from_str(&render(&s, OutputFormat::Json, false)).unwrap();

        assert_eq!(json["skipped"], serde_json::json!(["gone.sam"]));
        assert_eq!(json["chromosome_map_size"], 1);
        assert_eq!(json["chromosomes"], serde_json::json!([]));
        assert!(json.get("rows").is_none());
    }

    #[test]
    fn test_json_report_no_reads_has_null_rate() {
        let s = summary(Vec::new(), RunCounters::default());
        let json: serde_json::Value =
            serde_json::from_str(&render(&s, OutputFormat::Json, true)).unwrap();
        assert!(json["alignment_rate"].is_null());
        assert_eq!(json["per_file"][0]["total_reads"], 0);
    }

    #[test]
    fn test_tsv_report() {
        let s = summary(
            vec![
                ReportRow::new("CP2.1", "2R", 5),
                ReportRow::new("CP1.1", "2L", 3),
            ],
            RunCounters::new(9, 8),
        );
        let tsv = render(&s, OutputFormat::Tsv, false);
        let lines: Vec<_> = tsv.lines().collect();
        assert_eq!(lines[2], "#alignment_rate\t88.89");
        assert_eq!(lines[3], "accession\tchromosome\tcount");
        assert_eq!(lines[4], "CP2.1\t2R\t5");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_split_inputs() {
        let args = SummarizeArgs {
            inputs: vec!["a.sam".into(), "b.sam".into(), "report.txt".into()],
            output: None,
            skip_unreadable: false,
            duplicate_accessions: DuplicateAccessionPolicy::Last,
            no_validate: false,
            per_file: false,
        };
        let (alignments, report) = args.split_inputs();
        assert_eq!(alignments.len(), 2);
        assert_eq!(report, Path::new("report.txt"));
        assert_eq!(args.read_error_policy(), ReadErrorPolicy::FailFast);
    }
}
