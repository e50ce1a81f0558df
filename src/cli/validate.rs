use std::path::PathBuf;

use clap::Args;

use crate::cli::OutputFormat;
use crate::parsing::sam::ParseError;
use crate::utils::validation::{validate_alignment_format, validate_assembly_format};

#[derive(Args)]
pub struct ValidateArgs {
    /// SAM files to check
    #[arg(required = true)]
    pub alignments: Vec<PathBuf>,

    /// NCBI assembly report to check
    #[arg(long)]
    pub assembly_report: Option<PathBuf>,
}

/// Result of checking one input
struct Check {
    path: PathBuf,
    kind: &'static str,
    result: Result<(), ParseError>,
}

/// Execute validate subcommand
///
/// # Errors
///
/// Returns an error if any input fails validation.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut checks: Vec<Check> = args
        .alignments
        .iter()
        .map(|path| Check {
            path: path.clone(),
            kind: "alignment",
            result: validate_alignment_format(path),
        })
        .collect();

    if let Some(path) = &args.assembly_report {
        checks.push(Check {
            path: path.clone(),
            kind: "assembly_report",
            result: validate_assembly_format(path),
        });
    }

    match format {
        OutputFormat::Text | OutputFormat::Tsv => print_text_results(&checks, verbose),
        OutputFormat::Json => print_json_results(&checks)?,
    }

    let failed = checks.iter().filter(|c| c.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} input(s) failed validation", checks.len());
    }
    Ok(())
}

fn print_text_results(checks: &[Check], verbose: bool) {
    for check in checks {
        match &check.result {
            Ok(()) => {
                if verbose {
                    println!("OK\t{}\t{}", check.kind, check.path.display());
                } else {
                    println!("OK\t{}", check.path.display());
                }
            }
            Err(e) => println!("FAILED\t{}\t{e}", check.path.display()),
        }
    }
}

fn print_json_results(checks: &[Check]) -> anyhow::Result<()> {
    let results: Vec<_> = checks
        .iter()
        .map(|check| {
            serde_json::json!({
                "path": check.path.display().to_string(),
                "kind": check.kind,
                "valid": check.result.is_ok(),
                "error": check.result.as_ref().err().map(ToString::to_string),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&results)?);
    Ok(())
}
