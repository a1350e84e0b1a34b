//! Per-file processing reports.

use serde::Serialize;
use std::path::PathBuf;

/// Outcome of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Input file path.
    pub input: PathBuf,
    /// Output file path.
    pub output: PathBuf,
    /// Input size in bytes.
    pub input_size: u64,
    /// Output size in bytes; 0 when the file failed.
    pub output_size: u64,
    /// Whether the file was processed successfully.
    pub success: bool,
    /// The error message for a failed file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    /// Output-to-input size ratio as a percentage, or `None` for failures
    /// and empty inputs.
    pub fn ratio(&self) -> Option<f64> {
        if !self.success || self.input_size == 0 {
            return None;
        }
        Some(self.output_size as f64 * 100.0 / self.input_size as f64)
    }
}

/// Print reports as a human-readable table.
pub fn print_reports(reports: &[FileReport], verbose: bool) {
    if verbose {
        println!("{:>12} {:>12} {:>7}  Name", "In", "Out", "Ratio");
        println!("{}", "-".repeat(60));
    }

    let mut total_in = 0u64;
    let mut total_out = 0u64;
    for report in reports {
        if report.success {
            total_in += report.input_size;
            total_out += report.output_size;
            if verbose {
                let ratio = report
                    .ratio()
                    .map_or_else(|| "-".to_string(), |r| format!("{r:.1}%"));
                println!(
                    "{:>12} {:>12} {:>7}  {}",
                    report.input_size,
                    report.output_size,
                    ratio,
                    report.input.display()
                );
            }
        } else {
            let message = report.error.as_deref().unwrap_or("unknown error");
            eprintln!("Error: {}: {}", report.input.display(), message);
        }
    }

    let failed = reports.iter().filter(|r| !r.success).count();
    let succeeded = reports.len() - failed;
    if verbose {
        println!("{}", "-".repeat(60));
    }
    println!(
        "{succeeded} file(s) processed, {failed} failed, {total_in} bytes in, {total_out} bytes out"
    );
}

/// Print reports as a JSON array on stdout.
pub fn print_reports_json(reports: &[FileReport]) {
    match serde_json::to_string_pretty(reports) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize report: {e}"),
    }
}
