//! CLI command handlers for `breakeven`.
//!
//! Each command is implemented in its own submodule. Helpers shared by the
//! batch commands live here.

pub mod analyze;
pub mod config;
pub mod project;
pub mod report;
pub mod simulate;

use breakeven_analytics::core::analysis::{analyze, AnalysisReport};
use breakeven_analytics::core::breakeven::{SolveDirectives, SolveStatus};
use breakeven_analytics::core::input::load_programs;
use breakeven_analytics::core::models::{AnalysisSession, ProgramRecord};
use breakeven_analytics::{error, info, warn};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Analyze every program in `input_files` and record each into a new session.
///
/// Programs that cannot be solved are skipped with a message so one bad row
/// does not abort the batch.
pub fn load_session(
    input_files: &[PathBuf],
    directives: SolveDirectives,
) -> Result<(AnalysisSession, Vec<AnalysisReport>), String> {
    let requests = load_programs(input_files).map_err(|e| {
        error!("Failed to load programs: {e}");
        format!("✗ Failed to load programs: {e}")
    })?;
    info!(
        "Loaded {} program(s) from {} file(s)",
        requests.len(),
        input_files.len()
    );

    let mut session = AnalysisSession::new();
    let mut reports = Vec::with_capacity(requests.len());
    for request in &requests {
        match analyze(request, directives) {
            Ok(report) => {
                session.record(report.record());
                reports.push(report);
            }
            Err(err) => {
                warn!("Skipping {}: {err}", request.name);
                match SolveStatus::of_error(&err) {
                    Some(status) => eprintln!(
                        "✗ {} [{status}]: {err} (rerun with --repair-margin)",
                        request.name
                    ),
                    None => eprintln!("✗ {}: {err}", request.name),
                }
            }
        }
    }

    if session.ledger().is_empty() {
        return Err("✗ No program could be analyzed".to_string());
    }
    Ok((session, reports))
}

/// Find a program by name, listing the available names when missing
pub fn find_program<'a>(
    session: &'a AnalysisSession,
    name: &str,
) -> Result<&'a ProgramRecord, String> {
    session.ledger().first_named(name).ok_or_else(|| {
        format!(
            "✗ Program '{name}' not found. Available: {}",
            session.ledger().program_names().join(", ")
        )
    })
}

/// Resolve where to write a file: the explicit path, or `default_name` in `dir`
pub fn output_path(explicit: Option<&Path>, dir: &str, default_name: &str) -> PathBuf {
    explicit.map_or_else(|| Path::new(dir).join(default_name), Path::to_path_buf)
}

/// Lowercase file-name stem for a program name
pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "program".to_string()
    } else {
        stem.to_string()
    }
}

/// Log label for a program selector
pub fn program_label(program: Option<&str>) -> &str {
    program.unwrap_or("all programs")
}

/// Export file stem for a program selector
pub fn export_stem(program: Option<&str>) -> String {
    program.map_or_else(|| "all_programs".to_string(), file_stem)
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` is a no
pub fn confirm(prompt: &str) -> bool {
    print!("{prompt} (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    io::stdin().read_line(&mut response).ok();

    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}
