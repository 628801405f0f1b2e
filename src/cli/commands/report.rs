//! Report command handler
//!
//! Generates break-even reports in Markdown or HTML with the ledger, each
//! program's analysis, an all-programs scenario sweep and an all-programs
//! projection.

use super::load_session;
use crate::args::{ProjectionArgs, RepairArgs, ScenarioArgs};
use breakeven_analytics::config::Config;
use breakeven_analytics::core::analysis::AnalysisReport;
use breakeven_analytics::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportFormat, ReportGenerator,
};
use breakeven_analytics::{error, info};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_TITLE: &str = "Break-even Report";

/// Options for one report run
pub struct ReportOptions<'a> {
    /// Programs CSV files
    pub input_files: &'a [PathBuf],
    /// Explicit output path
    pub output: Option<&'a Path>,
    /// Format name (markdown, md, html)
    pub format: &'a str,
    /// Report title
    pub title: Option<&'a str>,
    /// Sweep settings for the scenario section
    pub scenario: ScenarioArgs,
    /// Settings for the projection section
    pub projection: ProjectionArgs,
    /// Repairs applied while analyzing the inputs
    pub repair: RepairArgs,
}

/// Run the report command.
pub fn run(options: &ReportOptions, config: &Config) {
    if let Err(err) = generate_report(options, config) {
        error!("Report generation failed: {err}");
        eprintln!("{err}");
    }
}

/// Default report path: `<reports_dir>/<first input stem>_report.<ext>`
fn default_output_path(input_files: &[PathBuf], reports_dir: &str, format: ReportFormat) -> PathBuf {
    let stem = input_files
        .first()
        .and_then(|path| path.file_stem())
        .and_then(|stem| stem.to_str())
        .unwrap_or("programs");
    Path::new(reports_dir).join(format!("{stem}_report.{}", format.extension()))
}

/// Write the report to a file in the specified format
fn write_report(ctx: &ReportContext, format: ReportFormat, output_path: &Path) -> Result<(), String> {
    match format {
        ReportFormat::Markdown => MarkdownReporter::new()
            .generate(ctx, output_path)
            .map_err(|e| format!("✗ Failed to generate Markdown report: {e}")),
        ReportFormat::Html => HtmlReporter::new()
            .generate(ctx, output_path)
            .map_err(|e| format!("✗ Failed to generate HTML report: {e}")),
    }
}

/// Print a summary of the report
fn print_summary(ctx: &ReportContext, reports: &[AnalysisReport]) {
    println!("\n=== Summary ===");
    println!("Programs: {}", ctx.ledger.len());
    println!(
        "Profitable: {} of {}",
        ctx.profitable_count(),
        ctx.ledger.len()
    );
    println!("Total net profit: {:.2}", ctx.total_profit());
    println!(
        "Projected profit over {}: {:.2}",
        ctx.projection.params.horizon, ctx.projection.total_profit
    );

    let flagged = reports
        .iter()
        .filter(|r| !r.solution.advisories.is_empty())
        .count();
    if flagged > 0 {
        println!("⚠️  {flagged} program(s) have break-even advisories");
    }
}

fn generate_report(options: &ReportOptions, config: &Config) -> Result<(), String> {
    let format = ReportFormat::from_str(options.format)
        .map_err(|e| format!("✗ {e}. Use: markdown or html"))?;
    let sweep = options
        .scenario
        .sweep(config)
        .map_err(|e| format!("✗ Invalid scenario settings: {e}"))?;
    let params = options
        .projection
        .params(config)
        .map_err(|e| format!("✗ Invalid projection settings: {e}"))?;

    let (mut session, reports) = load_session(options.input_files, options.repair.directives())?;
    let simulation = session.simulation(sweep).to_vec();
    let projection = session
        .projection(params)
        .map_err(|e| format!("✗ Projection failed: {e}"))?
        .clone();

    let ctx = ReportContext::new(
        options.title.unwrap_or(DEFAULT_TITLE),
        session.ledger(),
        &reports,
        sweep,
        &simulation,
        &projection,
    );

    let output_path = options.output.map_or_else(
        || default_output_path(options.input_files, &config.paths.reports_dir, format),
        Path::to_path_buf,
    );
    write_report(&ctx, format, &output_path)?;

    println!("✓ Report generated: {}", output_path.display());
    info!("Report exported to: {}", output_path.display());

    print_summary(&ctx, &reports);
    Ok(())
}
