//! Analyze command handler
//!
//! A single program given by flags is solved interactively: a non-viable
//! margin or a shortfall against current enrollment is reported first, and
//! the matching repair is applied only after the user confirms it (or when
//! the repair flag was passed). Programs loaded from CSV files are solved in
//! batch with the flags as the only source of repairs.

use super::{confirm, file_stem, load_session, output_path};
use crate::args::{ProgramArgs, RepairArgs};
use breakeven_analytics::config::Config;
use breakeven_analytics::core::analysis::{analyze, AnalysisReport, AnalysisRequest};
use breakeven_analytics::core::export::{analysis_table, export_csv, ledger_table};
use breakeven_analytics::core::models::AnalysisSession;
use breakeven_analytics::core::tuition::{CapacityInputs, PricingPolicy};
use breakeven_analytics::core::BreakEvenError;
use breakeven_analytics::{error, info, verbose};
use std::path::PathBuf;

const DEFAULT_PROGRAM_NAME: &str = "Program";
const LEDGER_FILE: &str = "ledger.csv";

/// Run the analyze command.
///
/// # Arguments
/// * `input_files` - Programs CSV files; empty for single-program mode
/// * `program` - Single-program flags
/// * `repair` - Repairs to apply without asking
/// * `export` - Whether to write CSV files to the exports directory
/// * `config` - Configuration with the default margin and exports directory
pub fn run(
    input_files: &[PathBuf],
    program: &ProgramArgs,
    repair: RepairArgs,
    export: bool,
    config: &Config,
) {
    let result = match (input_files.is_empty(), program.is_present()) {
        (false, _) => run_batch(input_files, repair, export, config),
        (true, true) => run_single(program, repair, export, config),
        (true, false) => Err(
            "✗ Nothing to analyze: pass programs CSV files or single-program flags (see --help)"
                .to_string(),
        ),
    };

    if let Err(err) = result {
        eprintln!("{err}");
    }
}

/// Build a request from single-program flags
fn build_request(program: &ProgramArgs, config: &Config) -> Result<AnalysisRequest, String> {
    let (Some(num_rooms), Some(room_capacity)) = (program.rooms, program.room_capacity) else {
        return Err(
            "✗ Provide programs CSV files, or --rooms and --room-capacity for a single program"
                .to_string(),
        );
    };

    let pricing = program.tuition.map_or_else(
        || PricingPolicy::Margin(program.margin.unwrap_or(config.model.margin_pct)),
        PricingPolicy::Manual,
    );

    Ok(AnalysisRequest {
        name: program
            .name
            .clone()
            .unwrap_or_else(|| DEFAULT_PROGRAM_NAME.to_string()),
        capacity: CapacityInputs {
            num_rooms,
            room_capacity,
            current_enrollment: program.students.unwrap_or(0),
            fixed_cost: program.fixed_cost.unwrap_or(0.0),
            variable_cost: program.variable_cost.unwrap_or(0.0),
        },
        pricing,
    })
}

/// Solve one program, asking before each repair the flags did not request
fn solve_interactively(
    request: &AnalysisRequest,
    repair: RepairArgs,
) -> Result<AnalysisReport, String> {
    let mut directives = repair.directives();

    let mut report = match analyze(request, directives) {
        Ok(report) => report,
        Err(err @ BreakEvenError::NonViableMargin { .. }) => {
            println!("✗ {err}");
            if !confirm("Raise tuition to variable cost per student + 1?") {
                return Err("✗ Analysis halted: tuition does not cover variable cost".to_string());
            }
            directives.repair_margin = true;
            analyze(request, directives).map_err(|e| format!("✗ {e}"))?
        }
        Err(err) => return Err(format!("✗ Invalid program: {err}")),
    };

    for advisory in &report.solution.advisories {
        println!("⚠ {advisory}");
    }

    if report.solution.offers_rentability_recalculation()
        && confirm("Recalculate tuition so current enrollment reaches break-even?")
    {
        directives.recalculate_for_rentability = true;
        report = analyze(request, directives).map_err(|e| format!("✗ {e}"))?;
    }

    Ok(report)
}

fn run_single(
    program: &ProgramArgs,
    repair: RepairArgs,
    export: bool,
    config: &Config,
) -> Result<(), String> {
    let request = build_request(program, config)?;
    let report = solve_interactively(&request, repair)?;

    print_report(&report);

    let mut session = AnalysisSession::new();
    session.record(report.record());

    if export {
        export_all(&session, std::slice::from_ref(&report), config)?;
    }
    Ok(())
}

fn run_batch(
    input_files: &[PathBuf],
    repair: RepairArgs,
    export: bool,
    config: &Config,
) -> Result<(), String> {
    let (session, reports) = load_session(input_files, repair.directives())?;

    for report in &reports {
        print_report(report);
        println!();
    }
    print_ledger(&session);

    if export {
        export_all(&session, &reports, config)?;
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!("\n=== {} ===\n", report.request.name);
    for (key, value) in report.summary() {
        println!("{key:<22} {value}");
    }
    for repair in &report.solution.repairs {
        println!("✓ {repair}");
    }
    verbose!(
        "Variable cost per seat: {:.2} over {} seats",
        report.quote.variable_cost_per_student,
        report.quote.total_capacity
    );
}

fn print_ledger(session: &AnalysisSession) {
    let ledger = session.ledger();
    println!("=== Ledger ({} programs) ===\n", ledger.len());
    println!(
        "{:<24} {:>9} {:>12} {:>11} {:>14}",
        "Program", "Students", "Tuition", "Break-even", "Net Profit"
    );
    for record in ledger {
        println!(
            "{:<24} {:>9} {:>12.2} {:>11} {:>14.2}",
            record.name,
            record.enrolled,
            record.tuition,
            record.break_even,
            record.net_profit()
        );
    }
    let total: f64 = ledger.iter().map(|r| r.net_profit()).sum();
    println!("\nTotal net profit: {total:.2}");
}

/// Write one analysis CSV per report plus the ledger CSV
fn export_all(
    session: &AnalysisSession,
    reports: &[AnalysisReport],
    config: &Config,
) -> Result<(), String> {
    let dir = &config.paths.exports_dir;

    for report in reports {
        let path = output_path(
            None,
            dir,
            &format!("{}_analysis.csv", file_stem(&report.request.name)),
        );
        export_csv(&analysis_table(report), &path).map_err(|e| {
            error!("Failed to export {}: {e}", path.display());
            format!("✗ Failed to export {}: {e}", path.display())
        })?;
        println!("✓ Exported: {}", path.display());
    }

    let path = output_path(None, dir, LEDGER_FILE);
    export_csv(&ledger_table(session.ledger()), &path).map_err(|e| {
        error!("Failed to export {}: {e}", path.display());
        format!("✗ Failed to export {}: {e}", path.display())
    })?;
    println!("✓ Exported: {}", path.display());
    info!("Exported {} analysis file(s) and the ledger", reports.len());
    Ok(())
}
