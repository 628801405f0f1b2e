//! Project command handler

use super::{export_stem, find_program, load_session, output_path, program_label};
use crate::args::{ProjectionArgs, RepairArgs};
use breakeven_analytics::config::Config;
use breakeven_analytics::core::export::{export_csv, ledger_projection_table, projection_table, Table};
use breakeven_analytics::core::projection::{project, ProjectionPoint};
use breakeven_analytics::{error, info};
use std::path::{Path, PathBuf};

/// Options for one project run
pub struct ProjectOptions<'a> {
    /// Programs CSV files
    pub input_files: &'a [PathBuf],
    /// Program name; every program when `None`
    pub program: Option<&'a str>,
    /// Horizon, growth and inflation
    pub projection: ProjectionArgs,
    /// Repairs applied while analyzing the inputs
    pub repair: RepairArgs,
    /// Explicit output path
    pub output: Option<&'a Path>,
    /// Write to the exports directory when no output path is given
    pub export: bool,
}

/// Run the project command.
pub fn run(options: &ProjectOptions, config: &Config) {
    if let Err(err) = project_programs(options, config) {
        error!("Projection failed: {err}");
        eprintln!("{err}");
    }
}

fn project_programs(options: &ProjectOptions, config: &Config) -> Result<(), String> {
    let params = options
        .projection
        .params(config)
        .map_err(|e| format!("✗ Invalid projection settings: {e}"))?;
    let (mut session, _) = load_session(options.input_files, options.repair.directives())?;

    let table: Table = if let Some(name) = options.program {
        let record = find_program(&session, name)?;
        let projection = project(&record.projection_baseline(), &params)
            .map_err(|e| format!("✗ Projection failed: {e}"))?;
        print_points(&projection.points);
        let summary = projection.summary();
        println!(
            "\nStudents:          {} -> {}\nProfitable months: {} of {}\nTotal profit:      {:.2}",
            summary.starting_enrollment,
            summary.final_enrollment,
            summary.profitable_months,
            summary.horizon.months(),
            summary.total_profit
        );
        projection_table(&projection)
    } else {
        let projection = session
            .projection(params)
            .map_err(|e| format!("✗ Projection failed: {e}"))?;
        print_points(&projection.points);
        println!(
            "\nFinal total students: {}\nProfitable months:    {} of {}\nTotal profit:         {:.2}",
            projection.final_total_students(),
            projection.profitable_months,
            params.horizon.months(),
            projection.total_profit
        );
        ledger_projection_table(projection)
    };
    info!(
        "Projected {} over {}",
        program_label(options.program),
        params.horizon
    );

    if options.output.is_some() || options.export {
        let path = output_path(
            options.output,
            &config.paths.exports_dir,
            &format!("projection_{}.csv", export_stem(options.program)),
        );
        export_csv(&table, &path)
            .map_err(|e| format!("✗ Failed to export {}: {e}", path.display()))?;
        println!("✓ Exported: {}", path.display());
    }
    Ok(())
}

fn print_points(points: &[ProjectionPoint]) {
    println!(
        "\n{:<24} {:>5} {:>10} {:>14} {:>14} {:>14}",
        "Program", "Month", "Students", "Revenue", "Total Cost", "Net Profit"
    );
    for point in points {
        println!(
            "{:<24} {:>5} {:>10.2} {:>14.2} {:>14.2} {:>14.2}",
            point.program.as_deref().unwrap_or("-"),
            point.month,
            point.enrollment,
            point.revenue,
            point.total_cost,
            point.profit
        );
    }
}
