//! Simulate command handler

use super::{export_stem, find_program, load_session, output_path, program_label};
use crate::args::{RepairArgs, ScenarioArgs};
use breakeven_analytics::config::Config;
use breakeven_analytics::core::export::{export_csv, simulation_table};
use breakeven_analytics::core::scenario::{simulate, ScenarioSweep, SimulationPoint};
use breakeven_analytics::{error, info};
use std::path::{Path, PathBuf};

/// Options for one simulate run
pub struct SimulateOptions<'a> {
    /// Programs CSV files
    pub input_files: &'a [PathBuf],
    /// Program name; every program when `None`
    pub program: Option<&'a str>,
    /// Sweep settings
    pub scenario: ScenarioArgs,
    /// Repairs applied while analyzing the inputs
    pub repair: RepairArgs,
    /// Explicit output path
    pub output: Option<&'a Path>,
    /// Write to the exports directory when no output path is given
    pub export: bool,
}

/// Run the simulate command.
pub fn run(options: &SimulateOptions, config: &Config) {
    if let Err(err) = simulate_programs(options, config) {
        error!("Simulation failed: {err}");
        eprintln!("{err}");
    }
}

fn simulate_programs(options: &SimulateOptions, config: &Config) -> Result<(), String> {
    let sweep = options
        .scenario
        .sweep(config)
        .map_err(|e| format!("✗ Invalid scenario settings: {e}"))?;
    let (mut session, _) = load_session(options.input_files, options.repair.directives())?;

    let points: Vec<SimulationPoint> = match options.program {
        None => session.simulation(sweep).to_vec(),
        Some(name) => {
            let record = find_program(&session, name)?;
            simulate(&record.simulation_baseline(), &sweep)
        }
    };
    info!(
        "Simulated {} scenario(s) for {}",
        points.len(),
        program_label(options.program)
    );

    print_points(&points, &sweep);

    if options.output.is_some() || options.export {
        let path = output_path(
            options.output,
            &config.paths.exports_dir,
            &format!("simulation_{}.csv", export_stem(options.program)),
        );
        export_csv(&simulation_table(&points, &sweep), &path)
            .map_err(|e| format!("✗ Failed to export {}: {e}", path.display()))?;
        println!("✓ Exported: {}", path.display());
    }
    Ok(())
}

fn print_points(points: &[SimulationPoint], sweep: &ScenarioSweep) {
    println!(
        "\n=== Scenarios: ±{}% in {}% steps ===\n",
        sweep.range_pct(),
        sweep.step_pct()
    );
    if points.is_empty() {
        println!("No scenarios in range");
        return;
    }
    println!(
        "{:<24} {:>8} {:>9} {:>14} {:>14} {:>14}  Status",
        "Program", "Change", "Students", "Revenue", "Cost", "Net Profit"
    );
    for point in points {
        println!(
            "{:<24} {:>7}% {:>9} {:>14.2} {:>14.2} {:>14.2}  {}",
            point.program.as_deref().unwrap_or("-"),
            point.delta_pct,
            point.enrollment,
            point.revenue,
            point.cost,
            point.profit,
            point.profitability
        );
    }
}
