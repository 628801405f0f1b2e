//! Command-line interface entry point for `breakeven`

mod args;
mod commands;

use args::{Cli, Command};
use breakeven_analytics::config::Config;
use breakeven_analytics::info;
use breakeven_analytics::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use clap::Parser;
use std::path::PathBuf;

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path = (!config.logging.file.is_empty()).then(|| PathBuf::from(&config.logging.file));

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Analyze {
            input_files,
            program,
            repair,
            export,
        } => {
            commands::analyze::run(&input_files, &program, repair, export, &config);
        }
        Command::Simulate {
            input_files,
            program,
            scenario,
            repair,
            output,
            export,
        } => {
            let options = commands::simulate::SimulateOptions {
                input_files: &input_files,
                program: program.as_deref(),
                scenario,
                repair,
                output: output.as_deref(),
                export,
            };
            commands::simulate::run(&options, &config);
        }
        Command::Project {
            input_files,
            program,
            projection,
            repair,
            output,
            export,
        } => {
            let options = commands::project::ProjectOptions {
                input_files: &input_files,
                program: program.as_deref(),
                projection,
                repair,
                output: output.as_deref(),
                export,
            };
            commands::project::run(&options, &config);
        }
        Command::Report {
            input_files,
            output,
            format,
            title,
            scenario,
            projection,
            repair,
        } => {
            let options = commands::report::ReportOptions {
                input_files: &input_files,
                output: output.as_deref(),
                format: &format,
                title: title.as_deref(),
                scenario,
                projection,
                repair,
            };
            commands::report::run(&options, &config);
        }
    }
}
