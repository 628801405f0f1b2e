//! CLI argument definitions for `breakeven`

use clap::{builder::BoolishValueParser, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use breakeven_analytics::config::{Config, ConfigOverrides};
use breakeven_analytics::core::breakeven::SolveDirectives;
use breakeven_analytics::core::projection::{Horizon, ProjectionParams};
use breakeven_analytics::core::scenario::ScenarioSweep;
use breakeven_analytics::core::BreakEvenError;
use breakeven_analytics::logger::Level;

/// CLI log level argument
///
/// Represents log levels that can be passed via CLI arguments. Converts to lowercase
/// strings for config storage and to `logger::Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `exports_dir`, `margin_pct`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE", allow_hyphen_values = true)]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

/// Repairs to apply without asking
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct RepairArgs {
    /// Raise tuition to variable cost per student + 1 when it does not cover it
    #[arg(long)]
    pub repair_margin: bool,

    /// Recalculate tuition so current enrollment reaches break-even
    #[arg(long)]
    pub recalculate: bool,
}

impl RepairArgs {
    pub const fn directives(self) -> SolveDirectives {
        SolveDirectives {
            repair_margin: self.repair_margin,
            recalculate_for_rentability: self.recalculate,
        }
    }
}

/// Scenario sweep settings; unset values come from the `[model]` config
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ScenarioArgs {
    /// Enrollment change range in percent (-100 to 300), swept from -RANGE to +RANGE
    #[arg(
        long,
        value_name = "PCT",
        allow_hyphen_values = true,
        value_parser = clap::value_parser!(i32).range(-100..=300)
    )]
    pub range: Option<i32>,

    /// Step between scenarios in percent
    #[arg(long, value_name = "PCT")]
    pub step: Option<u32>,
}

impl ScenarioArgs {
    /// Build the sweep, falling back to configured defaults
    pub fn sweep(self, config: &Config) -> Result<ScenarioSweep, BreakEvenError> {
        ScenarioSweep::new(
            self.range.unwrap_or(config.model.scenario_range),
            self.step.unwrap_or(config.model.scenario_step),
        )
    }
}

/// Projection settings; unset values come from the `[model]` config
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct ProjectionArgs {
    /// Projection horizon in months (6, 12 or 24)
    #[arg(long, value_name = "MONTHS")]
    pub horizon: Option<u32>,

    /// Monthly enrollment growth in percent
    #[arg(long, value_name = "PCT", allow_hyphen_values = true)]
    pub growth: Option<f64>,

    /// Monthly cost inflation in percent
    #[arg(long, value_name = "PCT", allow_hyphen_values = true)]
    pub inflation: Option<f64>,
}

impl ProjectionArgs {
    /// Build projection parameters, falling back to configured defaults
    pub fn params(self, config: &Config) -> Result<ProjectionParams, BreakEvenError> {
        Ok(ProjectionParams {
            horizon: Horizon::try_from(self.horizon.unwrap_or(config.model.horizon_months))?,
            growth_pct: self.growth.unwrap_or(config.model.growth_pct),
            inflation_pct: self.inflation.unwrap_or(config.model.inflation_pct),
        })
    }
}

/// Single-program inputs for `analyze`
#[derive(Debug, Clone, Default, Args)]
pub struct ProgramArgs {
    /// Program name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Number of classrooms
    #[arg(long, value_name = "N")]
    pub rooms: Option<u32>,

    /// Seats per classroom
    #[arg(long, value_name = "N")]
    pub room_capacity: Option<u32>,

    /// Students currently enrolled
    #[arg(long, value_name = "N")]
    pub students: Option<u64>,

    /// Total fixed cost
    #[arg(long, value_name = "AMOUNT")]
    pub fixed_cost: Option<f64>,

    /// Total variable cost
    #[arg(long, value_name = "AMOUNT")]
    pub variable_cost: Option<f64>,

    /// Derive tuition from costs with this target margin in percent
    #[arg(long, value_name = "PCT", conflicts_with = "tuition")]
    pub margin: Option<f64>,

    /// Use this tuition per student instead of deriving it
    #[arg(long, value_name = "PRICE")]
    pub tuition: Option<f64>,
}

impl ProgramArgs {
    /// Whether any single-program flag was given
    pub const fn is_present(&self) -> bool {
        self.name.is_some()
            || self.rooms.is_some()
            || self.room_capacity.is_some()
            || self.students.is_some()
            || self.fixed_cost.is_some()
            || self.variable_cost.is_some()
            || self.margin.is_some()
            || self.tuition.is_some()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// Compute break-even enrollment.
    ///
    /// Analyze one program from flags, or every program in one or more
    /// programs CSV files.
    Analyze {
        /// Paths to programs CSV files (supports multiple)
        #[arg(value_name = "FILES", num_args = 0.., conflicts_with_all = ["name", "rooms", "room_capacity"])]
        input_files: Vec<PathBuf>,

        #[command(flatten)]
        program: ProgramArgs,

        #[command(flatten)]
        repair: RepairArgs,

        /// Write the analysis and ledger CSV files to the exports directory
        #[arg(long)]
        export: bool,
    },
    /// Simulate enrollment changes around each program's enrollment.
    Simulate {
        /// Paths to programs CSV files (supports multiple)
        #[arg(value_name = "FILES", num_args = 1.., required = true)]
        input_files: Vec<PathBuf>,

        /// Program to simulate; every program when omitted
        #[arg(short, long, value_name = "NAME")]
        program: Option<String>,

        #[command(flatten)]
        scenario: ScenarioArgs,

        #[command(flatten)]
        repair: RepairArgs,

        /// Write the simulation CSV to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the simulation CSV to the exports directory
        #[arg(long)]
        export: bool,
    },
    /// Project monthly profitability with compounding growth and inflation.
    Project {
        /// Paths to programs CSV files (supports multiple)
        #[arg(value_name = "FILES", num_args = 1.., required = true)]
        input_files: Vec<PathBuf>,

        /// Program to project; every program when omitted
        #[arg(short, long, value_name = "NAME")]
        program: Option<String>,

        #[command(flatten)]
        projection: ProjectionArgs,

        #[command(flatten)]
        repair: RepairArgs,

        /// Write the projection CSV to this path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Write the projection CSV to the exports directory
        #[arg(long)]
        export: bool,
    },
    /// Generate a full report from programs CSV files.
    ///
    /// Includes the ledger, each program's analysis, an all-programs scenario
    /// sweep and an all-programs projection, with Mermaid charts.
    Report {
        /// Paths to programs CSV files (supports multiple)
        #[arg(value_name = "FILES", num_args = 1.., required = true)]
        input_files: Vec<PathBuf>,

        /// Output file path (optional; defaults to the reports directory)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Report format: markdown (md) or html
        #[arg(short, long, value_name = "FORMAT", default_value = "html")]
        format: String,

        /// Report title
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,

        #[command(flatten)]
        scenario: ScenarioArgs,

        #[command(flatten)]
        projection: ProjectionArgs,

        #[command(flatten)]
        repair: RepairArgs,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "breakeven",
    about = "Break-even analysis for academic programs",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Override config exports directory
    #[arg(long = "config-exports-dir", value_name = "DIR")]
    pub config_exports_dir: Option<PathBuf>,

    /// Override config exports directory (short form)
    #[arg(long = "exports-dir", value_name = "DIR")]
    pub exports_dir: Option<PathBuf>,

    /// Override config reports directory
    #[arg(long = "config-reports-dir", value_name = "DIR")]
    pub config_reports_dir: Option<PathBuf>,

    /// Override config reports directory (short form)
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// Short-form flags (e.g., `--exports-dir`) take precedence over long-form
    /// flags (e.g., `--config-exports-dir`) when both are provided. `None`
    /// means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        let path_string = |p: &PathBuf| p.to_string_lossy().to_string();
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self.config_log_file.as_ref().map(path_string),
            verbose: self.config_verbose,
            exports_dir: self
                .exports_dir
                .as_ref()
                .or(self.config_exports_dir.as_ref())
                .map(path_string),
            reports_dir: self
                .reports_dir
                .as_ref()
                .or(self.config_reports_dir.as_ref())
                .map(path_string),
        }
    }
}
