//! Configuration module for `breakeven-analytics`

use crate::core::projection::Horizon;
use crate::core::scenario::RANGE_LIMITS_PCT;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// Default CLI configuration loaded based on build profile.
/// Uses release defaults in release mode, debug defaults in debug mode.
#[cfg(not(debug_assertions))]
const CONFIG_DEFAULTS: &str = include_str!("../../../assets/DefaultCLIConfigRelease.toml");

#[cfg(debug_assertions)]
const CONFIG_DEFAULTS: &str = include_str!("../../../assets/DefaultCLIConfigDebug.toml");

#[cfg(not(debug_assertions))]
const CONFIG_FILE_NAME: &str = "config.toml";

#[cfg(debug_assertions)]
const CONFIG_FILE_NAME: &str = "dconfig.toml";

/// Placeholder expanded to the configuration directory in path values.
const DIR_VARIABLE: &str = "$BREAKEVEN";

/// Every key understood by [`Config::get`], [`Config::set`] and [`Config::unset`].
pub const CONFIG_KEYS: [&str; 11] = [
    "level",
    "file",
    "verbose",
    "exports_dir",
    "reports_dir",
    "margin_pct",
    "scenario_range",
    "scenario_step",
    "horizon_months",
    "growth_pct",
    "inflation_pct",
];

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug)
    #[serde(default)]
    pub level: String,
    /// Log file path
    #[serde(default)]
    pub file: String,
    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,
}

/// Paths configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory for CSV exports (ledger, analyses, simulations, projections)
    #[serde(default)]
    pub exports_dir: String,
    /// Directory for report output files
    #[serde(default)]
    pub reports_dir: String,
}

/// Default model parameters used when the CLI does not receive them explicitly
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Target margin (%) for margin-up pricing
    pub margin_pct: f64,
    /// Scenario sweep range (±%)
    pub scenario_range: i32,
    /// Scenario sweep step (%)
    pub scenario_step: u32,
    /// Projection horizon in months (6, 12 or 24)
    pub horizon_months: u32,
    /// Monthly enrollment growth (%)
    pub growth_pct: f64,
    /// Monthly cost inflation (%)
    pub inflation_pct: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            margin_pct: 30.0,
            scenario_range: 100,
            scenario_step: 10,
            horizon_months: 12,
            growth_pct: 0.0,
            inflation_pct: 2.0,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Path settings
    #[serde(default)]
    pub paths: PathsConfig,
    /// Model defaults
    #[serde(default)]
    pub model: ModelConfig,
}

/// Optional CLI overrides for configuration values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override logging level
    pub level: Option<String>,
    /// Override log file path
    pub file: Option<String>,
    /// Override verbose flag
    pub verbose: Option<bool>,
    /// Override exports output directory
    pub exports_dir: Option<String>,
    /// Override reports output directory
    pub reports_dir: Option<String>,
}

impl Config {
    /// Get the `$BREAKEVEN` directory path
    ///
    /// Returns:
    /// - Linux: `~/.config/breakeven`
    /// - macOS: `~/Library/Application Support/breakeven`
    /// - Windows: `%APPDATA%\breakeven`
    #[must_use]
    pub fn get_breakeven_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("breakeven")
    }

    /// Merge missing fields from defaults into this config
    ///
    /// Only string fields that are empty in the current config and non-empty in
    /// the defaults are filled in. Model values always deserialize with their
    /// defaults, so they never need merging.
    ///
    /// # Returns
    ///
    /// `true` if any fields were added/changed, `false` otherwise
    #[allow(clippy::useless_let_if_seq)]
    pub fn merge_defaults(&mut self, defaults: &Self) -> bool {
        let mut changed = false;

        if self.logging.level.is_empty() && !defaults.logging.level.is_empty() {
            self.logging.level.clone_from(&defaults.logging.level);
            changed = true;
        }
        if self.logging.file.is_empty() && !defaults.logging.file.is_empty() {
            self.logging.file.clone_from(&defaults.logging.file);
            changed = true;
        }

        if self.paths.exports_dir.is_empty() && !defaults.paths.exports_dir.is_empty() {
            self.paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir);
            changed = true;
        }
        if self.paths.reports_dir.is_empty() && !defaults.paths.reports_dir.is_empty() {
            self.paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir);
            changed = true;
        }

        changed
    }

    /// Apply CLI-provided overrides onto the loaded configuration
    ///
    /// Overrides only affect this run; the configuration file is not touched.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(level) = &overrides.level {
            self.logging.level.clone_from(level);
        }
        if let Some(file) = &overrides.file {
            self.logging.file.clone_from(file);
        }
        if let Some(verbose) = overrides.verbose {
            self.logging.verbose = verbose;
        }

        if let Some(exports_dir) = &overrides.exports_dir {
            self.paths.exports_dir.clone_from(exports_dir);
        }
        if let Some(reports_dir) = &overrides.reports_dir {
            self.paths.reports_dir.clone_from(reports_dir);
        }
    }

    /// Get the user config file path
    ///
    /// `config.toml` for release builds, `dconfig.toml` for debug builds, inside
    /// the directory returned by [`get_breakeven_dir`](Self::get_breakeven_dir).
    #[must_use]
    pub fn get_config_file_path() -> PathBuf {
        Self::get_breakeven_dir().join(CONFIG_FILE_NAME)
    }

    /// Expand `$BREAKEVEN` in a string to the configuration directory
    #[must_use]
    fn expand_variables(value: &str) -> String {
        if value.contains(DIR_VARIABLE) {
            let dir = Self::get_breakeven_dir();
            value.replace(DIR_VARIABLE, dir.to_str().unwrap_or("."))
        } else {
            value.to_string()
        }
    }

    /// Initialize config from a TOML string
    ///
    /// Missing fields take their serde defaults and `$BREAKEVEN` is expanded in
    /// path values.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML cannot be parsed or doesn't match the expected schema
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let mut config: Self = toml::from_str(toml_str)?;

        config.logging.file = Self::expand_variables(&config.logging.file);
        config.paths.exports_dir = Self::expand_variables(&config.paths.exports_dir);
        config.paths.reports_dir = Self::expand_variables(&config.paths.reports_dir);

        Ok(config)
    }

    /// Load configuration from the embedded defaults
    ///
    /// # Panics
    /// Panics if the embedded default configuration is invalid TOML. The defaults
    /// are compiled into the binary and covered by tests.
    #[must_use]
    pub fn from_defaults() -> Self {
        Self::from_toml(CONFIG_DEFAULTS).expect("Failed to parse compiled-in default configuration")
    }

    /// Load configuration from file, or create it from defaults if not found
    ///
    /// - Existing file: loaded, missing fields merged from defaults, saved back if changed
    /// - First run: the defaults are written to the config file
    ///
    /// Falls back to defaults if the file cannot be read or parsed.
    #[must_use]
    pub fn load() -> Self {
        let config_file = Self::get_config_file_path();
        let defaults = Self::from_defaults();

        if !config_file.exists() {
            let _ = defaults.save();
            return defaults;
        }

        match fs::read_to_string(&config_file)
            .map_err(|e| e.to_string())
            .and_then(|content| Self::from_toml(&content).map_err(|e| e.to_string()))
        {
            Ok(mut config) => {
                if config.merge_defaults(&defaults) {
                    let _ = config.save();
                }
                config
            }
            Err(e) => {
                crate::warn!(
                    "Ignoring unreadable config {}: {e}",
                    config_file.display()
                );
                defaults
            }
        }
    }

    /// Save configuration to the user config file
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the config cannot be
    /// serialized, or the file cannot be written.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let config_file = Self::get_config_file_path();
        if let Some(parent) = config_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&config_file, toml_str)?;
        Ok(())
    }

    /// Get a configuration value by key (see [`CONFIG_KEYS`])
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "level" => Some(self.logging.level.clone()),
            "file" => Some(self.logging.file.clone()),
            "verbose" => Some(self.logging.verbose.to_string()),
            "exports_dir" | "exports-dir" => Some(self.paths.exports_dir.clone()),
            "reports_dir" | "reports-dir" => Some(self.paths.reports_dir.clone()),
            "margin_pct" => Some(self.model.margin_pct.to_string()),
            "scenario_range" => Some(self.model.scenario_range.to_string()),
            "scenario_step" => Some(self.model.scenario_step.to_string()),
            "horizon_months" => Some(self.model.horizon_months.to_string()),
            "growth_pct" => Some(self.model.growth_pct.to_string()),
            "inflation_pct" => Some(self.model.inflation_pct.to_string()),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// Model values are validated with the same rules the engine applies:
    /// margin must be in `[0, 100)`, the scenario range within `-100..=300`, the
    /// scenario step positive, and the horizon
    /// one of 6, 12 or 24 months.
    ///
    /// Call [`save()`](Config::save) to persist the change.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value is invalid
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "level" => {
                let level: crate::logger::Level = value.parse()?;
                self.logging.level = level.as_str().to_string();
            }
            "file" => self.logging.file = value.to_string(),
            "verbose" => {
                self.logging.verbose = value
                    .parse::<bool>()
                    .map_err(|_| format!("Invalid boolean value for 'verbose': '{value}'"))?;
            }
            "exports_dir" | "exports-dir" => self.paths.exports_dir = value.to_string(),
            "reports_dir" | "reports-dir" => self.paths.reports_dir = value.to_string(),
            "margin_pct" => {
                let margin = parse_number::<f64>(key, value)?;
                if !(0.0..100.0).contains(&margin) {
                    return Err(format!("'margin_pct' must be in [0, 100): '{value}'"));
                }
                self.model.margin_pct = margin;
            }
            "scenario_range" => {
                let range = parse_number::<i32>(key, value)?;
                if !RANGE_LIMITS_PCT.contains(&range) {
                    return Err(format!(
                        "'scenario_range' must be within {}..={}: '{value}'",
                        RANGE_LIMITS_PCT.start(),
                        RANGE_LIMITS_PCT.end()
                    ));
                }
                self.model.scenario_range = range;
            }
            "scenario_step" => {
                let step = parse_number::<u32>(key, value)?;
                if step == 0 {
                    return Err("'scenario_step' must be greater than zero".to_string());
                }
                self.model.scenario_step = step;
            }
            "horizon_months" => {
                let months = parse_number::<u32>(key, value)?;
                Horizon::try_from(months).map_err(|e| e.to_string())?;
                self.model.horizon_months = months;
            }
            "growth_pct" => self.model.growth_pct = parse_number(key, value)?,
            "inflation_pct" => self.model.inflation_pct = parse_number(key, value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Unset a configuration value by key (reset to default)
    ///
    /// # Errors
    /// Returns an error if the key is not recognized.
    pub fn unset(&mut self, key: &str, defaults: &Self) -> Result<(), String> {
        match key {
            "level" => self.logging.level.clone_from(&defaults.logging.level),
            "file" => self.logging.file.clone_from(&defaults.logging.file),
            "verbose" => self.logging.verbose = defaults.logging.verbose,
            "exports_dir" | "exports-dir" => self
                .paths
                .exports_dir
                .clone_from(&defaults.paths.exports_dir),
            "reports_dir" | "reports-dir" => self
                .paths
                .reports_dir
                .clone_from(&defaults.paths.reports_dir),
            "margin_pct" => self.model.margin_pct = defaults.model.margin_pct,
            "scenario_range" => self.model.scenario_range = defaults.model.scenario_range,
            "scenario_step" => self.model.scenario_step = defaults.model.scenario_step,
            "horizon_months" => self.model.horizon_months = defaults.model.horizon_months,
            "growth_pct" => self.model.growth_pct = defaults.model.growth_pct,
            "inflation_pct" => self.model.inflation_pct = defaults.model.inflation_pct,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }

    /// Reset all configuration to defaults by deleting the config file
    ///
    /// The CLI asks for confirmation before calling this.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be deleted.
    pub fn reset() -> Result<(), std::io::Error> {
        let config_file = Self::get_config_file_path();
        if config_file.exists() {
            fs::remove_file(config_file)?;
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| format!("Invalid numeric value for '{key}': '{value}'"))
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[logging]")?;
        writeln!(f, "  level = \"{}\"", self.logging.level)?;
        writeln!(f, "  file = \"{}\"", self.logging.file)?;
        writeln!(f, "  verbose = {}", self.logging.verbose)?;

        writeln!(f, "\n[paths]")?;
        writeln!(f, "  exports_dir = \"{}\"", self.paths.exports_dir)?;
        writeln!(f, "  reports_dir = \"{}\"", self.paths.reports_dir)?;

        writeln!(f, "\n[model]")?;
        writeln!(f, "  margin_pct = {}", self.model.margin_pct)?;
        writeln!(f, "  scenario_range = {}", self.model.scenario_range)?;
        writeln!(f, "  scenario_step = {}", self.model.scenario_step)?;
        writeln!(f, "  horizon_months = {}", self.model.horizon_months)?;
        writeln!(f, "  growth_pct = {}", self.model.growth_pct)?;
        writeln!(f, "  inflation_pct = {}", self.model.inflation_pct)?;

        Ok(())
    }
}
