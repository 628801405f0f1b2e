//! Report generation for break-even analysis
//!
//! Reports combine the ledger, each program's analysis, an all-programs
//! scenario sweep and an all-programs projection, in Markdown or HTML, with
//! Mermaid charts for the revenue-vs-cost curves and the profit series.

pub mod formats;
pub mod view;
pub mod visualization;

use crate::core::analysis::AnalysisReport;
use crate::core::models::Ledger;
use crate::core::projection::LedgerProjection;
use crate::core::scenario::{ScenarioSweep, SimulationPoint};
use std::error::Error;
use std::path::Path;

pub use formats::{HtmlReporter, MarkdownReporter, ReportFormat};
pub use view::ReportView;
pub use visualization::MermaidGenerator;

/// Data context for report generation
///
/// Borrowed views over results already computed by the engine.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    /// Report title
    pub title: &'a str,
    /// Analyzed programs
    pub ledger: &'a Ledger,
    /// One completed analysis per ledger record
    pub analyses: &'a [AnalysisReport],
    /// Sweep used for the scenario section
    pub sweep: ScenarioSweep,
    /// All-programs scenario sweep
    pub simulation: &'a [SimulationPoint],
    /// All-programs projection
    pub projection: &'a LedgerProjection,
}

impl<'a> ReportContext<'a> {
    /// Create a new report context
    #[must_use]
    pub const fn new(
        title: &'a str,
        ledger: &'a Ledger,
        analyses: &'a [AnalysisReport],
        sweep: ScenarioSweep,
        simulation: &'a [SimulationPoint],
        projection: &'a LedgerProjection,
    ) -> Self {
        Self {
            title,
            ledger,
            analyses,
            sweep,
            simulation,
            projection,
        }
    }

    /// Sum of every program's revenue
    #[must_use]
    pub fn total_revenue(&self) -> f64 {
        self.ledger.iter().map(|r| r.revenue()).sum()
    }

    /// Sum of every program's cost
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.ledger.iter().map(|r| r.total_cost).sum()
    }

    /// Sum of every program's net profit
    #[must_use]
    pub fn total_profit(&self) -> f64 {
        self.ledger.iter().map(|r| r.net_profit()).sum()
    }

    /// Programs with zero or positive profit
    #[must_use]
    pub fn profitable_count(&self) -> usize {
        self.ledger.iter().filter(|r| r.is_profitable()).count()
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Generate a report to a file
    ///
    /// # Errors
    /// Returns an error if report generation or file writing fails
    fn generate(&self, ctx: &ReportContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }

    /// Generate report content as a string
    ///
    /// # Errors
    /// Returns an error if template rendering fails
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>>;
}

/// Format an amount as `$1,234.56` (negative as `-$1,234.56`)
#[must_use]
pub fn money(value: f64) -> String {
    let cents = format!("{:.2}", value.abs());
    let (whole, frac) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money() {
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(999.5), "$999.50");
        assert_eq!(money(1_000.0), "$1,000.00");
        assert_eq!(money(1_234_567.891), "$1,234,567.89");
        assert_eq!(money(-31_590.0), "-$31,590.00");
        assert_eq!(money(-0.001), "$0.00");
    }
}
