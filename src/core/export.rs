//! Export analysis results as tables
//!
//! Every table has an optional summary section of `Key,Value` lines, a blank
//! line, then a header row and data rows.

use crate::core::analysis::AnalysisReport;
use crate::core::models::Ledger;
use crate::core::projection::{LedgerProjection, Projection, ProjectionPoint};
use crate::core::scenario::{Profitability, ScenarioSweep, SimulationPoint};
use std::borrow::Cow;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// A summary section plus a data table, ready to serialize
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    /// Key/value pairs written before the data
    pub summary: Vec<(String, String)>,
    /// Column names
    pub headers: Vec<String>,
    /// Data rows, one cell per header
    pub rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        Self {
            summary: Vec::new(),
            headers: headers.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    fn with_summary(mut self, summary: Vec<(String, String)>) -> Self {
        self.summary = summary;
        self
    }
}

/// Trait for writing tables in a file format
pub trait TableExporter {
    /// Write `table` to `output_path`, creating parent directories as needed
    ///
    /// # Errors
    /// Returns an error if the file cannot be created or written
    fn export(&self, table: &Table, output_path: &Path) -> Result<(), Box<dyn Error>>;
}

/// CSV exporter
pub struct CsvExporter;

impl TableExporter for CsvExporter {
    fn export(&self, table: &Table, output_path: &Path) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = BufWriter::new(File::create(output_path)?);
        write_csv(&mut file, table)?;
        file.flush()?;
        crate::debug!(
            "Exported {} rows to {}",
            table.rows.len(),
            output_path.display()
        );
        Ok(())
    }
}

/// Export a table as CSV using the default exporter
///
/// # Errors
/// Returns an error if file writing fails
pub fn export_csv<P: AsRef<Path>>(table: &Table, output_path: P) -> Result<(), Box<dyn Error>> {
    CsvExporter.export(table, output_path.as_ref())
}

/// Serialize a table as CSV
///
/// # Errors
/// Returns any error from the underlying writer
pub fn write_csv<W: Write>(out: &mut W, table: &Table) -> io::Result<()> {
    if !table.summary.is_empty() {
        for (key, value) in &table.summary {
            writeln!(out, "{},{}", escape_field(key), escape_field(value))?;
        }
        writeln!(out)?;
    }
    write_row(out, table.headers.iter())?;
    for row in &table.rows {
        write_row(out, row.iter())?;
    }
    Ok(())
}

fn write_row<'a, W: Write>(out: &mut W, cells: impl Iterator<Item = &'a String>) -> io::Result<()> {
    let line = cells.map(|c| escape_field(c)).collect::<Vec<_>>().join(",");
    writeln!(out, "{line}")
}

/// Quote fields containing commas, quotes or line breaks
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn amount(value: f64) -> String {
    format!("{value:.2}")
}

/// Ledger of analyzed programs, with portfolio totals as summary
#[must_use]
pub fn ledger_table(ledger: &Ledger) -> Table {
    let mut table = Table::new(&[
        "Program",
        "Students",
        "Tuition",
        "Fixed Cost",
        "Variable Cost",
        "Break-even Students",
        "Total Revenue",
        "Total Cost",
        "Net Profit",
        "Profitability",
    ]);

    for record in ledger {
        table.rows.push(vec![
            record.name.clone(),
            record.enrolled.to_string(),
            amount(record.tuition),
            amount(record.fixed_cost),
            amount(record.variable_cost),
            record.break_even.to_string(),
            amount(record.revenue()),
            amount(record.total_cost),
            amount(record.net_profit()),
            Profitability::from_profit(record.net_profit()).to_string(),
        ]);
    }

    let total_profit: f64 = ledger.iter().map(|r| r.net_profit()).sum();
    let profitable = ledger.iter().filter(|r| r.is_profitable()).count();
    table.with_summary(vec![
        ("Programs".into(), ledger.len().to_string()),
        ("Profitable programs".into(), profitable.to_string()),
        ("Total net profit".into(), amount(total_profit)),
    ])
}

/// Revenue-vs-cost curve of one analysis, with its summary figures
#[must_use]
pub fn analysis_table(report: &AnalysisReport) -> Table {
    let mut table = Table::new(&["Students", "Revenue", "Cost"]);
    for point in &report.curve {
        table.rows.push(vec![
            point.students.to_string(),
            amount(point.revenue),
            amount(point.cost),
        ]);
    }
    table.with_summary(report.summary())
}

/// Scenario sweep rows; the program column is filled for aggregate sweeps
#[must_use]
pub fn simulation_table(points: &[SimulationPoint], sweep: &ScenarioSweep) -> Table {
    let mut table = Table::new(&[
        "Program",
        "Change %",
        "Students",
        "Revenue",
        "Cost",
        "Net Profit",
        "Profitability",
    ]);
    for point in points {
        table.rows.push(vec![
            point.program.clone().unwrap_or_default(),
            point.delta_pct.to_string(),
            point.enrollment.to_string(),
            amount(point.revenue),
            amount(point.cost),
            amount(point.profit),
            point.profitability.to_string(),
        ]);
    }
    let profitable = points
        .iter()
        .filter(|p| p.profitability == Profitability::Profitable)
        .count();
    table.with_summary(vec![
        ("Range %".into(), sweep.range_pct().to_string()),
        ("Step %".into(), sweep.step_pct().to_string()),
        ("Scenarios".into(), points.len().to_string()),
        ("Profitable scenarios".into(), profitable.to_string()),
    ])
}

fn projection_headers() -> Table {
    Table::new(&[
        "Program",
        "Month",
        "Students",
        "Revenue",
        "Fixed Cost",
        "Variable Cost",
        "Total Cost",
        "Net Profit",
    ])
}

fn projection_rows<'a>(table: &mut Table, points: impl Iterator<Item = &'a ProjectionPoint>) {
    for point in points {
        table.rows.push(vec![
            point.program.clone().unwrap_or_default(),
            point.month.to_string(),
            format!("{:.2}", point.enrollment),
            amount(point.revenue),
            amount(point.fixed_cost),
            amount(point.variable_cost_total),
            amount(point.total_cost),
            amount(point.profit),
        ]);
    }
}

/// Single-program projection with its summary
#[must_use]
pub fn projection_table(projection: &Projection) -> Table {
    let mut table = projection_headers();
    projection_rows(&mut table, projection.points.iter());
    let summary = projection.summary();
    table.with_summary(vec![
        ("Horizon".into(), summary.horizon.to_string()),
        ("Growth %".into(), projection.params.growth_pct.to_string()),
        ("Inflation %".into(), projection.params.inflation_pct.to_string()),
        ("Starting students".into(), summary.starting_enrollment.to_string()),
        ("Final students".into(), summary.final_enrollment.to_string()),
        (
            "Profitable months".into(),
            format!("{} of {}", summary.profitable_months, summary.horizon.months()),
        ),
        ("Total profit".into(), amount(summary.total_profit)),
    ])
}

/// All-programs projection with aggregate summary
#[must_use]
pub fn ledger_projection_table(projection: &LedgerProjection) -> Table {
    let mut table = projection_headers();
    projection_rows(&mut table, projection.points.iter());
    let horizon = projection.params.horizon;
    table.with_summary(vec![
        ("Horizon".into(), horizon.to_string()),
        ("Growth %".into(), projection.params.growth_pct.to_string()),
        ("Inflation %".into(), projection.params.inflation_pct.to_string()),
        (
            "Final total students".into(),
            projection.final_total_students().to_string(),
        ),
        (
            "Profitable months".into(),
            format!("{} of {}", projection.profitable_months, horizon.months()),
        ),
        ("Total profit".into(), amount(projection.total_profit)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProgramRecord;
    use crate::core::scenario::simulate_ledger;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.append(ProgramRecord::new("Law", 100, 1_000.0, 20_000.0, 20_000.0, 25));
        ledger.append(ProgramRecord::new("Arts, Evening", 10, 100.0, 5_000.0, 100.0, 56));
        ledger
    }

    fn render(table: &Table) -> String {
        let mut out = Vec::new();
        write_csv(&mut out, table).expect("write csv");
        String::from_utf8(out).expect("utf8")
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn ledger_csv_has_summary_then_table() {
        let csv = render(&ledger_table(&ledger()));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Programs,2");
        assert_eq!(lines[1], "Profitable programs,1");
        assert_eq!(lines[3], "");
        assert!(lines[4].starts_with("Program,Students,Tuition"));
        assert!(lines[5].starts_with("Law,100,1000.00"));
        assert!(lines[6].starts_with("\"Arts, Evening\",10"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn table_without_summary_starts_with_header() {
        let table = Table::new(&["A", "B"]);
        assert_eq!(render(&table), "A,B\n");
    }

    #[test]
    fn simulation_csv_tags_programs() {
        let sweep = ScenarioSweep::with_range(10);
        let points = simulate_ledger(&ledger(), &sweep);
        let table = simulation_table(&points, &sweep);
        assert_eq!(table.rows.len(), 6);
        assert_eq!(table.rows[0][0], "Law");
        assert_eq!(table.rows[0][1], "-10");
        assert!(table.summary.contains(&("Scenarios".to_string(), "6".to_string())));
    }

    #[test]
    fn exports_to_nested_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("ledger.csv");
        export_csv(&ledger_table(&ledger()), &path).expect("export");
        let contents = fs::read_to_string(&path).expect("read file");
        assert!(contents.contains("Break-even Students"));
    }
}
