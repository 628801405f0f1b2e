//! Pre-formatted report data shared by the Markdown and HTML templates

use super::visualization::MermaidGenerator;
use super::{money, ReportContext};
use crate::core::analysis::AnalysisReport;
use crate::core::scenario::Profitability;

/// A labelled figure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    /// Row label
    pub label: String,
    /// Formatted value
    pub value: String,
}

impl SummaryRow {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One ledger record, formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRow {
    /// Program name
    pub name: String,
    /// Enrollment basis
    pub students: String,
    /// Tuition per student
    pub tuition: String,
    /// Fixed cost
    pub fixed_cost: String,
    /// Variable cost
    pub variable_cost: String,
    /// Break-even students
    pub break_even: String,
    /// Total revenue
    pub revenue: String,
    /// Total cost
    pub cost: String,
    /// Net profit
    pub profit: String,
    /// Profitability label
    pub profitability: String,
    /// Drives row styling
    pub profitable: bool,
}

/// One program's analysis section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisSection {
    /// Program name
    pub name: String,
    /// Headline figures
    pub summary: Vec<SummaryRow>,
    /// Advisories and repairs
    pub notes: Vec<String>,
    /// Whether any note exists
    pub has_notes: bool,
    /// Revenue-vs-cost chart
    pub chart: String,
    /// Whether a chart was rendered
    pub has_chart: bool,
}

/// One scenario point, formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationRow {
    /// Program name
    pub program: String,
    /// Enrollment change, e.g. `-10%`
    pub change: String,
    /// Simulated students
    pub students: String,
    /// Revenue
    pub revenue: String,
    /// Cost
    pub cost: String,
    /// Net profit
    pub profit: String,
    /// Profitability label
    pub profitability: String,
    /// Drives row styling
    pub profitable: bool,
}

/// One projected month, formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRow {
    /// Program name
    pub program: String,
    /// Month number
    pub month: String,
    /// Projected students
    pub students: String,
    /// Revenue
    pub revenue: String,
    /// Total cost
    pub total_cost: String,
    /// Net profit
    pub profit: String,
}

/// Everything a report template displays, already formatted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    /// Report title
    pub title: String,
    /// Portfolio totals
    pub portfolio: Vec<SummaryRow>,
    /// One row per ledger record
    pub ledger_rows: Vec<LedgerRow>,
    /// Whether the ledger has records
    pub has_programs: bool,
    /// Per-program analysis sections
    pub analyses: Vec<AnalysisSection>,
    /// Sweep description
    pub scenario_label: String,
    /// Aggregate sweep rows
    pub simulation_rows: Vec<SimulationRow>,
    /// Scenario profit chart
    pub scenario_chart: String,
    /// Whether the sweep produced rows
    pub has_simulation: bool,
    /// Projection description
    pub projection_label: String,
    /// Projection totals
    pub projection_summary: Vec<SummaryRow>,
    /// Aggregate projection rows
    pub projection_rows: Vec<ProjectionRow>,
    /// Projection profit chart
    pub projection_chart: String,
    /// Whether the projection produced rows
    pub has_projection: bool,
}

impl ReportView {
    /// Format every section of the context
    #[must_use]
    pub fn from_context(ctx: &ReportContext) -> Self {
        let ledger_rows: Vec<LedgerRow> = ctx
            .ledger
            .iter()
            .map(|record| {
                let profitability = Profitability::from_profit(record.net_profit());
                LedgerRow {
                    name: record.name.clone(),
                    students: record.enrolled.to_string(),
                    tuition: money(record.tuition),
                    fixed_cost: money(record.fixed_cost),
                    variable_cost: money(record.variable_cost),
                    break_even: record.break_even.to_string(),
                    revenue: money(record.revenue()),
                    cost: money(record.total_cost),
                    profit: money(record.net_profit()),
                    profitability: profitability.to_string(),
                    profitable: profitability == Profitability::Profitable,
                }
            })
            .collect();

        let portfolio = vec![
            SummaryRow::new("Programs", ctx.ledger.len().to_string()),
            SummaryRow::new("Profitable programs", ctx.profitable_count().to_string()),
            SummaryRow::new("Total revenue", money(ctx.total_revenue())),
            SummaryRow::new("Total cost", money(ctx.total_cost())),
            SummaryRow::new("Total net profit", money(ctx.total_profit())),
        ];

        let simulation_rows: Vec<SimulationRow> = ctx
            .simulation
            .iter()
            .map(|point| SimulationRow {
                program: point.program.clone().unwrap_or_default(),
                change: format!("{:+}%", point.delta_pct),
                students: point.enrollment.to_string(),
                revenue: money(point.revenue),
                cost: money(point.cost),
                profit: money(point.profit),
                profitability: point.profitability.to_string(),
                profitable: point.profitability == Profitability::Profitable,
            })
            .collect();

        let projection = ctx.projection;
        let horizon = projection.params.horizon;
        let projection_rows: Vec<ProjectionRow> = projection
            .points
            .iter()
            .map(|point| ProjectionRow {
                program: point.program.clone().unwrap_or_default(),
                month: point.month.to_string(),
                students: format!("{:.1}", point.enrollment),
                revenue: money(point.revenue),
                total_cost: money(point.total_cost),
                profit: money(point.profit),
            })
            .collect();

        Self {
            title: ctx.title.to_string(),
            portfolio,
            has_programs: !ledger_rows.is_empty(),
            ledger_rows,
            analyses: ctx.analyses.iter().map(analysis_section).collect(),
            scenario_label: format!(
                "Enrollment change from -{range}% to +{range}% in steps of {step}%",
                range = ctx.sweep.range_pct(),
                step = ctx.sweep.step_pct()
            ),
            scenario_chart: MermaidGenerator::scenario_profit_chart(ctx.simulation),
            has_simulation: !simulation_rows.is_empty(),
            simulation_rows,
            projection_label: format!(
                "{horizon} at {}% monthly growth and {}% monthly inflation",
                projection.params.growth_pct, projection.params.inflation_pct
            ),
            projection_summary: vec![
                SummaryRow::new(
                    "Final total students",
                    projection.final_total_students().to_string(),
                ),
                SummaryRow::new(
                    "Months with profit (any program)",
                    format!("{} of {}", projection.profitable_months, horizon.months()),
                ),
                SummaryRow::new("Total projected profit", money(projection.total_profit)),
            ],
            projection_chart: MermaidGenerator::projection_profit_chart(&projection.points),
            has_projection: !projection_rows.is_empty(),
            projection_rows,
        }
    }
}

fn analysis_section(report: &AnalysisReport) -> AnalysisSection {
    let solution = &report.solution;
    let summary = vec![
        SummaryRow::new("Pricing", report.request.pricing.to_string()),
        SummaryRow::new("Tuition", money(solution.tuition)),
        SummaryRow::new("Break-even", format!("{} students", solution.break_even)),
        SummaryRow::new("Current students", report.enrollment_basis().to_string()),
        SummaryRow::new("Total capacity", report.quote.total_capacity.to_string()),
        SummaryRow::new("Current revenue", money(report.current_revenue())),
        SummaryRow::new("Current cost", money(report.current_cost())),
        SummaryRow::new("Profitability", report.profitability().to_string()),
    ];

    let notes: Vec<String> = solution
        .advisories
        .iter()
        .map(ToString::to_string)
        .chain(solution.repairs.iter().map(ToString::to_string))
        .collect();

    let chart = MermaidGenerator::revenue_cost_chart(
        &format!("{}: revenue vs cost", report.request.name),
        &report.curve,
    );

    AnalysisSection {
        name: report.request.name.clone(),
        summary,
        has_notes: !notes.is_empty(),
        notes,
        has_chart: !chart.is_empty(),
        chart,
    }
}
