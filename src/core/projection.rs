//! Compounding month-by-month profitability projection
//!
//! Each month depends on the previous one: enrollment grows by the monthly
//! growth rate while fixed cost and variable cost per student inflate by the
//! monthly inflation rate. Enrollment stays continuous across months and is
//! only truncated to whole students in summaries.

use crate::core::error::{ensure_amount, ensure_rate, BreakEvenError, Result};
use crate::core::models::Ledger;
use std::collections::BTreeSet;
use std::fmt;

/// Supported projection horizons
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Horizon {
    /// 6 months
    SixMonths,
    /// 12 months
    TwelveMonths,
    /// 24 months
    TwentyFourMonths,
}

impl Horizon {
    /// Every supported horizon, shortest first
    pub const ALL: [Self; 3] = [Self::SixMonths, Self::TwelveMonths, Self::TwentyFourMonths];

    /// Length in months
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::SixMonths => 6,
            Self::TwelveMonths => 12,
            Self::TwentyFourMonths => 24,
        }
    }
}

impl TryFrom<u32> for Horizon {
    type Error = BreakEvenError;

    fn try_from(months: u32) -> Result<Self> {
        match months {
            6 => Ok(Self::SixMonths),
            12 => Ok(Self::TwelveMonths),
            24 => Ok(Self::TwentyFourMonths),
            other => Err(BreakEvenError::degenerate(format!(
                "horizon must be 6, 12 or 24 months (got {other})"
            ))),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} months", self.months())
    }
}

/// User-supplied projection assumptions, applied uniformly to every program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionParams {
    /// Months to project
    pub horizon: Horizon,
    /// Monthly enrollment growth, percent
    pub growth_pct: f64,
    /// Monthly cost inflation, percent
    pub inflation_pct: f64,
}

/// Starting point of a projection, taken from a program's last analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionBaseline {
    /// Enrollment at the last analysis
    pub enrollment: u64,
    /// Tuition per student
    pub tuition: f64,
    /// Total fixed cost in month 1
    pub fixed_cost: f64,
    /// Variable cost per student in month 1
    pub variable_cost_per_student: f64,
}

/// One projected month
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionPoint {
    /// Program the point belongs to (aggregate projections only)
    pub program: Option<String>,
    /// Month number, starting at 1
    pub month: u32,
    /// Projected students (fractional)
    pub enrollment: f64,
    /// Enrollment times tuition
    pub revenue: f64,
    /// Inflated fixed cost
    pub fixed_cost: f64,
    /// Inflated variable cost over all students
    pub variable_cost_total: f64,
    /// Fixed plus variable cost
    pub total_cost: f64,
    /// Revenue less total cost
    pub profit: f64,
}

/// Headline figures of a single-program projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionSummary {
    /// Enrollment in the baseline
    pub starting_enrollment: u64,
    /// Last-month enrollment, truncated to whole students
    pub final_enrollment: u64,
    /// Months with profit above zero
    pub profitable_months: usize,
    /// Profit summed over every month
    pub total_profit: f64,
    /// Months projected
    pub horizon: Horizon,
}

/// Single-program projection
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// Figures the projection started from
    pub baseline: ProjectionBaseline,
    /// Assumptions applied
    pub params: ProjectionParams,
    /// One point per month
    pub points: Vec<ProjectionPoint>,
}

impl Projection {
    /// Headline figures of this projection
    #[must_use]
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary {
            starting_enrollment: self.baseline.enrollment,
            final_enrollment: self
                .points
                .last()
                .map_or(self.baseline.enrollment, |p| whole_students(p.enrollment)),
            profitable_months: self.points.iter().filter(|p| p.profit > 0.0).count(),
            total_profit: self.points.iter().map(|p| p.profit).sum(),
            horizon: self.params.horizon,
        }
    }
}

/// All-programs projection
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerProjection {
    /// Assumptions applied to every program
    pub params: ProjectionParams,
    /// Points of every program, grouped by program in ledger order
    pub points: Vec<ProjectionPoint>,
    /// Profit summed over every point
    pub total_profit: f64,
    /// Distinct months where at least one program made a profit
    pub profitable_months: usize,
    /// Sum of each program's last-month enrollment
    pub final_total_enrollment: f64,
}

impl LedgerProjection {
    /// Final total enrollment truncated to whole students
    #[must_use]
    pub fn final_total_students(&self) -> u64 {
        whole_students(self.final_total_enrollment)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_students(enrollment: f64) -> u64 {
    if enrollment.is_finite() && enrollment > 0.0 {
        enrollment.trunc() as u64
    } else {
        0
    }
}

#[allow(clippy::cast_precision_loss)]
fn run(
    baseline: &ProjectionBaseline,
    months: u32,
    growth_pct: f64,
    inflation_pct: f64,
) -> Vec<ProjectionPoint> {
    let growth = 1.0 + growth_pct / 100.0;
    let inflation = 1.0 + inflation_pct / 100.0;

    let mut enrollment = baseline.enrollment as f64;
    let mut fixed_cost = baseline.fixed_cost;
    let mut variable_cost_per_student = baseline.variable_cost_per_student;

    (1..=months)
        .map(|month| {
            enrollment *= growth;
            fixed_cost *= inflation;
            variable_cost_per_student *= inflation;

            let revenue = enrollment * baseline.tuition;
            let variable_cost_total = enrollment * variable_cost_per_student;
            let total_cost = fixed_cost + variable_cost_total;
            ProjectionPoint {
                program: None,
                month,
                enrollment,
                revenue,
                fixed_cost,
                variable_cost_total,
                total_cost,
                profit: revenue - total_cost,
            }
        })
        .collect()
}

fn validate(baseline: &ProjectionBaseline, params: &ProjectionParams) -> Result<()> {
    ensure_amount("tuition", baseline.tuition)?;
    ensure_amount("fixed cost", baseline.fixed_cost)?;
    ensure_amount("variable cost per student", baseline.variable_cost_per_student)?;
    ensure_rate("growth", params.growth_pct)?;
    ensure_rate("inflation", params.inflation_pct)?;
    Ok(())
}

/// Project one program over the horizon.
///
/// # Errors
/// Returns [`BreakEvenError::DegenerateInput`] for negative or non-finite
/// amounts and non-finite rates.
pub fn project(baseline: &ProjectionBaseline, params: &ProjectionParams) -> Result<Projection> {
    validate(baseline, params)?;
    let points = run(
        baseline,
        params.horizon.months(),
        params.growth_pct,
        params.inflation_pct,
    );
    Ok(Projection {
        baseline: *baseline,
        params: *params,
        points,
    })
}

/// Project every ledger record independently and aggregate the results.
///
/// # Errors
/// Same conditions as [`project`], checked per record.
pub fn project_ledger(ledger: &Ledger, params: &ProjectionParams) -> Result<LedgerProjection> {
    let mut points = Vec::new();
    let mut final_total_enrollment = 0.0;

    for record in ledger.iter() {
        let projection = project(&record.projection_baseline(), params)?;
        if let Some(last) = projection.points.last() {
            final_total_enrollment += last.enrollment;
        }
        points.extend(projection.points.into_iter().map(|mut point| {
            point.program = Some(record.name.clone());
            point
        }));
    }

    let total_profit = points.iter().map(|p| p.profit).sum();
    let profitable_months = points
        .iter()
        .filter(|p| p.profit > 0.0)
        .map(|p| p.month)
        .collect::<BTreeSet<_>>()
        .len();

    crate::debug!(
        "Projected {} programs over {}: {profitable_months} profitable months",
        ledger.len(),
        params.horizon
    );

    Ok(LedgerProjection {
        params: *params,
        points,
        total_profit,
        profitable_months,
        final_total_enrollment,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProgramRecord;

    fn baseline() -> ProjectionBaseline {
        ProjectionBaseline {
            enrollment: 100,
            tuition: 500.0,
            fixed_cost: 10_000.0,
            variable_cost_per_student: 100.0,
        }
    }

    fn params(horizon: Horizon, growth_pct: f64, inflation_pct: f64) -> ProjectionParams {
        ProjectionParams {
            horizon,
            growth_pct,
            inflation_pct,
        }
    }

    #[test]
    fn horizon_accepts_only_supported_lengths() {
        assert_eq!(Horizon::try_from(6), Ok(Horizon::SixMonths));
        assert_eq!(Horizon::try_from(24).map(Horizon::months), Ok(24));
        assert!(Horizon::try_from(0).is_err());
        assert!(Horizon::try_from(18).is_err());
    }

    #[test]
    fn first_month_matches_worked_example() {
        let points = run(&baseline(), 1, 5.0, 2.0);
        let month = &points[0];
        assert_eq!(month.month, 1);
        assert!((month.enrollment - 105.0).abs() < 1e-9);
        assert!((month.fixed_cost - 10_200.0).abs() < 1e-9);
        assert!((month.revenue - 52_500.0).abs() < 1e-9);
        assert!((month.total_cost - 20_910.0).abs() < 1e-9);
        assert!((month.profit - 31_590.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rates_do_not_drift() {
        let projection = project(&baseline(), &params(Horizon::TwentyFourMonths, 0.0, 0.0)).unwrap();
        assert_eq!(projection.points.len(), 24);
        let first = &projection.points[0];
        for point in &projection.points {
            assert!((point.revenue - first.revenue).abs() < f64::EPSILON);
            assert!((point.total_cost - first.total_cost).abs() < f64::EPSILON);
            assert!((point.profit - first.profit).abs() < f64::EPSILON);
        }
        assert!((first.profit - 30_000.0).abs() < 1e-9);
    }

    #[test]
    fn positive_rates_increase_monotonically() {
        let projection = project(&baseline(), &params(Horizon::TwelveMonths, 3.0, 1.5)).unwrap();
        for pair in projection.points.windows(2) {
            assert!(pair[1].enrollment > pair[0].enrollment);
            assert!(pair[1].fixed_cost > pair[0].fixed_cost);
            assert_eq!(pair[1].month, pair[0].month + 1);
        }
    }

    #[test]
    fn summary_truncates_enrollment() {
        let projection = project(&baseline(), &params(Horizon::SixMonths, 5.0, 2.0)).unwrap();
        let summary = projection.summary();
        // 100 * 1.05^6 = 134.01
        assert_eq!(summary.starting_enrollment, 100);
        assert_eq!(summary.final_enrollment, 134);
        assert_eq!(summary.profitable_months, 6);
        let expected: f64 = projection.points.iter().map(|p| p.profit).sum();
        assert!((summary.total_profit - expected).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_finite_rates() {
        assert!(project(&baseline(), &params(Horizon::SixMonths, f64::NAN, 0.0)).is_err());
    }

    #[test]
    fn ledger_projection_counts_distinct_profitable_months() {
        let mut ledger = Ledger::new();
        // profit 30000 every month
        ledger.append(ProgramRecord::new("Law", 100, 500.0, 10_000.0, 10_000.0, 25));
        // loses money every month
        ledger.append(ProgramRecord::new("Art", 10, 100.0, 50_000.0, 500.0, 9_999));

        let aggregate = project_ledger(&ledger, &params(Horizon::SixMonths, 0.0, 0.0)).unwrap();
        assert_eq!(aggregate.points.len(), 12);
        assert_eq!(aggregate.profitable_months, 6);
        assert_eq!(aggregate.final_total_students(), 110);
        assert!(aggregate.points[..6]
            .iter()
            .all(|p| p.program.as_deref() == Some("Law")));

        let expected = 6.0 * 30_000.0 + 6.0 * (1_000.0 - 50_000.0 - 500.0);
        assert!((aggregate.total_profit - expected).abs() < 1e-6);
    }

    #[test]
    fn empty_ledger_projects_nothing() {
        let aggregate =
            project_ledger(&Ledger::new(), &params(Horizon::TwelveMonths, 1.0, 1.0)).unwrap();
        assert!(aggregate.points.is_empty());
        assert_eq!(aggregate.profitable_months, 0);
        assert_eq!(aggregate.final_total_students(), 0);
    }
}
