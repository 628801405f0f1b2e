//! Enrollment-shock scenario sweeps

use crate::core::error::{BreakEvenError, Result};
use crate::core::models::Ledger;
use std::fmt;
use std::ops::RangeInclusive;

/// Default step between sweep deltas, in percent
pub const DEFAULT_STEP_PCT: u32 = 10;

/// Accepted sweep ranges, in percent
pub const RANGE_LIMITS_PCT: RangeInclusive<i32> = -100..=300;

/// A closed range of percentage deviations from baseline enrollment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioSweep {
    range_pct: i32,
    step_pct: u32,
}

impl ScenarioSweep {
    /// Create a sweep over `[-range_pct, +range_pct]` stepping by `step_pct`.
    ///
    /// A negative range is accepted and yields no deltas.
    ///
    /// # Errors
    /// Returns [`BreakEvenError::DegenerateInput`] when `step_pct` is 0 or
    /// `range_pct` falls outside [`RANGE_LIMITS_PCT`].
    pub fn new(range_pct: i32, step_pct: u32) -> Result<Self> {
        if step_pct == 0 {
            return Err(BreakEvenError::degenerate("scenario step must be above zero"));
        }
        if !RANGE_LIMITS_PCT.contains(&range_pct) {
            return Err(BreakEvenError::degenerate(format!(
                "scenario range must be within {}..={} percent (got {range_pct})",
                RANGE_LIMITS_PCT.start(),
                RANGE_LIMITS_PCT.end()
            )));
        }
        Ok(Self {
            range_pct,
            step_pct,
        })
    }

    /// Sweep with the default 10% step, clamping the range to [`RANGE_LIMITS_PCT`].
    #[must_use]
    pub fn with_range(range_pct: i32) -> Self {
        Self {
            range_pct: range_pct.clamp(*RANGE_LIMITS_PCT.start(), *RANGE_LIMITS_PCT.end()),
            step_pct: DEFAULT_STEP_PCT,
        }
    }

    /// Largest deviation from baseline, in percent
    #[must_use]
    pub const fn range_pct(&self) -> i32 {
        self.range_pct
    }

    /// Distance between consecutive deltas, in percent
    #[must_use]
    pub const fn step_pct(&self) -> u32 {
        self.step_pct
    }

    /// Deltas from `-range` up to and including `+range` when the step lands on it.
    #[must_use]
    pub fn deltas(&self) -> Vec<i32> {
        let step = usize::try_from(self.step_pct).unwrap_or(usize::MAX);
        (self.range_pct.saturating_neg()..=self.range_pct).step_by(step).collect()
    }
}

/// Figures a sweep is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationBaseline {
    /// Enrollment before any change
    pub enrollment: u64,
    /// Tuition per student
    pub tuition: f64,
    /// Total fixed cost
    pub fixed_cost: f64,
    /// Variable cost per student
    pub variable_cost_per_student: f64,
}

/// Profitability label of a scenario point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profitability {
    /// Profit of zero or more
    Profitable,
    /// Loss
    NotProfitable,
}

impl Profitability {
    /// Zero profit counts as profitable.
    #[must_use]
    pub fn from_profit(profit: f64) -> Self {
        if profit >= 0.0 {
            Self::Profitable
        } else {
            Self::NotProfitable
        }
    }
}

impl fmt::Display for Profitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Profitable => "Profitable",
            Self::NotProfitable => "Not profitable",
        })
    }
}

/// One row of a scenario sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPoint {
    /// Program the point belongs to (aggregate sweeps only)
    pub program: Option<String>,
    /// Enrollment change, percent
    pub delta_pct: i32,
    /// Enrollment after the change
    pub enrollment: u64,
    /// Enrollment times tuition
    pub revenue: f64,
    /// Fixed cost plus enrollment times variable cost per student
    pub cost: f64,
    /// Revenue less cost
    pub profit: f64,
    /// Label of the profit
    pub profitability: Profitability,
}

/// Enrollment after applying `delta_pct`, truncated and clamped at zero.
#[must_use]
pub fn shocked_enrollment(baseline: u64, delta_pct: i32) -> u64 {
    let scaled = i128::from(baseline) * (100 + i128::from(delta_pct));
    u64::try_from(scaled.div_euclid(100).max(0)).unwrap_or(u64::MAX)
}

/// Recompute revenue, cost and profit at every delta of the sweep.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn simulate(baseline: &SimulationBaseline, sweep: &ScenarioSweep) -> Vec<SimulationPoint> {
    sweep
        .deltas()
        .into_iter()
        .map(|delta_pct| {
            let enrollment = shocked_enrollment(baseline.enrollment, delta_pct);
            let students = enrollment as f64;
            let revenue = students * baseline.tuition;
            let cost = baseline.fixed_cost + students * baseline.variable_cost_per_student;
            let profit = revenue - cost;
            SimulationPoint {
                program: None,
                delta_pct,
                enrollment,
                revenue,
                cost,
                profit,
                profitability: Profitability::from_profit(profit),
            }
        })
        .collect()
}

/// Sweep every ledger record from its own enrollment, tagging points by program.
#[must_use]
pub fn simulate_ledger(ledger: &Ledger, sweep: &ScenarioSweep) -> Vec<SimulationPoint> {
    let points: Vec<SimulationPoint> = ledger
        .iter()
        .flat_map(|record| {
            let baseline = record.simulation_baseline();
            simulate(&baseline, sweep).into_iter().map(|mut point| {
                point.program = Some(record.name.clone());
                point
            })
        })
        .collect();
    crate::debug!(
        "Simulated {} programs over {} deltas ({} points)",
        ledger.len(),
        sweep.deltas().len(),
        points.len()
    );
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ProgramRecord;

    fn baseline() -> SimulationBaseline {
        SimulationBaseline {
            enrollment: 100,
            tuition: 1_000.0,
            fixed_cost: 20_000.0,
            variable_cost_per_student: 200.0,
        }
    }

    #[test]
    fn sweep_is_closed_on_both_ends() {
        let deltas = ScenarioSweep::new(100, 10).unwrap().deltas();
        assert_eq!(deltas.len(), 21);
        assert_eq!(deltas.first(), Some(&-100));
        assert_eq!(deltas.last(), Some(&100));
    }

    #[test]
    fn sweep_edge_cases() {
        assert!(ScenarioSweep::new(50, 0).is_err());
        assert!(ScenarioSweep::new(-10, 10).unwrap().deltas().is_empty());
        assert_eq!(ScenarioSweep::new(0, 10).unwrap().deltas(), vec![0]);
        // step does not land on +range
        assert_eq!(ScenarioSweep::new(10, 15).unwrap().deltas(), vec![-10, 5]);
        assert_eq!(ScenarioSweep::with_range(20).step_pct(), DEFAULT_STEP_PCT);
    }

    #[test]
    fn sweep_range_is_bounded() {
        assert_eq!(ScenarioSweep::new(300, 10).unwrap().deltas().len(), 61);
        assert!(ScenarioSweep::new(-100, 10).is_ok());
        assert!(matches!(
            ScenarioSweep::new(301, 10),
            Err(BreakEvenError::DegenerateInput(_))
        ));
        assert!(ScenarioSweep::new(i32::MAX, 10).is_err());
        assert!(ScenarioSweep::new(-101, 10).is_err());
        assert_eq!(ScenarioSweep::with_range(i32::MAX).range_pct(), 300);
    }

    #[test]
    fn enrollment_truncates_and_clamps() {
        assert_eq!(shocked_enrollment(100, -150), 0);
        assert_eq!(shocked_enrollment(100, -100), 0);
        assert_eq!(shocked_enrollment(33, 10), 36);
        assert_eq!(shocked_enrollment(33, -10), 29);
        assert_eq!(shocked_enrollment(100, 15), 115);
    }

    #[test]
    fn baseline_delta_matches_worked_example() {
        let points = simulate(&baseline(), &ScenarioSweep::new(100, 10).unwrap());
        let at_zero = points.iter().find(|p| p.delta_pct == 0).unwrap();
        assert_eq!(at_zero.enrollment, 100);
        assert!((at_zero.revenue - 100_000.0).abs() < 1e-9);
        assert!((at_zero.cost - 40_000.0).abs() < 1e-9);
        assert!((at_zero.profit - 60_000.0).abs() < 1e-9);
        assert_eq!(at_zero.profitability, Profitability::Profitable);

        let wiped_out = points.first().unwrap();
        assert_eq!(wiped_out.enrollment, 0);
        assert_eq!(wiped_out.profitability, Profitability::NotProfitable);
    }

    #[test]
    fn zero_profit_is_profitable() {
        assert_eq!(Profitability::from_profit(0.0), Profitability::Profitable);
        assert_eq!(Profitability::from_profit(-0.01), Profitability::NotProfitable);
    }

    #[test]
    fn aggregate_sweep_uses_each_record() {
        let mut ledger = Ledger::new();
        assert!(simulate_ledger(&ledger, &ScenarioSweep::with_range(10)).is_empty());

        ledger.append(ProgramRecord::new("Law", 100, 1_000.0, 20_000.0, 20_000.0, 25));
        ledger.append(ProgramRecord::new("Art", 0, 500.0, 1_000.0, 800.0, 3));
        let points = simulate_ledger(&ledger, &ScenarioSweep::with_range(10));
        assert_eq!(points.len(), 6);
        assert!(points[..3].iter().all(|p| p.program.as_deref() == Some("Law")));
        assert!(points[3..].iter().all(|p| p.program.as_deref() == Some("Art")));
        // enrolled = 0 means no variable cost per student and no students
        assert!(points[3..].iter().all(|p| (p.cost - 1_000.0).abs() < 1e-9));
    }
}
