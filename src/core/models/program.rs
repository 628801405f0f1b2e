//! Program record model

use crate::core::projection::ProjectionBaseline;
use crate::core::scenario::SimulationBaseline;
use serde::{Deserialize, Serialize};

/// One analyzed academic program.
///
/// Created only by a completed break-even analysis. The total cost is the one
/// the analysis reported; revenue and profit follow from it. The per-student
/// variable cost is derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramRecord {
    /// Program name (duplicates are distinct entries)
    pub name: String,

    /// Enrollment basis of the analysis: capacity under margin pricing,
    /// current enrollment under manual pricing
    pub enrolled: u64,

    /// Tuition per student, after any repair
    pub tuition: f64,

    /// Total fixed cost
    pub fixed_cost: f64,

    /// Total variable cost
    pub variable_cost: f64,

    /// Break-even enrollment (may exceed capacity)
    pub break_even: u64,

    /// Total cost at the enrollment basis, as reported by the analysis
    pub total_cost: f64,
}

impl ProgramRecord {
    /// Create a new record, costing the enrolled students at the derived
    /// per-student variable cost
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn new(
        name: impl Into<String>,
        enrolled: u64,
        tuition: f64,
        fixed_cost: f64,
        variable_cost: f64,
        break_even: u64,
    ) -> Self {
        let mut record = Self {
            name: name.into(),
            enrolled,
            tuition,
            fixed_cost,
            variable_cost,
            break_even,
            total_cost: 0.0,
        };
        record.total_cost = fixed_cost + enrolled as f64 * record.variable_cost_per_student();
        record
    }

    /// Replace the total cost with the figure an analysis reported
    #[must_use]
    pub fn with_total_cost(mut self, total_cost: f64) -> Self {
        self.total_cost = total_cost;
        self
    }

    /// Total variable cost over enrolled students (0 when nobody is enrolled)
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn variable_cost_per_student(&self) -> f64 {
        if self.enrolled == 0 {
            0.0
        } else {
            self.variable_cost / self.enrolled as f64
        }
    }

    /// Enrolled students at the recorded tuition
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn revenue(&self) -> f64 {
        self.enrolled as f64 * self.tuition
    }

    /// Revenue less the recorded total cost
    #[must_use]
    pub fn net_profit(&self) -> f64 {
        self.revenue() - self.total_cost
    }

    /// Zero profit counts as profitable
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.net_profit() >= 0.0
    }

    /// Baseline for a scenario sweep from this record's enrollment
    #[must_use]
    pub fn simulation_baseline(&self) -> SimulationBaseline {
        SimulationBaseline {
            enrollment: self.enrolled,
            tuition: self.tuition,
            fixed_cost: self.fixed_cost,
            variable_cost_per_student: self.variable_cost_per_student(),
        }
    }

    /// Baseline for a projection from this record's last analysis
    #[must_use]
    pub fn projection_baseline(&self) -> ProjectionBaseline {
        ProjectionBaseline {
            enrollment: self.enrolled,
            tuition: self.tuition,
            fixed_cost: self.fixed_cost,
            variable_cost_per_student: self.variable_cost_per_student(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_totals() {
        let record = ProgramRecord::new("Law", 100, 1_000.0, 20_000.0, 20_000.0, 25);
        assert!((record.variable_cost_per_student() - 200.0).abs() < 1e-9);
        assert!((record.revenue() - 100_000.0).abs() < 1e-9);
        assert!((record.total_cost - 40_000.0).abs() < 1e-9);
        assert!((record.net_profit() - 60_000.0).abs() < 1e-9);
        assert!(record.is_profitable());
    }

    #[test]
    fn zero_enrollment_has_no_per_student_cost() {
        let record = ProgramRecord::new("Empty", 0, 1_000.0, 5_000.0, 300.0, 7);
        assert!(record.variable_cost_per_student().abs() < f64::EPSILON);
        assert!((record.total_cost - 5_000.0).abs() < f64::EPSILON);
        assert!(!record.is_profitable());
        assert_eq!(record.simulation_baseline().enrollment, 0);
    }

    #[test]
    fn analysis_cost_overrides_derived_cost() {
        let record = ProgramRecord::new("Law", 80, 1_000.0, 20_000.0, 20_000.0, 25)
            .with_total_cost(36_000.0);
        assert!((record.net_profit() - 44_000.0).abs() < 1e-9);
        // baselines keep the enrolled-based per-student cost
        assert!((record.simulation_baseline().variable_cost_per_student - 250.0).abs() < 1e-9);
    }
}
