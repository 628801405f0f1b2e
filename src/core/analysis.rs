//! Break-even analysis workflow
//!
//! Validates one program's inputs, derives tuition, solves for break-even
//! under the caller's repair directives and builds the resulting
//! [`ProgramRecord`].

use crate::core::breakeven::{
    profitability_curve, solve, BreakEvenInputs, BreakEvenSolution, CurvePoint, SolveDirectives,
};
use crate::core::error::{ensure_amount, BreakEvenError, Result};
use crate::core::models::ProgramRecord;
use crate::core::scenario::Profitability;
use crate::core::tuition::{derive_tuition, CapacityInputs, PricingPolicy, TuitionQuote};

/// Inputs for analyzing one program
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Program name
    pub name: String,
    /// Rooms, seats, enrollment and costs
    pub capacity: CapacityInputs,
    /// How tuition is set
    pub pricing: PricingPolicy,
}

impl AnalysisRequest {
    /// Reject inputs the engine cannot compute with.
    ///
    /// # Errors
    /// Returns [`BreakEvenError::DegenerateInput`] for an empty name, negative
    /// or non-finite amounts, or a margin outside `[0, 100)`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BreakEvenError::degenerate("program name must not be empty"));
        }
        ensure_amount("fixed cost", self.capacity.fixed_cost)?;
        ensure_amount("variable cost", self.capacity.variable_cost)?;
        match self.pricing {
            PricingPolicy::Margin(pct) if !(0.0..100.0).contains(&pct) => Err(
                BreakEvenError::degenerate(format!("margin must be in [0, 100) percent (got {pct})")),
            ),
            PricingPolicy::Margin(_) => Ok(()),
            PricingPolicy::Manual(price) => ensure_amount("tuition", price).map(|_| ()),
        }
    }

    /// Enrollment the analysis is judged against: full capacity under margin
    /// pricing, current enrollment under manual pricing
    #[must_use]
    pub fn enrollment_basis(&self) -> u64 {
        if self.pricing.is_margin() {
            self.capacity.total_capacity()
        } else {
            self.capacity.current_enrollment
        }
    }
}

/// Outcome of a completed analysis
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    /// Inputs the analysis ran on
    pub request: AnalysisRequest,
    /// Tuition derived before solving
    pub quote: TuitionQuote,
    /// Final solver figures
    pub solution: BreakEvenSolution,
    /// Revenue and cost for 1..=capacity students at the final tuition
    pub curve: Vec<CurvePoint>,
}

impl AnalysisReport {
    /// Enrollment basis of the request
    #[must_use]
    pub fn enrollment_basis(&self) -> u64 {
        self.request.enrollment_basis()
    }

    /// Revenue at the enrollment basis and final tuition
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn current_revenue(&self) -> f64 {
        self.enrollment_basis() as f64 * self.solution.tuition
    }

    /// Fixed cost plus the enrollment basis at the capacity-based variable cost
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn current_cost(&self) -> f64 {
        self.request.capacity.fixed_cost
            + self.enrollment_basis() as f64 * self.quote.variable_cost_per_student
    }

    /// Current revenue less current cost
    #[must_use]
    pub fn net_profit(&self) -> f64 {
        self.current_revenue() - self.current_cost()
    }

    /// Profitability label of the net profit
    #[must_use]
    pub fn profitability(&self) -> Profitability {
        Profitability::from_profit(self.net_profit())
    }

    /// Ledger entry for this analysis
    #[must_use]
    pub fn record(&self) -> ProgramRecord {
        ProgramRecord::new(
            self.request.name.clone(),
            self.enrollment_basis(),
            self.solution.tuition,
            self.request.capacity.fixed_cost,
            self.request.capacity.variable_cost,
            self.solution.break_even,
        )
        .with_total_cost(self.current_cost())
    }

    /// Key/value summary of the headline figures
    #[must_use]
    pub fn summary(&self) -> Vec<(String, String)> {
        vec![
            ("Program".into(), self.request.name.clone()),
            ("Pricing".into(), self.request.pricing.to_string()),
            ("Break-even students".into(), self.solution.break_even.to_string()),
            ("Current students".into(), self.enrollment_basis().to_string()),
            ("Total capacity".into(), self.quote.total_capacity.to_string()),
            ("Tuition".into(), format!("{:.2}", self.solution.tuition)),
            ("Current revenue".into(), format!("{:.2}", self.current_revenue())),
            ("Current cost".into(), format!("{:.2}", self.current_cost())),
            ("Net profit".into(), format!("{:.2}", self.net_profit())),
            ("Profitability".into(), self.profitability().to_string()),
            ("Status".into(), self.solution.status().to_string()),
        ]
    }
}

/// Run a full break-even analysis for one program.
///
/// Without directives this halts on a non-viable margin and reports advisories
/// without recalculating. Callers that want repairs call again with the
/// matching [`SolveDirectives`].
///
/// # Errors
/// Returns [`BreakEvenError::NonViableMargin`] when the margin is not positive
/// and no repair was requested, or [`BreakEvenError::DegenerateInput`] for
/// invalid inputs.
pub fn analyze(request: &AnalysisRequest, directives: SolveDirectives) -> Result<AnalysisReport> {
    request.validate()?;
    let quote = derive_tuition(&request.capacity, request.pricing)?;

    let inputs = BreakEvenInputs {
        tuition: quote.tuition,
        variable_cost_per_student: quote.variable_cost_per_student,
        fixed_cost: request.capacity.fixed_cost,
        capacity: quote.total_capacity,
        current_enrollment: request.enrollment_basis(),
    };
    let solution = solve(&inputs, directives)?;
    for advisory in &solution.advisories {
        crate::warn!("{}: {advisory}", request.name);
    }

    let curve = profitability_curve(
        solution.tuition,
        quote.variable_cost_per_student,
        request.capacity.fixed_cost,
        quote.total_capacity,
    );

    crate::info!(
        "Analyzed {}: tuition ${:.2}, break-even {} students",
        request.name,
        solution.tuition,
        solution.break_even
    );

    Ok(AnalysisReport {
        request: request.clone(),
        quote,
        solution,
        curve,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::breakeven::SolveStatus;

    fn request(pricing: PricingPolicy, current_enrollment: u64) -> AnalysisRequest {
        AnalysisRequest {
            name: "Law".into(),
            capacity: CapacityInputs {
                num_rooms: 2,
                room_capacity: 50,
                current_enrollment,
                fixed_cost: 20_000.0,
                variable_cost: 20_000.0,
            },
            pricing,
        }
    }

    #[test]
    fn manual_pricing_judges_current_enrollment() {
        let report = analyze(&request(PricingPolicy::Manual(1_000.0), 80), SolveDirectives::default())
            .unwrap();
        assert_eq!(report.enrollment_basis(), 80);
        assert_eq!(report.solution.break_even, 25);
        assert_eq!(report.solution.status(), SolveStatus::Ok);
        assert_eq!(report.curve.len(), 100);
        // 80 * 1000 - (20000 + 80 * 200)
        assert!((report.net_profit() - 44_000.0).abs() < 1e-9);

        let record = report.record();
        assert_eq!(record.enrolled, 80);
        assert_eq!(record.break_even, 25);
        assert!((record.variable_cost - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_carries_the_reported_totals() {
        for pricing in [PricingPolicy::Manual(1_000.0), PricingPolicy::Margin(20.0)] {
            let report = analyze(&request(pricing, 80), SolveDirectives::default()).unwrap();
            let record = report.record();
            assert!((record.revenue() - report.current_revenue()).abs() < 1e-9);
            assert!((record.total_cost - report.current_cost()).abs() < 1e-9);
            assert!((record.net_profit() - report.net_profit()).abs() < 1e-9);
        }
        let law = analyze(&request(PricingPolicy::Manual(1_000.0), 80), SolveDirectives::default())
            .unwrap()
            .record();
        assert!((law.net_profit() - 44_000.0).abs() < 1e-9);
    }

    #[test]
    fn margin_pricing_judges_full_capacity() {
        let report = analyze(&request(PricingPolicy::Margin(20.0), 0), SolveDirectives::default())
            .unwrap();
        assert_eq!(report.enrollment_basis(), 100);
        assert!((report.solution.tuition - 500.0).abs() < 1e-9);
        // 20000 / 300 = 66.7 -> 67
        assert_eq!(report.solution.break_even, 67);
        assert_eq!(report.profitability(), Profitability::Profitable);
    }

    #[test]
    fn non_viable_margin_needs_repair_directive() {
        let req = request(PricingPolicy::Manual(150.0), 80);
        let err = analyze(&req, SolveDirectives::default()).unwrap_err();
        assert!(matches!(err, BreakEvenError::NonViableMargin { .. }));

        let directives = SolveDirectives {
            repair_margin: true,
            ..SolveDirectives::default()
        };
        let report = analyze(&req, directives).unwrap();
        assert!((report.solution.tuition - 201.0).abs() < 1e-9);
    }

    #[test]
    fn validation_rejects_bad_inputs() {
        let mut req = request(PricingPolicy::Manual(1_000.0), 10);
        req.name = "  ".into();
        assert!(req.validate().is_err());

        assert!(request(PricingPolicy::Margin(100.0), 10).validate().is_err());
        assert!(request(PricingPolicy::Manual(-5.0), 10).validate().is_err());
    }

    #[test]
    fn summary_lists_headline_figures() {
        let report = analyze(&request(PricingPolicy::Manual(1_000.0), 80), SolveDirectives::default())
            .unwrap();
        let summary = report.summary();
        assert!(summary.contains(&("Break-even students".to_string(), "25".to_string())));
        assert!(summary.contains(&("Profitability".to_string(), "Profitable".to_string())));
    }
}
