//! Integration tests for break-even engine invariants

use breakeven_analytics::core::analysis::{analyze, AnalysisRequest};
use breakeven_analytics::core::breakeven::{
    break_even_count, solve, BreakEvenInputs, Repair, SolveDirectives, SolveStatus,
};
use breakeven_analytics::core::models::{AnalysisSession, Ledger, ProgramRecord};
use breakeven_analytics::core::projection::{
    project, project_ledger, Horizon, ProjectionBaseline, ProjectionParams,
};
use breakeven_analytics::core::scenario::{
    shocked_enrollment, simulate, simulate_ledger, Profitability, ScenarioSweep,
    SimulationBaseline,
};
use breakeven_analytics::core::tuition::{CapacityInputs, PricingPolicy};

#[allow(clippy::cast_precision_loss)]
#[test]
fn break_even_is_the_smallest_covering_enrollment() {
    for fixed_cost in [0.0, 1.0, 999.0, 20_000.0, 123_456.78] {
        for (tuition, vcps) in [(1_000.0, 200.0), (250.5, 250.0), (75.0, 0.0), (901.0, 900.0)] {
            let n = break_even_count(fixed_cost, tuition, vcps).expect("positive margin");
            let margin = tuition - vcps;
            assert!(n as f64 * margin >= fixed_cost - 1e-6);
            if n > 0 {
                assert!(((n - 1) as f64) * margin < fixed_cost);
            }
        }
    }
}

#[test]
fn margin_repair_always_yields_positive_margin() {
    for (tuition, vcps) in [(0.0, 0.0), (150.0, 200.0), (200.0, 200.0), (0.0, 9_999.5)] {
        let inputs = BreakEvenInputs {
            tuition,
            variable_cost_per_student: vcps,
            fixed_cost: 1_000.0,
            capacity: 10_000,
            current_enrollment: 10_000,
        };
        let solution = solve(
            &inputs,
            SolveDirectives {
                repair_margin: true,
                ..SolveDirectives::default()
            },
        )
        .expect("repaired solve");
        assert!(solution.tuition > vcps);
        assert!((solution.tuition - (vcps + 1.0)).abs() < 1e-9);
        assert!(matches!(solution.repairs[0], Repair::Margin { .. }));
    }
}

#[test]
fn rentability_recalculation_reaches_current_enrollment() {
    for enrollment in [1_u64, 7, 40, 333] {
        let inputs = BreakEvenInputs {
            tuition: 210.0,
            variable_cost_per_student: 200.0,
            fixed_cost: 20_000.0,
            capacity: 1_000,
            current_enrollment: enrollment,
        };
        let solution = solve(&inputs, SolveDirectives::all()).expect("solve");
        assert!(solution.break_even <= enrollment);
        assert_eq!(solution.status(), SolveStatus::Ok);
        assert!(solution.tuition.fract().abs() < f64::EPSILON);
    }
}

#[test]
fn status_prefers_enrollment_shortfall_over_capacity() {
    let inputs = BreakEvenInputs {
        tuition: 300.0,
        variable_cost_per_student: 100.0,
        fixed_cost: 20_000.0,
        capacity: 50,
        current_enrollment: 40,
    };
    let solution = solve(&inputs, SolveDirectives::default()).expect("solve");
    assert_eq!(solution.break_even, 100);
    assert_eq!(solution.status(), SolveStatus::BelowEnrollment);

    let full = BreakEvenInputs {
        current_enrollment: 500,
        ..inputs
    };
    let solution = solve(&full, SolveDirectives::default()).expect("solve");
    assert_eq!(solution.status(), SolveStatus::ExceedsCapacity);
}

#[test]
fn shocked_enrollment_is_monotonic_and_never_negative() {
    for baseline in [0_u64, 1, 9, 37, 100, 1_001] {
        let mut previous = 0;
        for delta in -150..=150 {
            let shocked = shocked_enrollment(baseline, delta);
            assert!(shocked >= previous, "baseline {baseline}, delta {delta}");
            previous = shocked;
        }
        assert_eq!(shocked_enrollment(baseline, 0), baseline);
        assert_eq!(shocked_enrollment(baseline, -100), 0);
    }
    // 37 * 0.9 = 33.3 -> 33; 37 * 1.1 = 40.7 -> 40
    assert_eq!(shocked_enrollment(37, -10), 33);
    assert_eq!(shocked_enrollment(37, 10), 40);
}

#[test]
fn sweep_is_symmetric_and_profit_rises_with_enrollment() {
    let sweep = ScenarioSweep::new(50, 5).expect("valid sweep");
    let deltas = sweep.deltas();
    assert_eq!(deltas.first(), Some(&-50));
    assert_eq!(deltas.last(), Some(&50));
    assert_eq!(deltas.len(), 21);

    let baseline = SimulationBaseline {
        enrollment: 80,
        tuition: 1_000.0,
        fixed_cost: 20_000.0,
        variable_cost_per_student: 200.0,
    };
    let points = simulate(&baseline, &sweep);
    assert!(points.windows(2).all(|w| w[1].profit >= w[0].profit));
    let at_zero = points.iter().find(|p| p.delta_pct == 0).expect("zero delta");
    assert_eq!(at_zero.enrollment, 80);
    assert_eq!(at_zero.profitability, Profitability::Profitable);
}

#[test]
fn flat_projection_repeats_the_same_month() {
    let baseline = ProjectionBaseline {
        enrollment: 80,
        tuition: 1_000.0,
        fixed_cost: 20_000.0,
        variable_cost_per_student: 200.0,
    };
    for horizon in Horizon::ALL {
        let params = ProjectionParams {
            horizon,
            growth_pct: 0.0,
            inflation_pct: 0.0,
        };
        let projection = project(&baseline, &params).expect("project");
        assert_eq!(projection.points.len(), horizon.months() as usize);
        assert!(projection
            .points
            .iter()
            .all(|p| (p.profit - 44_000.0).abs() < 1e-6));

        let summary = projection.summary();
        assert_eq!(summary.final_enrollment, 80);
        assert_eq!(summary.profitable_months, horizon.months() as usize);
    }
}

#[test]
fn ledger_views_aggregate_every_program() {
    let mut ledger = Ledger::new();
    ledger.append(ProgramRecord::new("Law", 80, 1_000.0, 20_000.0, 16_000.0, 25));
    ledger.append(ProgramRecord::new("Music", 40, 300.0, 20_000.0, 4_000.0, 100));

    let sweep = ScenarioSweep::with_range(20);
    let points = simulate_ledger(&ledger, &sweep);
    assert_eq!(points.len(), 2 * sweep.deltas().len());
    assert!(points
        .iter()
        .filter(|p| p.program.as_deref() == Some("Music"))
        .all(|p| p.profitability == Profitability::NotProfitable));

    let params = ProjectionParams {
        horizon: Horizon::SixMonths,
        growth_pct: 0.0,
        inflation_pct: 0.0,
    };
    let projection = project_ledger(&ledger, &params).expect("project ledger");
    assert_eq!(projection.points.len(), 12);
    assert_eq!(projection.final_total_students(), 120);
    // Law earns 44000 a month, Music loses 12000
    assert!((projection.total_profit - 6.0 * (44_000.0 - 12_000.0)).abs() < 1e-6);
    assert_eq!(projection.profitable_months, 6);
}

#[test]
fn session_drops_cached_views_when_the_ledger_changes() {
    let request = AnalysisRequest {
        name: "Law".into(),
        capacity: CapacityInputs {
            num_rooms: 2,
            room_capacity: 50,
            current_enrollment: 80,
            fixed_cost: 20_000.0,
            variable_cost: 20_000.0,
        },
        pricing: PricingPolicy::Manual(1_000.0),
    };
    let report = analyze(&request, SolveDirectives::default()).expect("analyze");

    let mut session = AnalysisSession::new();
    assert!(!session.analysis_completed());
    session.record(report.record());
    assert!(session.analysis_completed());

    let sweep = ScenarioSweep::with_range(10);
    assert_eq!(session.simulation(sweep).len(), 3);
    assert!(session.has_cached_views());

    session.record(report.record());
    assert!(!session.has_cached_views());
    assert_eq!(session.simulation(sweep).len(), 6);

    session.request_reset();
    session.cancel_reset();
    assert_eq!(session.ledger().len(), 2);

    session.request_reset();
    assert!(session.confirm_reset());
    assert!(session.ledger().is_empty());
    assert!(!session.analysis_completed());
}
