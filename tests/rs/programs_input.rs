//! Integration tests for programs CSV parsing

use breakeven_analytics::core::analysis::analyze;
use breakeven_analytics::core::breakeven::{SolveDirectives, SolveStatus};
use breakeven_analytics::core::input::{load_programs, parse_programs_csv, InputError};
use breakeven_analytics::core::tuition::PricingPolicy;
use breakeven_analytics::core::BreakEvenError;
use std::fs;
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/programs.csv")
}

#[test]
fn test_parse_sample_programs() {
    let requests = parse_programs_csv(sample_path()).expect("sample file parses");

    let names: Vec<&str> = requests.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        ["Law", "Nursing", "Music", "Business Evening", "Studio Arts"]
    );

    let nursing = &requests[1];
    assert_eq!(nursing.pricing, PricingPolicy::Margin(30.0));
    assert_eq!(nursing.capacity.total_capacity(), 90);
    assert!((nursing.capacity.fixed_cost - 45_000.0).abs() < f64::EPSILON);

    assert_eq!(requests[0].pricing, PricingPolicy::Manual(1_000.0));
}

#[test]
fn test_sample_programs_analyze() {
    let requests = parse_programs_csv(sample_path()).expect("sample file parses");
    let outcomes: Vec<_> = requests
        .iter()
        .map(|r| analyze(r, SolveDirectives::default()))
        .collect();

    let law = outcomes[0].as_ref().expect("law solves");
    assert_eq!(law.solution.break_even, 25);
    assert_eq!(law.solution.status(), SolveStatus::Ok);

    let nursing = outcomes[1].as_ref().expect("nursing solves");
    assert!((nursing.solution.tuition - 1_000.0).abs() < 1e-6);
    assert_eq!(nursing.solution.break_even, 57);
    assert_eq!(nursing.enrollment_basis(), 90);

    let music = outcomes[2].as_ref().expect("music solves");
    assert_eq!(music.solution.break_even, 100);
    assert_eq!(music.solution.advisories.len(), 2);
    assert_eq!(music.solution.status(), SolveStatus::BelowEnrollment);

    let evening = outcomes[3].as_ref().expect("evening solves");
    assert_eq!(evening.solution.break_even, 30);
    assert!(evening.solution.offers_rentability_recalculation());

    let studio = outcomes[4].as_ref().expect_err("studio arts halts");
    assert!(matches!(studio, BreakEvenError::NonViableMargin { .. }));
    assert_eq!(
        SolveStatus::of_error(studio),
        Some(SolveStatus::NeedsMarginRepair)
    );
}

#[test]
fn test_load_multiple_files_keeps_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let extra = dir.path().join("extra.csv");
    fs::write(
        &extra,
        "Program,Rooms,Room Capacity,Current Students,Fixed Cost,Variable Cost,Tuition\nChemistry,1,30,20,9000,3000,800\n",
    )
    .expect("write extra file");

    let requests = load_programs(&[sample_path(), extra]).expect("both files parse");
    assert_eq!(requests.len(), 6);
    assert_eq!(requests[5].name, "Chemistry");
    assert_eq!(requests[5].pricing, PricingPolicy::Manual(800.0));
}

#[test]
fn test_missing_file_reports_path() {
    let err = parse_programs_csv("does/not/exist.csv").expect_err("missing file");
    assert!(matches!(err, InputError::Io { .. }));
    assert!(err.to_string().contains("does/not/exist.csv"));
}

#[test]
fn test_invalid_row_aborts_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("bad.csv");
    fs::write(
        &path,
        "Program,Rooms,Room Capacity,Current Students,Fixed Cost,Variable Cost,Tuition\nLaw,2,50,-3,20000,20000,1000\n",
    )
    .expect("write bad file");

    let err = parse_programs_csv(&path).expect_err("negative enrollment");
    match err {
        InputError::InvalidRow { line, message, .. } => {
            assert_eq!(line, 2);
            assert!(message.contains("Current Students"));
        }
        other => panic!("unexpected error: {other}"),
    }
}
