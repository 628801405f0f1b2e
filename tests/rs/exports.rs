//! End-to-end tests: sample programs through CSV exports and reports

use breakeven_analytics::core::analysis::{analyze, AnalysisReport};
use breakeven_analytics::core::breakeven::SolveDirectives;
use breakeven_analytics::core::export::{
    analysis_table, export_csv, ledger_projection_table, ledger_table, projection_table,
    simulation_table,
};
use breakeven_analytics::core::input::parse_programs_csv;
use breakeven_analytics::core::models::AnalysisSession;
use breakeven_analytics::core::projection::{project, Horizon, ProjectionParams};
use breakeven_analytics::core::report::{
    HtmlReporter, MarkdownReporter, ReportContext, ReportGenerator,
};
use breakeven_analytics::core::scenario::ScenarioSweep;
use std::fs;
use std::path::PathBuf;

fn sample_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("samples/programs.csv")
}

/// Analyze every sample program, repairing margins so every row lands in the ledger
fn sample_session() -> (AnalysisSession, Vec<AnalysisReport>) {
    let directives = SolveDirectives {
        repair_margin: true,
        ..SolveDirectives::default()
    };
    let reports: Vec<AnalysisReport> = parse_programs_csv(sample_path())
        .expect("sample parses")
        .iter()
        .map(|request| analyze(request, directives).expect("analysis"))
        .collect();

    let mut session = AnalysisSession::new();
    for report in &reports {
        session.record(report.record());
    }
    (session, reports)
}

fn params() -> ProjectionParams {
    ProjectionParams {
        horizon: Horizon::TwelveMonths,
        growth_pct: 1.0,
        inflation_pct: 0.5,
    }
}

#[test]
fn test_exports_every_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (mut session, reports) = sample_session();
    assert_eq!(session.ledger().len(), 5);

    let ledger_path = dir.path().join("ledger.csv");
    export_csv(&ledger_table(session.ledger()), &ledger_path).expect("ledger export");
    let ledger_csv = fs::read_to_string(&ledger_path).expect("read ledger");
    assert!(ledger_csv.starts_with("Programs,5\n"));
    assert!(ledger_csv.contains("\nStudio Arts,15,501.00,"));
    // ledger rows carry the analysis totals: 20000 + 80 * 200 capacity-based cost
    assert!(ledger_csv
        .contains("\nLaw,80,1000.00,20000.00,20000.00,25,80000.00,36000.00,44000.00,Profitable\n"));

    let analysis_path = dir.path().join("analyses").join("law.csv");
    export_csv(&analysis_table(&reports[0]), &analysis_path).expect("analysis export");
    let analysis_csv = fs::read_to_string(&analysis_path).expect("read analysis");
    assert!(analysis_csv.contains("Break-even students,25"));
    // 100 curve rows, header, blank line, 11 summary lines
    assert_eq!(analysis_csv.lines().count(), 113);

    let sweep = ScenarioSweep::new(30, 15).expect("sweep");
    let points = session.simulation(sweep).to_vec();
    let simulation_path = dir.path().join("simulation.csv");
    export_csv(&simulation_table(&points, &sweep), &simulation_path).expect("simulation export");
    let simulation_csv = fs::read_to_string(&simulation_path).expect("read simulation");
    assert!(simulation_csv.contains("Scenarios,25"));
    assert!(simulation_csv.contains("\nLaw,-30,56,"));

    let projection = session.projection(params()).expect("projection").clone();
    let projection_path = dir.path().join("projection.csv");
    export_csv(&ledger_projection_table(&projection), &projection_path)
        .expect("projection export");
    let projection_csv = fs::read_to_string(&projection_path).expect("read projection");
    assert!(projection_csv.contains("Horizon,12 months"));
    assert_eq!(
        projection_csv
            .lines()
            .filter(|line| line.starts_with("Music,"))
            .count(),
        12
    );
}

#[test]
fn test_single_program_projection_export() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (session, _) = sample_session();
    let law = session.ledger().first_named("Law").expect("law");

    let projection = project(&law.projection_baseline(), &params()).expect("project");
    let path = dir.path().join("law_projection.csv");
    export_csv(&projection_table(&projection), &path).expect("export");

    let csv = fs::read_to_string(&path).expect("read");
    assert!(csv.contains("Starting students,80"));
    assert!(csv.contains("Profitable months,12 of 12"));
}

#[test]
fn test_generates_both_report_formats() {
    let dir = tempfile::tempdir().expect("temp dir");
    let (mut session, reports) = sample_session();
    let sweep = ScenarioSweep::with_range(20);
    let simulation = session.simulation(sweep).to_vec();
    let projection = session.projection(params()).expect("projection").clone();

    let ctx = ReportContext::new(
        "Sample Portfolio",
        session.ledger(),
        &reports,
        sweep,
        &simulation,
        &projection,
    );

    let md_path = dir.path().join("reports").join("programs_report.md");
    MarkdownReporter::new()
        .generate(&ctx, &md_path)
        .expect("markdown report");
    let markdown = fs::read_to_string(&md_path).expect("read markdown");
    assert!(markdown.starts_with("# Sample Portfolio"));
    assert!(markdown.contains("### Business Evening"));
    assert!(markdown.contains("```mermaid"));

    let html_path = dir.path().join("reports").join("programs_report.html");
    HtmlReporter::new()
        .generate(&ctx, &html_path)
        .expect("html report");
    let html = fs::read_to_string(&html_path).expect("read html");
    assert!(html.contains("<title>Sample Portfolio"));
    assert!(html.contains("Studio Arts"));
}
