//! Report format implementations
//!
//! Both formats render askama templates from `src/core/report/templates`.

pub mod html;
pub mod markdown;

pub use html::HtmlReporter;
pub use markdown::MarkdownReporter;

use std::fmt;
use std::str::FromStr;

/// Supported report formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Markdown format with Mermaid charts
    Markdown,
    /// Self-contained HTML with Mermaid charts rendered by mermaid.js
    Html,
}

impl ReportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" | "htm" => Ok(Self::Html),
            _ => Err(format!("Unknown report format: {s}")),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::Html => write!(f, "html"),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use crate::core::analysis::{analyze, AnalysisReport, AnalysisRequest};
    use crate::core::breakeven::SolveDirectives;
    use crate::core::models::Ledger;
    use crate::core::projection::{project_ledger, Horizon, LedgerProjection, ProjectionParams};
    use crate::core::report::ReportContext;
    use crate::core::scenario::{simulate_ledger, ScenarioSweep, SimulationPoint};
    use crate::core::tuition::{CapacityInputs, PricingPolicy};

    pub struct Fixture {
        ledger: Ledger,
        analyses: Vec<AnalysisReport>,
        sweep: ScenarioSweep,
        simulation: Vec<SimulationPoint>,
        projection: LedgerProjection,
    }

    impl Fixture {
        pub fn context(&self) -> ReportContext<'_> {
            ReportContext::new(
                "Portfolio",
                &self.ledger,
                &self.analyses,
                self.sweep,
                &self.simulation,
                &self.projection,
            )
        }
    }

    fn request(name: &str, pricing: PricingPolicy) -> AnalysisRequest {
        AnalysisRequest {
            name: name.into(),
            capacity: CapacityInputs {
                num_rooms: 2,
                room_capacity: 25,
                current_enrollment: 40,
                fixed_cost: 20_000.0,
                variable_cost: 5_000.0,
            },
            pricing,
        }
    }

    pub fn build() -> Fixture {
        let analyses: Vec<AnalysisReport> = [
            request("Law", PricingPolicy::Manual(1_000.0)),
            request("<Design & Arts>", PricingPolicy::Margin(30.0)),
            request("Music", PricingPolicy::Manual(300.0)),
        ]
        .iter()
        .map(|req| analyze(req, SolveDirectives::default()).expect("analysis"))
        .collect();
        let mut ledger = Ledger::new();
        for analysis in &analyses {
            ledger.append(analysis.record());
        }
        let sweep = ScenarioSweep::with_range(20);
        let simulation = simulate_ledger(&ledger, &sweep);
        let params = ProjectionParams {
            horizon: Horizon::SixMonths,
            growth_pct: 2.0,
            inflation_pct: 1.0,
        };
        let projection = project_ledger(&ledger, &params).expect("projection");
        Fixture {
            ledger,
            analyses,
            sweep,
            simulation,
            projection,
        }
    }
}
