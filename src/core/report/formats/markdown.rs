//! Markdown report generator
//!
//! Renders reports with embedded Mermaid charts. These render well in GitHub,
//! GitLab, and VS Code.

use crate::core::report::{ReportContext, ReportGenerator, ReportView};
use askama::Template;
use std::error::Error;

#[derive(Template)]
#[template(path = "report.md", escape = "none")]
struct MarkdownTemplate<'a> {
    view: &'a ReportView,
}

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for MarkdownReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let mut view = ReportView::from_context(ctx);
        escape_table_cells(&mut view);
        Ok(MarkdownTemplate { view: &view }.render()?)
    }
}

/// Program names land in table cells, where a bare `|` splits the column
fn escape_table_cells(view: &mut ReportView) {
    let escape = |name: &mut String| {
        if name.contains('|') {
            *name = name.replace('|', "\\|");
        }
    };
    view.ledger_rows.iter_mut().for_each(|r| escape(&mut r.name));
    view.simulation_rows.iter_mut().for_each(|r| escape(&mut r.program));
    view.projection_rows.iter_mut().for_each(|r| escape(&mut r.program));
}
