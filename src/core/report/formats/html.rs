//! HTML report generator
//!
//! Generates a self-contained HTML page with embedded CSS. Mermaid charts are
//! rendered client-side by mermaid.js; program names and chart text are
//! HTML-escaped by the template.

use crate::core::report::{ReportContext, ReportGenerator, ReportView};
use askama::Template;
use std::error::Error;

#[derive(Template)]
#[template(path = "report.html")]
struct HtmlTemplate<'a> {
    view: &'a ReportView,
}

/// HTML report generator
pub struct HtmlReporter;

impl HtmlReporter {
    /// Create a new HTML reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for HtmlReporter {
    fn render(&self, ctx: &ReportContext) -> Result<String, Box<dyn Error>> {
        let view = ReportView::from_context(ctx);
        Ok(HtmlTemplate { view: &view }.render()?)
    }
}
