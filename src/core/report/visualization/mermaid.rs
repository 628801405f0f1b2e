//! Mermaid chart generator for break-even results
//!
//! Produces bare `xychart-beta` definitions. The Markdown template wraps them
//! in a fenced `mermaid` block; the HTML template places them in a
//! `<pre class="mermaid">`.

use crate::core::breakeven::CurvePoint;
use crate::core::projection::ProjectionPoint;
use crate::core::scenario::SimulationPoint;
use std::fmt::Write;

/// Generator for Mermaid chart syntax
pub struct MermaidGenerator;

impl MermaidGenerator {
    /// Upper bound on x-axis categories per chart
    pub const MAX_POINTS: usize = 40;

    /// Revenue and cost lines over enrollment
    ///
    /// Long curves are sampled down to [`Self::MAX_POINTS`], always keeping
    /// the last point.
    #[must_use]
    pub fn revenue_cost_chart(title: &str, curve: &[CurvePoint]) -> String {
        if curve.is_empty() {
            return String::new();
        }
        let sampled = Self::sample(curve);

        let mut output = Self::header(title);
        let students: Vec<String> = sampled.iter().map(|p| p.students.to_string()).collect();
        let _ = writeln!(output, "    x-axis \"Students\" [{}]", students.join(", "));
        output.push_str("    y-axis \"Amount ($)\"\n");
        let _ = writeln!(output, "    line {}", Self::series(sampled.iter().map(|p| p.revenue)));
        let _ = writeln!(output, "    line {}", Self::series(sampled.iter().map(|p| p.cost)));
        output
    }

    /// Net profit per enrollment change, one line per program
    #[must_use]
    pub fn scenario_profit_chart(points: &[SimulationPoint]) -> String {
        let groups = Self::group_by_program(points, |p| p.program.as_deref(), |p| p.profit);
        let Some((_, first)) = groups.first() else {
            return String::new();
        };

        let mut output = Self::header("Net profit by enrollment change");
        let deltas: Vec<String> = points
            .iter()
            .take(first.len())
            .map(|p| format!("\"{}%\"", p.delta_pct))
            .collect();
        let _ = writeln!(output, "    x-axis \"Change in students\" [{}]", deltas.join(", "));
        output.push_str("    y-axis \"Net profit ($)\"\n");
        for (_, profits) in &groups {
            let _ = writeln!(output, "    line {}", Self::series(profits.iter().copied()));
        }
        output
    }

    /// Net profit per projected month, one line per program
    #[must_use]
    pub fn projection_profit_chart(points: &[ProjectionPoint]) -> String {
        let groups = Self::group_by_program(points, |p| p.program.as_deref(), |p| p.profit);
        let Some((_, first)) = groups.first() else {
            return String::new();
        };

        let mut output = Self::header("Projected net profit by month");
        let months: Vec<String> = points
            .iter()
            .take(first.len())
            .map(|p| p.month.to_string())
            .collect();
        let _ = writeln!(output, "    x-axis \"Month\" [{}]", months.join(", "));
        output.push_str("    y-axis \"Net profit ($)\"\n");
        for (_, profits) in &groups {
            let _ = writeln!(output, "    line {}", Self::series(profits.iter().copied()));
        }
        output
    }

    fn header(title: &str) -> String {
        format!("xychart-beta\n    title \"{}\"\n", Self::sanitize_label(title))
    }

    /// Consecutive points sharing a program tag form one series, in first-seen order
    fn group_by_program<'a, T>(
        points: &'a [T],
        program: impl Fn(&'a T) -> Option<&'a str>,
        value: impl Fn(&T) -> f64,
    ) -> Vec<(Option<&'a str>, Vec<f64>)> {
        let mut groups: Vec<(Option<&'a str>, Vec<f64>)> = Vec::new();
        for point in points {
            let tag = program(point);
            match groups.last_mut() {
                Some((last, values)) if *last == tag => values.push(value(point)),
                _ => groups.push((tag, vec![value(point)])),
            }
        }
        groups
    }

    fn sample<T>(items: &[T]) -> Vec<&T> {
        if items.len() <= Self::MAX_POINTS {
            return items.iter().collect();
        }
        let stride = items.len().div_ceil(Self::MAX_POINTS);
        let mut sampled: Vec<&T> = items.iter().step_by(stride).collect();
        if (items.len() - 1) % stride != 0 {
            sampled.extend(items.last());
        }
        sampled
    }

    fn series(values: impl Iterator<Item = f64>) -> String {
        let formatted: Vec<String> = values.map(|v| format!("{v:.2}")).collect();
        format!("[{}]", formatted.join(", "))
    }

    /// Mermaid titles are double-quoted
    fn sanitize_label(label: &str) -> String {
        label.replace('"', "'")
    }
}
