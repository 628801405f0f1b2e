//! Chart generation for reports
//!
//! Charts use the Mermaid `xychart-beta` syntax, which renders in GitHub,
//! GitLab and VS Code Markdown previews and in HTML through mermaid.js.

pub mod mermaid;

pub use mermaid::MermaidGenerator;
