//! Data models for break-even analysis

pub mod ledger;
pub mod program;
pub mod session;

pub use ledger::Ledger;
pub use program::ProgramRecord;
pub use session::AnalysisSession;
