//! Calculation engine and its consumers
//!
//! Tuition derivation, break-even solving, enrollment scenarios and monthly
//! projections are pure functions over in-memory values. Input parsing,
//! exports and reports are the only parts that touch the filesystem.

pub mod analysis;
pub mod breakeven;
pub mod error;
pub mod export;
pub mod input;
pub mod models;
pub mod projection;
pub mod report;
pub mod scenario;
pub mod tuition;

pub use error::{BreakEvenError, Result};
