//! Break-even analytics for academic programs.
//!
//! The [`core`] module holds the calculation engine (tuition derivation,
//! break-even solving, enrollment scenarios, monthly projections) together with
//! the exporters and report renderers that consume it. Configuration lives in
//! [`shared`] and is re-exported at the crate root.

pub mod core;
pub mod logger;
pub mod shared;

pub use shared::*;
