//! Error types for the calculation engine

use thiserror::Error;

/// Blocking conditions raised by the engine.
///
/// Advisories that let the computation proceed are not errors; see
/// [`crate::core::breakeven::Advisory`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakEvenError {
    /// Tuition does not exceed the per-student variable cost, so no enrollment
    /// level ever covers the fixed cost. Recoverable with a margin repair.
    #[error(
        "tuition ${tuition:.2} does not exceed the variable cost per student ${variable_cost_per_student:.2}; the program cannot break even"
    )]
    NonViableMargin {
        /// Tuition that was checked
        tuition: f64,
        /// Per-student variable cost it failed to cover
        variable_cost_per_student: f64,
    },

    /// An input the engine cannot compute with (zero divisor, margin of 100% or
    /// more, unsupported horizon, negative or non-finite amounts).
    #[error("invalid input: {0}")]
    DegenerateInput(String),
}

impl BreakEvenError {
    /// Shorthand for [`BreakEvenError::DegenerateInput`].
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput(reason.into())
    }
}

/// Convenience alias used throughout the engine
pub type Result<T> = std::result::Result<T, BreakEvenError>;

/// Reject negative, NaN and infinite amounts.
///
/// # Errors
/// Returns [`BreakEvenError::DegenerateInput`] naming the offending field.
pub fn ensure_amount(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(BreakEvenError::degenerate(format!(
            "{field} must be a finite, non-negative amount (got {value})"
        )))
    }
}

/// Reject NaN and infinite rates. Rates may be negative (shrinking enrollment, deflation).
///
/// # Errors
/// Returns [`BreakEvenError::DegenerateInput`] naming the offending field.
pub fn ensure_rate(field: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(BreakEvenError::degenerate(format!(
            "{field} must be a finite percentage (got {value})"
        )))
    }
}
