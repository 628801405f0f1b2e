//! Tuition derivation from capacity and cost inputs

use crate::core::error::{ensure_amount, BreakEvenError, Result};
use std::fmt;

/// How the per-student tuition is determined
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PricingPolicy {
    /// Spread total cost over full capacity, then gross up for a target margin (%).
    Margin(f64),
    /// Use the supplied price verbatim.
    Manual(f64),
}

impl PricingPolicy {
    /// Whether tuition is derived from costs rather than supplied
    #[must_use]
    pub const fn is_margin(&self) -> bool {
        matches!(self, Self::Margin(_))
    }
}

impl fmt::Display for PricingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Margin(pct) => write!(f, "margin {pct:.2}%"),
            Self::Manual(price) => write!(f, "manual ${price:.2}"),
        }
    }
}

/// Capacity and cost figures for one program
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityInputs {
    /// Number of classrooms
    pub num_rooms: u32,
    /// Seats per classroom
    pub room_capacity: u32,
    /// Students currently enrolled
    pub current_enrollment: u64,
    /// Total fixed cost
    pub fixed_cost: f64,
    /// Total variable cost
    pub variable_cost: f64,
}

impl CapacityInputs {
    /// Physical capacity: rooms × seats per room
    #[must_use]
    pub fn total_capacity(&self) -> u64 {
        u64::from(self.num_rooms) * u64::from(self.room_capacity)
    }
}

/// Result of tuition derivation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TuitionQuote {
    /// Per-student tuition
    pub tuition: f64,
    /// Physical capacity used as the variable-cost basis
    pub total_capacity: u64,
    /// Variable cost spread over capacity (0 when capacity is 0)
    pub variable_cost_per_student: f64,
}

/// Derive tuition for a program.
///
/// Variable cost per student is always spread over total capacity. Under
/// [`PricingPolicy::Margin`] the cost per seat is divided by `1 - margin/100`.
///
/// # Errors
/// Returns [`BreakEvenError::DegenerateInput`] for negative or non-finite amounts,
/// a margin outside `[0, 100)`, or margin pricing with zero capacity.
#[allow(clippy::cast_precision_loss)]
pub fn derive_tuition(inputs: &CapacityInputs, pricing: PricingPolicy) -> Result<TuitionQuote> {
    let fixed_cost = ensure_amount("fixed cost", inputs.fixed_cost)?;
    let variable_cost = ensure_amount("variable cost", inputs.variable_cost)?;
    let total_capacity = inputs.total_capacity();

    let variable_cost_per_student = if total_capacity > 0 {
        variable_cost / total_capacity as f64
    } else {
        0.0
    };

    let tuition = match pricing {
        PricingPolicy::Margin(margin_pct) => {
            if !margin_pct.is_finite() || !(0.0..100.0).contains(&margin_pct) {
                return Err(BreakEvenError::degenerate(format!(
                    "margin must be in [0, 100) percent (got {margin_pct})"
                )));
            }
            if total_capacity == 0 {
                return Err(BreakEvenError::degenerate(
                    "margin pricing needs at least one seat of capacity",
                ));
            }
            let cost_per_seat = (fixed_cost + variable_cost) / total_capacity as f64;
            cost_per_seat / (1.0 - margin_pct / 100.0)
        }
        PricingPolicy::Manual(price) => ensure_amount("tuition", price)?,
    };

    crate::debug!(
        "Tuition derived ({pricing}): ${tuition:.2} over {total_capacity} seats, variable ${variable_cost_per_student:.2}/student"
    );

    Ok(TuitionQuote {
        tuition,
        total_capacity,
        variable_cost_per_student,
    })
}
