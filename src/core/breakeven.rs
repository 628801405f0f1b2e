//! Break-even enrollment solver
//!
//! The solver works in two phases. A first call without directives reports
//! whether tuition covers the variable cost per student and which advisories
//! apply. The caller then decides whether to call again with
//! [`SolveDirectives`] asking for a margin repair or a minimum-rentability
//! recalculation. The solver never repairs on its own.

use crate::core::error::{ensure_amount, BreakEvenError, Result};
use std::fmt;

/// Inputs to the break-even computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakEvenInputs {
    /// Per-student tuition
    pub tuition: f64,
    /// Per-student variable cost
    pub variable_cost_per_student: f64,
    /// Total fixed cost
    pub fixed_cost: f64,
    /// Physical capacity (seats)
    pub capacity: u64,
    /// Enrollment the program is judged against
    pub current_enrollment: u64,
}

/// Repairs the caller agrees to apply
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveDirectives {
    /// Raise tuition to variable cost + 1 when the margin is not positive
    pub repair_margin: bool,
    /// Recalculate tuition so current enrollment reaches break-even
    pub recalculate_for_rentability: bool,
}

impl SolveDirectives {
    /// Directives applying every available repair
    #[must_use]
    pub const fn all() -> Self {
        Self {
            repair_margin: true,
            recalculate_for_rentability: true,
        }
    }
}

/// Overall state of a solve, as shown to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Break-even is within capacity and current enrollment
    Ok,
    /// Tuition does not cover the variable cost per student
    NeedsMarginRepair,
    /// Break-even exceeds physical capacity
    ExceedsCapacity,
    /// Break-even exceeds current enrollment
    BelowEnrollment,
}

impl SolveStatus {
    /// Status a halted solve stands for. Invalid input has no status.
    #[must_use]
    pub const fn of_error(err: &BreakEvenError) -> Option<Self> {
        match err {
            BreakEvenError::NonViableMargin { .. } => Some(Self::NeedsMarginRepair),
            BreakEvenError::DegenerateInput(_) => None,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "ok",
            Self::NeedsMarginRepair => "needs_margin_repair",
            Self::ExceedsCapacity => "exceeds_capacity",
            Self::BelowEnrollment => "below_enrollment",
        };
        f.write_str(label)
    }
}

/// Non-blocking warnings raised on the first break-even computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// More students are needed than the rooms can seat
    ExceedsCapacity {
        /// Break-even enrollment
        break_even: u64,
        /// Physical capacity
        capacity: u64,
    },
    /// The program is not yet profitable at its current enrollment
    BelowCurrentEnrollment {
        /// Break-even enrollment
        break_even: u64,
        /// Current enrollment
        current_enrollment: u64,
    },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsCapacity {
                break_even,
                capacity,
            } => write!(
                f,
                "break-even of {break_even} students exceeds the capacity of {capacity}"
            ),
            Self::BelowCurrentEnrollment {
                break_even,
                current_enrollment,
            } => write!(
                f,
                "break-even of {break_even} students exceeds the current enrollment of {current_enrollment}"
            ),
        }
    }
}

/// A repair the solver applied on the caller's behalf
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repair {
    /// Tuition raised to variable cost per student + 1
    Margin {
        /// Tuition before the repair
        previous_tuition: f64,
        /// Tuition after the repair
        tuition: f64,
    },
    /// Tuition recalculated so current enrollment covers fixed cost
    MinimumRentability {
        /// Tuition before the recalculation
        previous_tuition: f64,
        /// Recalculated tuition
        tuition: f64,
        /// Break-even under the recalculated tuition
        break_even: u64,
    },
}

impl fmt::Display for Repair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Margin {
                previous_tuition,
                tuition,
            } => write!(
                f,
                "tuition raised from ${previous_tuition:.2} to ${tuition:.2} to cover the variable cost"
            ),
            Self::MinimumRentability {
                previous_tuition,
                tuition,
                break_even,
            } => write!(
                f,
                "tuition recalculated from ${previous_tuition:.2} to ${tuition:.2} for minimum rentability (new break-even: {break_even} students)"
            ),
        }
    }
}

/// Result of a successful solve
#[derive(Debug, Clone, PartialEq)]
pub struct BreakEvenSolution {
    /// Final tuition, after any repairs
    pub tuition: f64,
    /// Break-even enrollment under the final tuition
    pub break_even: u64,
    /// Physical capacity the solve was checked against
    pub capacity: u64,
    /// Enrollment the solve was checked against
    pub current_enrollment: u64,
    /// Advisories raised on the first computation
    pub advisories: Vec<Advisory>,
    /// Repairs applied, in order
    pub repairs: Vec<Repair>,
}

impl BreakEvenSolution {
    /// Status of the final figures. Enrollment shortfall takes precedence over
    /// capacity because only the former has a repair.
    #[must_use]
    pub const fn status(&self) -> SolveStatus {
        if self.break_even > self.current_enrollment {
            SolveStatus::BelowEnrollment
        } else if self.break_even > self.capacity {
            SolveStatus::ExceedsCapacity
        } else {
            SolveStatus::Ok
        }
    }

    /// Whether the minimum-rentability recalculation could be applied
    #[must_use]
    pub fn offers_rentability_recalculation(&self) -> bool {
        self.current_enrollment > 0
            && self
                .advisories
                .iter()
                .any(|a| matches!(a, Advisory::BelowCurrentEnrollment { .. }))
            && !self
                .repairs
                .iter()
                .any(|r| matches!(r, Repair::MinimumRentability { .. }))
    }
}

/// Tuition recalculated for minimum rentability
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RentabilityQuote {
    /// Recalculated tuition, rounded up to a whole currency unit
    pub tuition: f64,
    /// Break-even under that tuition
    pub break_even: u64,
}

/// A point on the revenue-vs-cost curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    /// Enrolled students
    pub students: u64,
    /// Revenue at this enrollment
    pub revenue: f64,
    /// Fixed plus variable cost at this enrollment
    pub cost: f64,
}

/// Contribution margin per student.
///
/// # Errors
/// Returns [`BreakEvenError::NonViableMargin`] when tuition does not exceed the
/// variable cost per student.
pub fn check_margin(tuition: f64, variable_cost_per_student: f64) -> Result<f64> {
    if tuition <= variable_cost_per_student {
        return Err(BreakEvenError::NonViableMargin {
            tuition,
            variable_cost_per_student,
        });
    }
    Ok(tuition - variable_cost_per_student)
}

/// Add the variable-cost shortfall plus one currency unit to tuition.
#[must_use]
pub fn repair_margin(tuition: f64, variable_cost_per_student: f64) -> f64 {
    let shortfall = variable_cost_per_student - tuition;
    tuition + shortfall + 1.0
}

/// Smallest whole number of students whose contribution covers the fixed cost.
///
/// # Errors
/// Returns [`BreakEvenError::NonViableMargin`] for a non-positive margin and
/// [`BreakEvenError::DegenerateInput`] for a negative or non-finite fixed cost.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn break_even_count(fixed_cost: f64, tuition: f64, variable_cost_per_student: f64) -> Result<u64> {
    let fixed_cost = ensure_amount("fixed cost", fixed_cost)?;
    let margin = check_margin(tuition, variable_cost_per_student)?;
    let students = (fixed_cost / margin).ceil();
    if !students.is_finite() {
        return Err(BreakEvenError::degenerate(format!(
            "break-even is not finite for a margin of {margin}"
        )));
    }
    Ok(students as u64)
}

/// Tuition at which the current enrollment exactly covers fixed cost, rounded
/// up to the next whole currency unit, and the resulting break-even.
///
/// # Errors
/// Returns [`BreakEvenError::DegenerateInput`] when `current_enrollment` is 0.
#[allow(clippy::cast_precision_loss)]
pub fn minimum_rentability(
    variable_cost_per_student: f64,
    fixed_cost: f64,
    current_enrollment: u64,
) -> Result<RentabilityQuote> {
    if current_enrollment == 0 {
        return Err(BreakEvenError::degenerate(
            "minimum-rentability tuition needs a current enrollment above zero",
        ));
    }
    let tuition =
        (variable_cost_per_student + fixed_cost / current_enrollment as f64).ceil();
    let break_even = break_even_count(fixed_cost, tuition, variable_cost_per_student)?;
    Ok(RentabilityQuote {
        tuition,
        break_even,
    })
}

/// Compute break-even enrollment, applying the repairs the caller allows.
///
/// # Errors
/// Returns [`BreakEvenError::NonViableMargin`] when the margin is not positive
/// and `directives.repair_margin` is false, and
/// [`BreakEvenError::DegenerateInput`] for invalid amounts.
pub fn solve(inputs: &BreakEvenInputs, directives: SolveDirectives) -> Result<BreakEvenSolution> {
    let variable_cost_per_student =
        ensure_amount("variable cost per student", inputs.variable_cost_per_student)?;
    let fixed_cost = ensure_amount("fixed cost", inputs.fixed_cost)?;
    let mut tuition = ensure_amount("tuition", inputs.tuition)?;
    let mut repairs = Vec::new();

    if let Err(err) = check_margin(tuition, variable_cost_per_student) {
        if !directives.repair_margin {
            crate::debug!("Solver halted: {err}");
            return Err(err);
        }
        let repaired = repair_margin(tuition, variable_cost_per_student);
        crate::info!("Margin repair: tuition ${tuition:.2} -> ${repaired:.2}");
        repairs.push(Repair::Margin {
            previous_tuition: tuition,
            tuition: repaired,
        });
        tuition = repaired;
    }

    let mut break_even = break_even_count(fixed_cost, tuition, variable_cost_per_student)?;
    crate::debug!("Break-even at ${tuition:.2}: {break_even} students");

    let mut advisories = Vec::new();
    if break_even > inputs.capacity {
        advisories.push(Advisory::ExceedsCapacity {
            break_even,
            capacity: inputs.capacity,
        });
    }
    if break_even > inputs.current_enrollment {
        advisories.push(Advisory::BelowCurrentEnrollment {
            break_even,
            current_enrollment: inputs.current_enrollment,
        });

        if directives.recalculate_for_rentability && inputs.current_enrollment > 0 {
            let quote = minimum_rentability(
                variable_cost_per_student,
                fixed_cost,
                inputs.current_enrollment,
            )?;
            crate::info!(
                "Minimum-rentability recalculation: tuition ${tuition:.2} -> ${:.2}, break-even {} students",
                quote.tuition,
                quote.break_even
            );
            repairs.push(Repair::MinimumRentability {
                previous_tuition: tuition,
                tuition: quote.tuition,
                break_even: quote.break_even,
            });
            tuition = quote.tuition;
            break_even = quote.break_even;
        }
    }

    Ok(BreakEvenSolution {
        tuition,
        break_even,
        capacity: inputs.capacity,
        current_enrollment: inputs.current_enrollment,
        advisories,
        repairs,
    })
}

/// Revenue and cost for every enrollment from 1 to `capacity`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn profitability_curve(
    tuition: f64,
    variable_cost_per_student: f64,
    fixed_cost: f64,
    capacity: u64,
) -> Vec<CurvePoint> {
    (1..=capacity)
        .map(|students| {
            let n = students as f64;
            CurvePoint {
                students,
                revenue: n * tuition,
                cost: fixed_cost + n * variable_cost_per_student,
            }
        })
        .collect()
}
