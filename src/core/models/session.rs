//! Analysis session state

use super::{Ledger, ProgramRecord};
use crate::core::error::{BreakEvenError, Result};
use crate::core::projection::{project_ledger, LedgerProjection, ProjectionParams};
use crate::core::scenario::{simulate_ledger, ScenarioSweep, SimulationPoint};

/// Explicit application state for one analysis session.
///
/// Owns the ledger, tracks whether an analysis has completed and whether a
/// reset is awaiting confirmation, and caches the last aggregate simulation
/// and projection views until the ledger changes.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    ledger: Ledger,
    analysis_completed: bool,
    pending_reset: bool,
    simulation: Option<(ScenarioSweep, Vec<SimulationPoint>)>,
    projection: Option<LedgerProjection>,
}

impl AnalysisSession {
    /// Fresh session with an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs recorded so far
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Whether at least one analysis has completed since the last reset
    #[must_use]
    pub const fn analysis_completed(&self) -> bool {
        self.analysis_completed
    }

    /// Append a completed analysis. Cached views are dropped.
    pub fn record(&mut self, record: ProgramRecord) {
        self.ledger.append(record);
        self.analysis_completed = true;
        self.invalidate_views();
    }

    /// Aggregate scenario sweep over the ledger, reused while the ledger and
    /// sweep are unchanged
    pub fn simulation(&mut self, sweep: ScenarioSweep) -> &[SimulationPoint] {
        if !matches!(&self.simulation, Some((cached, _)) if *cached == sweep) {
            self.simulation = Some((sweep, simulate_ledger(&self.ledger, &sweep)));
        }
        match &self.simulation {
            Some((_, points)) => points.as_slice(),
            None => &[],
        }
    }

    /// Aggregate projection over the ledger, reused while the ledger and
    /// parameters are unchanged
    ///
    /// # Errors
    /// Propagates projection input errors.
    pub fn projection(&mut self, params: ProjectionParams) -> Result<&LedgerProjection> {
        if !matches!(&self.projection, Some(cached) if cached.params == params) {
            self.projection = Some(project_ledger(&self.ledger, &params)?);
        }
        self.projection
            .as_ref()
            .ok_or_else(|| BreakEvenError::degenerate("projection cache is empty"))
    }

    /// Whether a simulation or projection is cached
    #[must_use]
    pub const fn has_cached_views(&self) -> bool {
        self.simulation.is_some() || self.projection.is_some()
    }

    /// Ask for a reset; nothing is cleared until [`Self::confirm_reset`]
    pub fn request_reset(&mut self) {
        self.pending_reset = true;
    }

    /// Whether a reset awaits confirmation
    #[must_use]
    pub const fn is_reset_pending(&self) -> bool {
        self.pending_reset
    }

    /// Clear the ledger and cached views if a reset was requested.
    /// Returns whether anything was reset.
    pub fn confirm_reset(&mut self) -> bool {
        if !self.pending_reset {
            return false;
        }
        crate::info!("Session reset: {} records cleared", self.ledger.len());
        self.ledger.clear();
        self.analysis_completed = false;
        self.pending_reset = false;
        self.invalidate_views();
        true
    }

    /// Drop a pending reset request
    pub fn cancel_reset(&mut self) {
        self.pending_reset = false;
    }

    fn invalidate_views(&mut self) {
        self.simulation = None;
        self.projection = None;
    }
}
