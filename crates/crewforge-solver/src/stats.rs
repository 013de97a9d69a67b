//! Planning counters.
//!
//! A [`PhaseStats`] lives for one phase and is frozen into a [`PhaseSummary`]
//! when the scope closes it. The summary is then folded into the run's
//! [`PlanStats`].

use std::time::{Duration, Instant};

use serde::Serialize;

/// Counters for a whole planning run.
///
/// ```
/// use crewforge_solver::stats::{PhaseStats, PlanStats};
///
/// let mut construction = PhaseStats::new(0, "Construction");
/// construction.record_step();
/// construction.record_move(true);
/// let mut balancing = PhaseStats::new(1, "Balancing");
/// balancing.record_move(false);
///
/// let mut run = PlanStats::default();
/// run.absorb(&construction.summary());
/// run.absorb(&balancing.summary());
///
/// assert_eq!(run.step_count, 1);
/// assert_eq!(run.moves_evaluated, 2);
/// assert_eq!(run.moves_accepted, 1);
/// ```
#[derive(Debug, Default)]
pub struct PlanStats {
    started: Option<Instant>,
    /// Seats filled, swaps committed and items bound.
    pub step_count: u64,
    /// Candidate seats, swaps and items looked at.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    /// Throughput tables built from the working plan.
    pub throughput_evaluations: u64,
}

impl PlanStats {
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Zero until [`start`](Self::start) is called.
    pub fn elapsed(&self) -> Duration {
        self.started.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn record_throughput_evaluation(&mut self) {
        self.throughput_evaluations += 1;
    }

    /// Adds a closed phase's counters to the run totals.
    pub fn absorb(&mut self, phase: &PhaseSummary) {
        self.step_count += phase.steps;
        self.moves_evaluated += phase.moves_evaluated;
        self.moves_accepted += phase.moves_accepted;
    }
}

/// Live counters of the phase currently running.
#[derive(Debug)]
pub struct PhaseStats {
    pub phase_index: usize,
    pub phase_type: &'static str,
    opened: Instant,
    pub step_count: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
}

impl PhaseStats {
    pub fn new(phase_index: usize, phase_type: &'static str) -> Self {
        Self {
            phase_index,
            phase_type,
            opened: Instant::now(),
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
        }
    }

    pub fn record_step(&mut self) {
        self.step_count += 1;
    }

    /// Counts a considered candidate; `accepted` when it was committed.
    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        self.moves_accepted += u64::from(accepted);
    }

    pub fn summary(&self) -> PhaseSummary {
        PhaseSummary {
            phase_index: self.phase_index,
            phase_type: self.phase_type,
            duration_ms: u64::try_from(self.opened.elapsed().as_millis()).unwrap_or(u64::MAX),
            steps: self.step_count,
            moves_evaluated: self.moves_evaluated,
            moves_accepted: self.moves_accepted,
        }
    }
}

/// One row of the exported phase breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSummary {
    pub phase_index: usize,
    pub phase_type: &'static str,
    pub duration_ms: u64,
    pub steps: u64,
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
}
