//! Planning scope.
//!
//! [`PlanningScope`] is the state every phase works on: the working
//! [`AssignmentPlan`], the configuration and morale it is planned under, and
//! the records phases append as they go (swap log, equipment bindings,
//! diagnostics, statistics). Phases bracket their work with
//! [`PlanningScope::start_phase`] and [`PlanningScope::end_phase`], which emit
//! the `phase_start` / `phase_end` tracing events and notify listeners.

use crewforge_config::PlannerConfig;
use crewforge_core::{AssignmentPlan, MoraleFactor, PlanDiagnostics, ThroughputTable};
use tracing::info;

use crate::event::PlanEventSupport;
use crate::phase::balancing::{BalanceOutcome, SwapLog, SwapRecord};
use crate::phase::equipment::BindingRecord;
use crate::stats::{PhaseStats, PhaseSummary, PlanStats};


/// Working state of one planning run.
#[derive(Debug)]
pub struct PlanningScope<'a> {
    plan: AssignmentPlan,
    config: &'a PlannerConfig,
    events: &'a PlanEventSupport,
    morale: MoraleFactor,
    swap_log: SwapLog,
    bindings: Vec<BindingRecord>,
    diagnostics: PlanDiagnostics,
    stats: PlanStats,
    phase_summaries: Vec<PhaseSummary>,
    balance_outcome: Option<BalanceOutcome>,
    next_phase_index: usize,
}

/// Everything a finished scope hands back to its owner.
#[derive(Debug)]
pub struct ScopeParts {
    pub plan: AssignmentPlan,
    pub swap_log: SwapLog,
    pub bindings: Vec<BindingRecord>,
    pub diagnostics: PlanDiagnostics,
    pub stats: PlanStats,
    pub phase_summaries: Vec<PhaseSummary>,
    pub balance_outcome: Option<BalanceOutcome>,
}

impl<'a> PlanningScope<'a> {
    pub fn new(
        plan: AssignmentPlan,
        config: &'a PlannerConfig,
        events: &'a PlanEventSupport,
        morale: MoraleFactor,
    ) -> Self {
        let mut stats = PlanStats::default();
        stats.start();
        Self {
            plan,
            config,
            events,
            morale,
            swap_log: SwapLog::new(),
            bindings: Vec::new(),
            diagnostics: PlanDiagnostics::default(),
            stats,
            phase_summaries: Vec::new(),
            balance_outcome: None,
            next_phase_index: 0,
        }
    }

    /// Carries diagnostics gathered before planning (ingestion counters).
    pub fn with_diagnostics(mut self, diagnostics: PlanDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn plan(&self) -> &AssignmentPlan {
        &self.plan
    }

    pub fn plan_mut(&mut self) -> &mut AssignmentPlan {
        &mut self.plan
    }

    pub fn config(&self) -> &'a PlannerConfig {
        self.config
    }

    pub fn events(&self) -> &'a PlanEventSupport {
        self.events
    }

    pub fn morale(&self) -> MoraleFactor {
        self.morale
    }

    /// Recomputes the throughput table of the working plan.
    pub fn throughput(&mut self) -> ThroughputTable {
        self.stats.record_throughput_evaluation();
        self.plan.throughput(self.morale)
    }

    pub fn swap_log(&self) -> &SwapLog {
        &self.swap_log
    }

    /// Appends a committed swap and notifies listeners.
    pub fn record_swap(&mut self, swap: SwapRecord) {
        self.events.fire_swap_committed(&swap);
        self.swap_log.push(swap);
    }

    pub fn bindings(&self) -> &[BindingRecord] {
        &self.bindings
    }

    /// Appends an equipment binding and notifies listeners.
    pub fn record_binding(&mut self, binding: BindingRecord) {
        self.events.fire_equipment_bound(&binding);
        self.bindings.push(binding);
    }

    pub fn diagnostics(&self) -> &PlanDiagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut PlanDiagnostics {
        &mut self.diagnostics
    }

    pub fn stats(&self) -> &PlanStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut PlanStats {
        &mut self.stats
    }

    pub fn phase_summaries(&self) -> &[PhaseSummary] {
        &self.phase_summaries
    }

    pub fn balance_outcome(&self) -> Option<BalanceOutcome> {
        self.balance_outcome
    }

    pub fn set_balance_outcome(&mut self, outcome: BalanceOutcome) {
        self.balance_outcome = Some(outcome);
    }

    /// Opens a phase: assigns its index, logs and notifies.
    pub fn start_phase(&mut self, phase_type: &'static str) -> PhaseStats {
        let phase_index = self.next_phase_index;
        self.next_phase_index += 1;
        info!(
            event = "phase_start",
            phase = phase_type,
            phase_index = phase_index,
        );
        self.events.fire_phase_started(phase_index, phase_type);
        PhaseStats::new(phase_index, phase_type)
    }

    /// Closes a phase opened with [`start_phase`](Self::start_phase).
    pub fn end_phase(&mut self, phase: PhaseStats) {
        let summary = phase.summary();
        self.stats.absorb(&summary);
        info!(
            event = "phase_end",
            phase = summary.phase_type,
            phase_index = summary.phase_index,
            duration_ms = summary.duration_ms,
            steps = summary.steps,
            moves_evaluated = summary.moves_evaluated,
            moves_accepted = summary.moves_accepted,
        );
        self.events
            .fire_phase_ended(summary.phase_index, summary.phase_type);
        self.phase_summaries.push(summary);
    }

    pub fn into_parts(self) -> ScopeParts {
        ScopeParts {
            plan: self.plan,
            swap_log: self.swap_log,
            bindings: self.bindings,
            diagnostics: self.diagnostics,
            stats: self.stats,
            phase_summaries: self.phase_summaries,
            balance_outcome: self.balance_outcome,
        }
    }
}
