//! Planner: runs the phases over one snapshot.
//!
//! A run ingests the snapshot, applies room priority overrides, and then
//! runs construction, balancing and equipment in that order on a single
//! [`PlanningScope`]. The throughput table is captured at four points:
//! the snapshot layout, the greedy plan, the balanced plan and the
//! equipped plan.

use std::sync::Arc;

use crewforge_config::{PlannerConfig, ReferenceBaseline};
use crewforge_core::{
    AssignmentPlan, CrewForgeError, IngestedSnapshot, MoraleFactor, PlanDiagnostics, Result,
    Snapshot, ThroughputTable,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::event::{PlanEventListener, PlanEventSupport};
use crate::phase::balancing::{BalanceOutcome, SwapLog};
use crate::phase::equipment::BindingRecord;
use crate::phase::{BalancingPhase, ConstructionPhase, EquipmentPhase, Phase};
use crate::scope::PlanningScope;
use crate::stats::{PhaseSummary, PlanStats};
use crate::suggestions::{suggest_adjustments, Suggestion};

#[cfg(test)]
#[path = "planner_tests.rs"]
mod tests;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Throughput tables captured during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputSnapshots {
    /// Layout as found in the snapshot.
    pub initial: ThroughputTable,
    /// After greedy construction.
    pub before_balancing: ThroughputTable,
    pub after_balancing: ThroughputTable,
    pub with_equipment: ThroughputTable,
}

/// Change of the overall average from a reference to the final plan.
///
/// Positive `seconds` means the final plan is faster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Improvement {
    pub reference: f64,
    pub final_time: f64,
    pub seconds: f64,
    pub percent: f64,
}

impl Improvement {
    /// Both deltas rounded to two decimals.
    ///
    /// ```
    /// use crewforge_solver::Improvement;
    ///
    /// let improvement = Improvement::between(20.0, 15.0);
    /// assert_eq!(improvement.seconds, 5.0);
    /// assert_eq!(improvement.percent, 25.0);
    /// ```
    pub fn between(reference: f64, final_time: f64) -> Self {
        let seconds = reference - final_time;
        let percent = if reference > 0.0 {
            seconds / reference * 100.0
        } else {
            0.0
        };
        Self {
            reference,
            final_time,
            seconds: round2(seconds),
            percent: round2(percent),
        }
    }
}

/// Everything a planning run produced.
#[derive(Debug)]
pub struct PlanningOutcome {
    pub plan: AssignmentPlan,
    pub morale: MoraleFactor,
    pub snapshots: ThroughputSnapshots,
    pub swap_log: SwapLog,
    pub bindings: Vec<BindingRecord>,
    pub balance_outcome: BalanceOutcome,
    pub diagnostics: PlanDiagnostics,
    pub stats: PlanStats,
    pub phase_summaries: Vec<PhaseSummary>,
    /// Baseline improvements are measured against, never `Auto`.
    pub reference: ReferenceBaseline,
}

impl PlanningOutcome {
    /// The table selected as reference.
    pub fn reference_table(&self) -> &ThroughputTable {
        match self.reference {
            ReferenceBaseline::Initial => &self.snapshots.initial,
            ReferenceBaseline::Auto | ReferenceBaseline::BeforeBalancing => {
                &self.snapshots.before_balancing
            }
        }
    }

    /// Final overall average against the reference, when both are defined.
    pub fn improvement(&self) -> Option<Improvement> {
        let reference = self.reference_table().overall()?;
        let final_time = self.snapshots.with_equipment.overall()?;
        Some(Improvement::between(reference, final_time))
    }

    /// Adjustment suggestions for the equipped plan.
    pub fn suggestions(&self) -> Vec<Suggestion> {
        suggest_adjustments(&self.plan, &self.snapshots.with_equipment, self.morale)
    }
}

/// Runs planning cycles under one configuration.
///
/// The planner holds no state between runs besides its configuration and
/// listeners.
///
/// # Example
///
/// ```
/// use crewforge_config::PlannerConfig;
/// use crewforge_core::Footprint;
/// use crewforge_solver::Planner;
/// use crewforge_test::SnapshotBuilder;
///
/// let snapshot = SnapshotBuilder::new()
///     .worker(1, 10, 1, 1)
///     .worker(2, 1, 10, 1)
///     .station("Geothermal", 1, Footprint::Single, &[])
///     .station("WaterPlant", 1, Footprint::Single, &[])
///     .build();
///
/// let outcome = Planner::new(PlannerConfig::default()).plan(&snapshot).unwrap();
/// assert_eq!(outcome.plan.unassigned_workers().len(), 0);
/// ```
#[derive(Debug, Default)]
pub struct Planner {
    config: PlannerConfig,
    events: PlanEventSupport,
}

impl Planner {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            config,
            events: PlanEventSupport::new(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn PlanEventListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    pub fn add_listener(&mut self, listener: Arc<dyn PlanEventListener>) {
        self.events.add_listener(listener);
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Ingests and plans a snapshot.
    ///
    /// # Errors
    ///
    /// [`CrewForgeError::Config`] for an invalid configuration, and the
    /// ingestion errors of [`Snapshot::ingest`].
    pub fn plan(&self, snapshot: &Snapshot) -> Result<PlanningOutcome> {
        self.config
            .validate()
            .map_err(|e| CrewForgeError::Config(e.to_string()))?;
        let catalog = self.config.catalog();
        let ingested = snapshot.ingest(&catalog)?;
        self.plan_ingested(ingested)
    }

    /// Plans an already ingested snapshot.
    pub fn plan_ingested(&self, ingested: IngestedSnapshot) -> Result<PlanningOutcome> {
        let reference = match self.config.reference_baseline {
            ReferenceBaseline::Auto if ingested.has_productive_baseline() => ReferenceBaseline::Initial,
            ReferenceBaseline::Auto => ReferenceBaseline::BeforeBalancing,
            explicit => explicit,
        };
        let IngestedSnapshot {
            mut plan,
            happiness,
            diagnostics,
        } = ingested;

        if diagnostics.malformed_defaults + diagnostics.unknown_worker_refs > 0
            || diagnostics.unknown_equipment_refs + diagnostics.duplicate_records > 0
            || diagnostics.over_capacity_baseline + diagnostics.incompatible_bindings > 0
        {
            warn!(
                event = "degraded_input",
                malformed_defaults = diagnostics.malformed_defaults,
                unknown_worker_refs = diagnostics.unknown_worker_refs,
                unknown_equipment_refs = diagnostics.unknown_equipment_refs,
                incompatible_bindings = diagnostics.incompatible_bindings,
                duplicate_records = diagnostics.duplicate_records,
                over_capacity_baseline = diagnostics.over_capacity_baseline,
                "snapshot had records that were defaulted or dropped"
            );
        }

        let priorities = self
            .config
            .resolved_room_priorities()
            .map_err(|e| CrewForgeError::Config(e.to_string()))?;
        for (station_type, priority) in priorities {
            plan.set_priority(station_type, priority);
        }

        let morale = MoraleFactor::from_happiness(happiness, self.config.morale_divisor);
        let initial = plan.throughput(morale);
        info!(
            event = "plan_start",
            workers = plan.worker_count(),
            stations = plan.station_count(),
            items = plan.item_count(),
            morale = morale.value(),
            reference = ?reference,
        );
        self.events.fire_planning_started(&plan);

        let mut scope =
            PlanningScope::new(plan, &self.config, &self.events, morale).with_diagnostics(diagnostics);

        ConstructionPhase::from_config(&self.config).solve(&mut scope)?;
        let before_balancing = scope.throughput();
        BalancingPhase::from_config(&self.config).solve(&mut scope)?;
        let after_balancing = scope.throughput();
        EquipmentPhase::from_config(&self.config).solve(&mut scope)?;
        let with_equipment = scope.throughput();

        let parts = scope.into_parts();
        let balance_outcome = parts.balance_outcome.ok_or_else(|| {
            CrewForgeError::InvalidState("balancing finished without an outcome".to_string())
        })?;
        self.events.fire_planning_ended(&parts.plan);

        let outcome = PlanningOutcome {
            plan: parts.plan,
            morale,
            snapshots: ThroughputSnapshots {
                initial,
                before_balancing,
                after_balancing,
                with_equipment,
            },
            swap_log: parts.swap_log,
            bindings: parts.bindings,
            balance_outcome,
            diagnostics: parts.diagnostics,
            stats: parts.stats,
            phase_summaries: parts.phase_summaries,
            reference,
        };
        info!(
            event = "plan_end",
            duration_ms = outcome.stats.elapsed().as_millis() as u64,
            overall_initial = ?outcome.snapshots.initial.overall(),
            overall_before = ?outcome.snapshots.before_balancing.overall(),
            overall_after = ?outcome.snapshots.after_balancing.overall(),
            overall_final = ?outcome.snapshots.with_equipment.overall(),
            swaps = outcome.swap_log.len(),
            bindings = outcome.bindings.len(),
            outcome = outcome.balance_outcome.name(),
        );
        Ok(outcome)
    }
}
