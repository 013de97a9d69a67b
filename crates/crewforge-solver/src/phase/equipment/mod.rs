//! Equipment phase.
//!
//! Runs after balancing, against class targets frozen from the balanced
//! table:
//!
//! 1. worn items that help nobody where they are get relocated,
//! 2. the outfit strategy hands free items to producing stations,
//! 3. whatever is left goes to the highest-value stations.
//!
//! A worker holds at most one item and an item is bound at most once. Items
//! are only given to workers whose tag they accept.

mod deficit;
mod relocation;
mod strategy;

use crewforge_config::{OutfitStrategy, PlannerConfig};
use crewforge_core::{EquipmentId, Result, StationKey, WorkerId};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::phase::Phase;
use crate::scope::PlanningScope;
use crate::stats::PhaseStats;

pub use deficit::ClassTargets;
pub use relocation::{is_misplaced, relocate_misplaced};
pub use strategy::{
    by_value, candidate_items, pick_item, station_order, unequipped_members, Pick, StrategyParams,
};

#[cfg(test)]
mod tests;

const EPSILON: f64 = 1e-9;

/// How an item reached its wearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingKind {
    /// Moved from a worker it did not help.
    Relocated,
    /// Handed out by the outfit strategy.
    Allocated,
    /// Handed out from leftover inventory.
    Leftover,
}

impl BindingKind {
    pub fn name(self) -> &'static str {
        match self {
            BindingKind::Relocated => "relocated",
            BindingKind::Allocated => "allocated",
            BindingKind::Leftover => "leftover",
        }
    }
}

/// One item bound to a worker during the phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingRecord {
    pub item: EquipmentId,
    pub worker: WorkerId,
    pub station: StationKey,
    /// Previous holder, for relocations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_worker: Option<WorkerId>,
    pub kind: BindingKind,
    /// Bonus toward the station's requirement.
    pub bonus: f64,
}

/// Relocation, strategy allocation and leftover distribution.
#[derive(Debug, Clone)]
pub struct EquipmentPhase {
    params: StrategyParams,
}

impl EquipmentPhase {
    pub fn new(strategy: OutfitStrategy) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            params: StrategyParams {
                strategy,
                hybrid_weight: defaults.hybrid_deficit_weight,
                efficiency_floor: defaults.efficiency_floor,
            },
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            params: StrategyParams {
                strategy: config.outfit_strategy,
                hybrid_weight: config.hybrid_deficit_weight,
                efficiency_floor: config.efficiency_floor,
            },
        }
    }

    pub fn strategy(&self) -> OutfitStrategy {
        self.params.strategy
    }

    /// Binds `item` to `worker` and records it.
    fn bind(
        &self,
        scope: &mut PlanningScope<'_>,
        phase: &mut PhaseStats,
        item: usize,
        worker: usize,
        station: usize,
        kind: BindingKind,
    ) -> Result<()> {
        scope.plan_mut().bind_item(item, worker)?;
        let plan = scope.plan();
        let equipment = &plan.item(item).equipment;
        let record = BindingRecord {
            item: equipment.id.clone(),
            worker: plan.worker(worker).id,
            station: plan.station(station).key,
            from_worker: None,
            kind,
            bonus: equipment.bonus_for(&plan.station(station).requirement),
        };
        debug!(
            event = "equipment_bound",
            item = %record.item,
            worker = %record.worker,
            station = %record.station,
            kind = kind.name(),
            bonus = record.bonus,
        );
        phase.record_step();
        phase.record_move(true);
        scope.record_binding(record);
        Ok(())
    }

    /// Strategy pass. Returns true if some worker found no usable item.
    fn allocate(
        &self,
        scope: &mut PlanningScope<'_>,
        phase: &mut PhaseStats,
        targets: &ClassTargets,
    ) -> Result<bool> {
        let morale = scope.morale();
        let order = station_order(scope.plan(), targets, morale, &self.params);
        debug!(
            event = "station_order",
            strategy = self.params.strategy.name(),
            stations = order.len(),
        );

        let mut exhausted = false;
        for station in order {
            let requirement = scope.plan().station(station).requirement;
            for worker in unequipped_members(scope.plan(), station) {
                if self.params.strategy == OutfitStrategy::DeficitFirst
                    && targets
                        .deficit(scope.plan(), station, morale)
                        .map_or(true, |d| d <= EPSILON)
                {
                    break;
                }
                let candidates = candidate_items(scope.plan(), worker, &requirement);
                phase.record_move(false);
                if candidates.is_empty() {
                    exhausted = true;
                    continue;
                }
                match pick_item(scope.plan(), &candidates, &requirement, &self.params) {
                    Some(Pick::Item(item)) => {
                        self.bind(scope, phase, item, worker, station, BindingKind::Allocated)?
                    }
                    Some(Pick::BelowFloor) => break,
                    None => {}
                }
            }
        }
        Ok(exhausted)
    }

    /// Gives remaining items to the highest-value stations regardless of
    /// deficit.
    fn distribute_leftovers(&self, scope: &mut PlanningScope<'_>, phase: &mut PhaseStats) -> Result<()> {
        let producing = (0..scope.plan().station_count())
            .filter(|s| scope.plan().station(*s).is_production())
            .collect();
        for station in by_value(scope.plan(), producing) {
            if scope.plan().free_items().is_empty() {
                return Ok(());
            }
            let requirement = scope.plan().station(station).requirement;
            for worker in unequipped_members(scope.plan(), station) {
                let plan = scope.plan();
                let best = candidate_items(plan, worker, &requirement)
                    .into_iter()
                    .map(|i| {
                        let equipment = &plan.item(i).equipment;
                        (i, equipment.bonus_for(&requirement), equipment.total_bonus())
                    })
                    .fold(None, |best: Option<(usize, f64, u32)>, c| match best {
                        Some(b) if b.1 > c.1 + EPSILON || ((b.1 - c.1).abs() <= EPSILON && b.2 >= c.2) => {
                            best
                        }
                        _ => Some(c),
                    });
                if let Some((item, _, _)) = best {
                    self.bind(scope, phase, item, worker, station, BindingKind::Leftover)?;
                }
            }
        }
        Ok(())
    }
}

impl Default for EquipmentPhase {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl Phase for EquipmentPhase {
    fn solve(&mut self, scope: &mut PlanningScope<'_>) -> Result<()> {
        let mut phase = scope.start_phase(self.phase_type_name());
        let morale = scope.morale();
        let targets = ClassTargets::from_table(&scope.throughput());

        let relocations = relocate_misplaced(scope.plan_mut(), &targets, morale)?;
        let relocated = relocations.len();
        for record in relocations {
            debug!(
                event = "equipment_relocated",
                item = %record.item,
                to = %record.worker,
                station = %record.station,
            );
            phase.record_step();
            phase.record_move(true);
            scope.record_binding(record);
        }

        let stocked = !scope.plan().free_items().is_empty();
        let exhausted = self.allocate(scope, &mut phase, &targets)? && stocked;
        let allocated = scope.bindings().len() - relocated;
        self.distribute_leftovers(scope, &mut phase)?;
        let leftover = scope.bindings().len() - relocated - allocated;

        let unused = scope.plan().free_items().len();
        if exhausted {
            warn!(
                event = "inventory_exhausted",
                strategy = self.params.strategy.name(),
                "ran out of compatible items before every station was outfitted"
            );
        }
        let diagnostics = scope.diagnostics_mut();
        diagnostics.inventory_exhausted = exhausted;
        diagnostics.unused_items = unused;

        info!(
            event = "equipment_end",
            strategy = self.params.strategy.name(),
            relocated = relocated,
            allocated = allocated,
            leftover = leftover,
            unused = unused,
        );
        scope.end_phase(phase);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Equipment"
    }
}
