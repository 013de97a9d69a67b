//! Non-fatal planning conditions.

use serde::{Deserialize, Serialize};

use crate::catalog::StationClass;

/// Counters and flags for degraded but plannable input.
///
/// None of these abort a run; they are carried through to the exported
/// summary so callers can see what was defaulted or skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanDiagnostics {
    /// Skill entries that were missing or negative and read as zero.
    pub malformed_defaults: usize,
    /// Station occupants that named no known worker.
    pub unknown_worker_refs: usize,
    /// Equipped or inventory ids missing from the equipment catalog.
    pub unknown_equipment_refs: usize,
    /// Worn items whose wearer's tag they do not fit, released unbound.
    #[serde(default)]
    pub incompatible_bindings: usize,
    /// Repeated worker ids or occupants listed twice.
    pub duplicate_records: usize,
    /// Baseline occupants dropped because their station was full.
    pub over_capacity_baseline: usize,
    /// Production classes where no station could produce.
    pub infeasible_classes: Vec<StationClass>,
    /// Set when the equipment phase ran out of compatible items.
    pub inventory_exhausted: bool,
    /// Item instances still unbound after planning.
    pub unused_items: usize,
    /// Set when balancing stopped at the pass limit.
    pub best_effort: bool,
}

impl PlanDiagnostics {
    /// True when nothing was defaulted, dropped or left unresolved.
    pub fn is_clean(&self) -> bool {
        self.malformed_defaults == 0
            && self.unknown_worker_refs == 0
            && self.unknown_equipment_refs == 0
            && self.incompatible_bindings == 0
            && self.duplicate_records == 0
            && self.over_capacity_baseline == 0
            && self.infeasible_classes.is_empty()
            && !self.inventory_exhausted
            && !self.best_effort
    }
}
