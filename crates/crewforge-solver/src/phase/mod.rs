//! Planning phases.
//!
//! Phases run in a fixed order on one [`PlanningScope`]:
//! - [`ConstructionPhase`]: greedy placement in ranked rounds
//! - [`BalancingPhase`]: bounded swap passes toward class means
//! - [`EquipmentPhase`]: relocation and strategy-driven item allocation

pub mod balancing;
pub mod construction;
pub mod equipment;

use std::fmt::Debug;

use crewforge_core::Result;

use crate::scope::PlanningScope;

pub use balancing::BalancingPhase;
pub use construction::ConstructionPhase;
pub use equipment::EquipmentPhase;

/// A phase of the planning process.
///
/// Each phase reads and mutates the working plan held by the scope and
/// appends its own records (swaps, bindings) to it.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    ///
    /// Errors are reserved for broken plan invariants; degraded input is
    /// reported through the scope's diagnostics instead.
    fn solve(&mut self, scope: &mut PlanningScope<'_>) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
