//! Event system for planning progress.
//!
//! Listeners registered on the planner are notified, synchronously and in
//! registration order, about:
//!
//! - **Run events**: planning started, planning ended
//! - **Phase events**: phase started, phase ended
//! - **Decision events**: swap committed, equipment bound or relocated
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use crewforge_solver::event::{PlanEventListener, PlanEventSupport};
//! use crewforge_solver::SwapRecord;
//!
//! #[derive(Debug)]
//! struct SwapPrinter;
//! impl PlanEventListener for SwapPrinter {
//!     fn on_swap_committed(&self, swap: &SwapRecord) {
//!         println!("{} <-> {}", swap.worker_a, swap.worker_b);
//!     }
//! }
//!
//! let mut support = PlanEventSupport::new();
//! support.add_listener(Arc::new(SwapPrinter));
//! assert_eq!(support.listener_count(), 1);
//! ```

use std::fmt::Debug;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crewforge_core::AssignmentPlan;
use tracing::info;

use crate::phase::balancing::SwapRecord;
use crate::phase::equipment::{BindingKind, BindingRecord};

/// Listener for planning events. Every method has an empty default.
pub trait PlanEventListener: Send + Sync + Debug {
    /// Called once the baseline plan is ingested.
    fn on_planning_started(&self, _plan: &AssignmentPlan) {}

    /// Called with the final plan.
    fn on_planning_ended(&self, _plan: &AssignmentPlan) {}

    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {}

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {}

    /// Called after a balancing swap is applied to the plan.
    fn on_swap_committed(&self, _swap: &SwapRecord) {}

    /// Called after an item is bound, whether relocated or newly allocated.
    fn on_equipment_bound(&self, _binding: &BindingRecord) {}
}

/// Central event broadcaster.
pub struct PlanEventSupport {
    listeners: Vec<Arc<dyn PlanEventListener>>,
}

impl PlanEventSupport {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Arc<dyn PlanEventListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn fire_planning_started(&self, plan: &AssignmentPlan) {
        for listener in &self.listeners {
            listener.on_planning_started(plan);
        }
    }

    pub fn fire_planning_ended(&self, plan: &AssignmentPlan) {
        for listener in &self.listeners {
            listener.on_planning_ended(plan);
        }
    }

    pub fn fire_phase_started(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.listeners {
            listener.on_phase_started(phase_index, phase_type);
        }
    }

    pub fn fire_phase_ended(&self, phase_index: usize, phase_type: &str) {
        for listener in &self.listeners {
            listener.on_phase_ended(phase_index, phase_type);
        }
    }

    pub fn fire_swap_committed(&self, swap: &SwapRecord) {
        for listener in &self.listeners {
            listener.on_swap_committed(swap);
        }
    }

    pub fn fire_equipment_bound(&self, binding: &BindingRecord) {
        for listener in &self.listeners {
            listener.on_equipment_bound(binding);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }
}

impl Default for PlanEventSupport {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for PlanEventSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// A listener that re-emits events through `tracing` at INFO.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventListener {
    prefix: String,
}

impl LoggingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl PlanEventListener for LoggingEventListener {
    fn on_planning_started(&self, plan: &AssignmentPlan) {
        info!(
            "{}[Event] Planning started: {} workers, {} stations, {} items",
            self.prefix,
            plan.worker_count(),
            plan.station_count(),
            plan.item_count()
        );
    }

    fn on_planning_ended(&self, plan: &AssignmentPlan) {
        info!(
            "{}[Event] Planning ended: {} workers unassigned",
            self.prefix,
            plan.unassigned_workers().len()
        );
    }

    fn on_phase_started(&self, phase_index: usize, phase_type: &str) {
        info!("{}[Event] Phase {} ({}) started", self.prefix, phase_index, phase_type);
    }

    fn on_phase_ended(&self, phase_index: usize, phase_type: &str) {
        info!("{}[Event] Phase {} ({}) ended", self.prefix, phase_index, phase_type);
    }

    fn on_swap_committed(&self, swap: &SwapRecord) {
        info!(
            "{}[Event] Pass {}: swapped {} ({}) with {} ({})",
            self.prefix, swap.pass, swap.worker_a, swap.station_a, swap.worker_b, swap.station_b
        );
    }

    fn on_equipment_bound(&self, binding: &BindingRecord) {
        let verb = match binding.kind {
            BindingKind::Relocated => "moved",
            BindingKind::Allocated | BindingKind::Leftover => "gave",
        };
        info!(
            "{}[Event] {} {} to {} in {}",
            self.prefix, verb, binding.item, binding.worker, binding.station
        );
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    planning_started_count: AtomicUsize,
    planning_ended_count: AtomicUsize,
    phase_started_count: AtomicUsize,
    phase_ended_count: AtomicUsize,
    swap_count: AtomicUsize,
    binding_count: AtomicUsize,
    relocation_count: AtomicUsize,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planning_started_count(&self) -> usize {
        self.planning_started_count.load(Ordering::SeqCst)
    }

    pub fn planning_ended_count(&self) -> usize {
        self.planning_ended_count.load(Ordering::SeqCst)
    }

    pub fn phase_started_count(&self) -> usize {
        self.phase_started_count.load(Ordering::SeqCst)
    }

    pub fn phase_ended_count(&self) -> usize {
        self.phase_ended_count.load(Ordering::SeqCst)
    }

    pub fn swap_count(&self) -> usize {
        self.swap_count.load(Ordering::SeqCst)
    }

    /// Bindings of every kind, relocations included.
    pub fn binding_count(&self) -> usize {
        self.binding_count.load(Ordering::SeqCst)
    }

    pub fn relocation_count(&self) -> usize {
        self.relocation_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        self.planning_started_count.store(0, Ordering::SeqCst);
        self.planning_ended_count.store(0, Ordering::SeqCst);
        self.phase_started_count.store(0, Ordering::SeqCst);
        self.phase_ended_count.store(0, Ordering::SeqCst);
        self.swap_count.store(0, Ordering::SeqCst);
        self.binding_count.store(0, Ordering::SeqCst);
        self.relocation_count.store(0, Ordering::SeqCst);
    }
}

impl PlanEventListener for CountingEventListener {
    fn on_planning_started(&self, _plan: &AssignmentPlan) {
        self.planning_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_planning_ended(&self, _plan: &AssignmentPlan) {
        self.planning_ended_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_started(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_phase_ended(&self, _phase_index: usize, _phase_type: &str) {
        self.phase_ended_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_swap_committed(&self, _swap: &SwapRecord) {
        self.swap_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_equipment_bound(&self, binding: &BindingRecord) {
        self.binding_count.fetch_add(1, Ordering::SeqCst);
        if binding.kind == BindingKind::Relocated {
            self.relocation_count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
