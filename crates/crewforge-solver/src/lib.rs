//! CrewForge Planning Engine
//!
//! This crate turns an ingested habitat snapshot into a worker plan:
//! - Planner and planning outcome
//! - Phases (greedy construction, swap balancing, equipment allocation)
//! - Adjustment suggestions and JSON export
//! - Performance history and adaptive tuning
//! - Event system for monitoring

pub mod event;
pub mod export;
pub mod phase;
pub mod planner;
pub mod scope;
pub mod stats;
pub mod suggestions;
pub mod tuning;

pub use event::{
    CountingEventListener, LoggingEventListener, PlanEventListener, PlanEventSupport,
};
pub use export::{
    PerformanceSnapshot, PerformanceSummary, PlanReport, StationReport, StationTimes,
    WorkerReport,
};
pub use phase::{
    balancing::{BalanceOutcome, SwapLog, SwapReason, SwapRecord},
    equipment::{BindingKind, BindingRecord, ClassTargets},
    BalancingPhase, ConstructionPhase, EquipmentPhase, Phase,
};
pub use planner::{Improvement, Planner, PlanningOutcome, ThroughputSnapshots};
pub use scope::PlanningScope;
pub use stats::{PhaseStats, PhaseSummary, PlanStats};
pub use suggestions::{suggest_adjustments, AdjustmentStatus, Suggestion};
pub use tuning::{
    AdaptiveTuner, Adjustments, CycleRecord, HistorySummary, PerformanceAnalysis,
    PerformanceHistory, TuningIssue, TuningReport,
};
