//! CrewForge - Habitat Crew Planning in Rust
//!
//! One call from a habitat snapshot to a balanced, equipped worker plan.
//!
//! # Example
//!
//! ```rust
//! use crewforge::prelude::*;
//!
//! let snapshot = Snapshot {
//!     workers: vec![WorkerRecord {
//!         id: 1,
//!         name: Some("Ada".to_string()),
//!         skills: [("Strength".to_string(), SkillEntry::new(10))].into(),
//!         tag: None,
//!         equipped: None,
//!     }],
//!     stations: vec![StationRecord {
//!         station_type: "Geothermal".to_string(),
//!         level: 1,
//!         footprint: Footprint::Single,
//!         ordinal: None,
//!         occupants: vec![],
//!     }],
//!     ..Snapshot::default()
//! };
//!
//! let outcome = plan_habitat(&snapshot, &PlannerConfig::default()).unwrap();
//! assert!(outcome.plan.unassigned_workers().is_empty());
//! assert!(outcome.report().to_json().is_ok());
//! ```

// Domain model
pub use crewforge_core::{
    AssignmentPlan, Catalog, CrewForgeError, Equipment, EquipmentRecord, Footprint, MoraleFactor,
    PlanDiagnostics, Result, Skill, SkillEntry, Snapshot, StationClass, StationKey,
    StationRecord, StationType, ThroughputTable, WorkerId, WorkerRecord,
};

// Configuration
pub use crewforge_config::{
    ConfigError, OutfitStrategy, PlannerConfig, ReferenceBaseline, TuningConfig,
};

// Planning engine
pub use crewforge_solver::{
    AdaptiveTuner, AdjustmentStatus, BalanceOutcome, BindingKind, BindingRecord,
    CountingEventListener, CycleRecord, Improvement, LoggingEventListener, PerformanceHistory,
    PlanEventListener, PlanReport, Planner, PlanningOutcome, Suggestion, SwapRecord,
    TuningReport,
};

#[cfg(feature = "console")]
pub mod console;

/// Plans a snapshot under `config`.
///
/// Installs the console output first when the `console` feature is enabled.
///
/// # Errors
///
/// [`CrewForgeError::Config`] for an invalid configuration and
/// [`CrewForgeError::MissingCatalogEntry`] for a station type the catalog
/// does not describe.
pub fn plan_habitat(snapshot: &Snapshot, config: &PlannerConfig) -> Result<PlanningOutcome> {
    #[cfg(feature = "console")]
    console::init();

    Planner::new(config.clone()).plan(snapshot)
}

pub mod prelude {
    pub use super::plan_habitat;
    pub use super::{
        Footprint, PlannerConfig, ReferenceBaseline, Skill, SkillEntry, Snapshot, StationRecord,
        WorkerRecord,
    };
    pub use super::{OutfitStrategy, PlanReport, Planner, PlanningOutcome};
    pub use super::{AdaptiveTuner, CycleRecord, PerformanceHistory};
}
