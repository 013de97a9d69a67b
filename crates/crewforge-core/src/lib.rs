//! CrewForge Core - Domain model for habitat crew planning
//!
//! This crate provides the fundamental types for CrewForge:
//! - Skills, skill vectors and station skill requirements
//! - The station catalog (classes, pools, footprints)
//! - Workers, stations and equipment
//! - The [`AssignmentPlan`] aggregate with its invariants
//! - The pure throughput model
//! - Snapshot input records and ingestion

pub mod catalog;
pub mod diagnostics;
pub mod equipment;
pub mod error;
pub mod plan;
pub mod skill;
pub mod snapshot;
pub mod station;
pub mod throughput;
pub mod worker;

#[cfg(test)]
mod catalog_tests;
#[cfg(test)]
mod test_utils;

pub use catalog::{
    Catalog, ClassSpec, Footprint, FootprintSpec, FootprintTable, ResolvedStation, StationClass,
    StationSpec, StationType,
};
pub use diagnostics::PlanDiagnostics;
pub use equipment::{Compatibility, Equipment, EquipmentId, ItemInstance, ItemOrigin};
pub use error::{CrewForgeError, Result};
pub use plan::AssignmentPlan;
pub use skill::{Skill, SkillRequirement, SkillVector};
pub use snapshot::{
    EquipmentRecord, IngestedSnapshot, SkillEntry, Snapshot, StationRecord, WorkerRecord,
};
pub use station::{Members, Station, StationKey};
pub use throughput::{
    ideal_total, round1, throughput, time_for_total, MoraleFactor, ThroughputTable, MIN_TIME,
};
pub use worker::{Worker, WorkerId};
