//! Shared test fixtures for CrewForge crates.
//!
//! This crate provides builders and canned data for testing. It depends only
//! on `crewforge-core`, so every other crate can take it as a dev-dependency.
//!
//! - [`catalog`] - Small catalogs with round numbers
//! - [`worker`] - Worker builders
//! - [`plan`] - Assignment plan builder
//! - [`snapshot`] - Snapshot builder for end-to-end runs
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! crewforge-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use crewforge_core::StationType;
//! use crewforge_test::{three_skill_catalog, PlanBuilder, WorkerBuilder};
//!
//! let plan = PlanBuilder::new(three_skill_catalog(1))
//!     .station(StationType::Geothermal)
//!     .worker(WorkerBuilder::new(1).strength(10).build())
//!     .assign(0, 0)
//!     .build();
//! assert_eq!(plan.station_total(0), 10.0);
//! ```

pub mod catalog;
pub mod plan;
pub mod snapshot;
pub mod worker;

pub use catalog::{three_skill_catalog, TEST_POOL};
pub use plan::{item, restricted_item, PlanBuilder};
pub use snapshot::SnapshotBuilder;
pub use worker::{spa, WorkerBuilder};
