//! Error types for CrewForge

use thiserror::Error;

use crate::catalog::StationType;

/// Main error type for CrewForge operations.
///
/// Only conditions that make a planning run impossible end up here. Degraded
/// but plannable input is reported through
/// [`PlanDiagnostics`](crate::diagnostics::PlanDiagnostics) instead.
#[derive(Debug, Error)]
pub enum CrewForgeError {
    /// A station type present in the snapshot has no catalog entry
    #[error("Missing catalog entry for station type '{station_type}'")]
    MissingCatalogEntry { station_type: String },

    /// A station type resolves to a class the catalog does not describe
    #[error("Station type {station_type} belongs to class {class} which has no catalog entry")]
    MissingClassEntry { station_type: StationType, class: String },

    /// Two snapshot records claim the same station identity
    #[error("Duplicate station {0}")]
    DuplicateStation(String),

    /// Error in planner configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The snapshot cannot be turned into a plan at all
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Invalid operation for current plan state
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

/// Result type alias for CrewForge operations
pub type Result<T> = std::result::Result<T, CrewForgeError>;
