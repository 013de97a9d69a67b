//! Performance history across planning cycles.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use crewforge_config::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::planner::{Improvement, PlanningOutcome};

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Overall averages of one planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub timestamp: DateTime<Utc>,
    pub initial: f64,
    pub before_balancing: f64,
    pub after_balancing: f64,
    pub with_equipment: f64,
}

impl CycleRecord {
    pub fn new(initial: f64, before_balancing: f64, after_balancing: f64, with_equipment: f64) -> Self {
        Self {
            timestamp: Utc::now(),
            initial,
            before_balancing,
            after_balancing,
            with_equipment,
        }
    }

    /// Record of a finished run; `None` unless all four averages are defined.
    pub fn from_outcome(outcome: &PlanningOutcome) -> Option<Self> {
        let s = &outcome.snapshots;
        Some(Self::new(
            s.initial.overall()?,
            s.before_balancing.overall()?,
            s.after_balancing.overall()?,
            s.with_equipment.overall()?,
        ))
    }
}

/// Aggregate view of every recorded cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_cycles: usize,
    pub avg_initial: f64,
    pub avg_final: f64,
    pub best_final: f64,
    pub worst_final: f64,
    pub first_recorded: DateTime<Utc>,
    pub last_recorded: DateTime<Utc>,
}

/// Append-only list of cycle records, stored as JSON.
///
/// # Example
///
/// ```
/// use crewforge_solver::tuning::{CycleRecord, PerformanceHistory};
///
/// let mut history = PerformanceHistory::new();
/// history.record(CycleRecord::new(40.0, 36.0, 32.0, 30.0));
///
/// let improvement = history.latest_improvement().unwrap();
/// assert_eq!(improvement.seconds, 10.0);
/// assert_eq!(improvement.percent, 25.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceHistory {
    cycles: Vec<CycleRecord>,
}

impl PerformanceHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a history file. A missing file is an empty history.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(event = "history_missing", path = %path.display());
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn record(&mut self, cycle: CycleRecord) {
        self.cycles.push(cycle);
    }

    pub fn cycles(&self) -> &[CycleRecord] {
        &self.cycles
    }

    /// The last `window` cycles, oldest first.
    pub fn recent(&self, window: usize) -> &[CycleRecord] {
        let start = self.cycles.len().saturating_sub(window);
        &self.cycles[start..]
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Initial against final average of the latest cycle.
    pub fn latest_improvement(&self) -> Option<Improvement> {
        let last = self.cycles.last()?;
        Some(Improvement::between(last.initial, last.with_equipment))
    }

    pub fn summary_stats(&self) -> Option<HistorySummary> {
        let first = self.cycles.first()?;
        let last = self.cycles.last()?;
        let finals = || self.cycles.iter().map(|c| c.with_equipment);
        Some(HistorySummary {
            total_cycles: self.cycles.len(),
            avg_initial: round2(mean(self.cycles.iter().map(|c| c.initial))),
            avg_final: round2(mean(finals())),
            best_final: round2(finals().fold(f64::INFINITY, f64::min)),
            worst_final: round2(finals().fold(f64::NEG_INFINITY, f64::max)),
            first_recorded: first.timestamp,
            last_recorded: last.timestamp,
        })
    }
}

pub(crate) fn window_mean(cycles: &[CycleRecord], field: fn(&CycleRecord) -> f64) -> f64 {
    mean(cycles.iter().map(field))
}
