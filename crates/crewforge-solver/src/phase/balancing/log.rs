//! Swap log.

use std::fmt;

use crewforge_core::{StationKey, WorkerId};
use serde::Serialize;

/// Which finder produced a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapReason {
    /// Partner drawn from any station.
    CrossSkill,
    /// Worst/best pair within one class.
    SameSkill,
}

impl SwapReason {
    pub fn name(self) -> &'static str {
        match self {
            SwapReason::CrossSkill => "cross_skill",
            SwapReason::SameSkill => "same_skill",
        }
    }
}

impl fmt::Display for SwapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One committed exchange.
///
/// `worker_a` left `station_a` (the urgent station) for `station_b`;
/// `worker_b` went the other way. Times are `None` when undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwapRecord {
    /// 1-based balancing pass.
    pub pass: u32,
    pub worker_a: WorkerId,
    pub worker_b: WorkerId,
    pub station_a: StationKey,
    pub station_b: StationKey,
    pub before_a: Option<f64>,
    pub before_b: Option<f64>,
    pub after_a: Option<f64>,
    pub after_b: Option<f64>,
    /// Weighted net improvement the swap was chosen for.
    pub improvement: f64,
    pub reason: SwapReason,
}

/// Append-only, ordered record of committed swaps.
///
/// Never read by the balancing logic itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SwapLog {
    records: Vec<SwapRecord>,
}

impl SwapLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SwapRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SwapRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SwapRecord> {
        self.records.iter()
    }

    /// Swaps committed during one pass.
    pub fn in_pass(&self, pass: u32) -> impl Iterator<Item = &SwapRecord> {
        self.records.iter().filter(move |r| r.pass == pass)
    }
}
