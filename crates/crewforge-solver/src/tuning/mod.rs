//! Cross-cycle learning.
//!
//! [`PerformanceHistory`] keeps the overall averages of past runs;
//! [`AdaptiveTuner`] reads its recent window and proposes configuration
//! changes.

mod adaptive;
mod history;

#[cfg(test)]
mod tests;

pub use adaptive::{trend, AdaptiveTuner, Adjustments, PerformanceAnalysis, TuningIssue, TuningReport};
pub use history::{CycleRecord, HistorySummary, PerformanceHistory};
