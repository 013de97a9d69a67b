//! Adaptive tuning.
//!
//! Looks at the recent window of a [`PerformanceHistory`] and proposes
//! configuration changes when the equipped plan is not beating the layouts
//! it started from, or is getting slower over time. Every adjustment is
//! derived from the configuration passed in, never compounded.

use crewforge_config::{OutfitStrategy, PlannerConfig, TuningConfig};
use serde::Serialize;
use tracing::{debug, info};

use super::history::{window_mean, CycleRecord, PerformanceHistory};

const MAX_AGGRESSIVENESS: f64 = 2.0;
const MIN_THRESHOLD: f64 = 2.0;
const MAX_PASSES: u32 = 20;
const MAX_SKILL_THRESHOLD: u32 = 8;
/// Seconds per cycle above which the final average counts as degrading.
const DEGRADING_SLOPE: f64 = 0.1;
/// Percent improvement below which a working setup is still tightened.
const FINE_TUNE_PERCENT: f64 = 10.0;

/// Least-squares slope of `values` against their index.
pub fn trend(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;
    let (mut num, mut den) = (0.0, 0.0);
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    num / den
}

/// Window averages and goal checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceAnalysis {
    pub cycles: usize,
    pub initial_avg: f64,
    pub before_balancing_avg: f64,
    pub after_balancing_avg: f64,
    pub final_avg: f64,
    pub initial_trend: f64,
    pub final_trend: f64,
    pub beats_initial: bool,
    pub beats_before_balancing: bool,
    pub beats_after_balancing: bool,
    /// Relative improvement over initial reaches the configured target.
    pub target_met: bool,
}

impl PerformanceAnalysis {
    /// Final against initial average, in percent.
    pub fn improvement_percent(&self) -> f64 {
        if self.initial_avg > 0.0 {
            (self.initial_avg - self.final_avg) / self.initial_avg * 100.0
        } else {
            0.0
        }
    }
}

/// A detected problem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum TuningIssue {
    /// Final average not faster than the snapshot layout; `gap` in seconds.
    NotBeatingInitial { gap: f64 },
    NotBeatingBeforeBalancing { gap: f64 },
    /// Final average growing by `slope` seconds per cycle.
    Degrading { slope: f64 },
    /// Every goal met, but by less than the fine-tune margin.
    RoomToImprove { percent: f64 },
}

/// Proposed configuration changes. `None` leaves a value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Adjustments {
    pub swap_aggressiveness: Option<f64>,
    pub balance_threshold: Option<f64>,
    pub max_passes: Option<u32>,
    pub outfit_strategy: Option<OutfitStrategy>,
    pub min_skill_threshold: Option<u32>,
}

impl Adjustments {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// `config` with every proposed value written in.
    pub fn apply(&self, config: &PlannerConfig) -> PlannerConfig {
        let mut adjusted = config.clone();
        if let Some(v) = self.swap_aggressiveness {
            adjusted.swap_aggressiveness = v;
        }
        if let Some(v) = self.balance_threshold {
            adjusted.balance_threshold = v;
        }
        if let Some(v) = self.max_passes {
            adjusted.max_passes = v;
        }
        if let Some(v) = self.outfit_strategy {
            adjusted.outfit_strategy = v;
        }
        if let Some(v) = self.min_skill_threshold {
            adjusted.min_skill_threshold = v;
        }
        adjusted
    }
}

/// What the tuner found and what it proposes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuningReport {
    pub analysis: PerformanceAnalysis,
    pub issues: Vec<TuningIssue>,
    pub adjustments: Adjustments,
}

/// Suggests configuration changes from recent history.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveTuner {
    settings: TuningConfig,
}

impl AdaptiveTuner {
    pub fn new(settings: TuningConfig) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.tuning.clone())
    }

    /// Window statistics; `None` with fewer than two cycles.
    pub fn analyze(&self, history: &PerformanceHistory) -> Option<PerformanceAnalysis> {
        let window = history.recent(self.settings.learning_window.max(1));
        if window.len() < 2 {
            return None;
        }
        let initials: Vec<f64> = window.iter().map(|c| c.initial).collect();
        let finals: Vec<f64> = window.iter().map(|c| c.with_equipment).collect();

        let initial_avg = window_mean(window, |c: &CycleRecord| c.initial);
        let before_balancing_avg = window_mean(window, |c: &CycleRecord| c.before_balancing);
        let after_balancing_avg = window_mean(window, |c: &CycleRecord| c.after_balancing);
        let final_avg = window_mean(window, |c: &CycleRecord| c.with_equipment);
        let target_met = initial_avg > 0.0
            && (initial_avg - final_avg) / initial_avg >= self.settings.target_improvement;

        Some(PerformanceAnalysis {
            cycles: window.len(),
            initial_avg,
            before_balancing_avg,
            after_balancing_avg,
            final_avg,
            initial_trend: trend(&initials),
            final_trend: trend(&finals),
            beats_initial: final_avg < initial_avg,
            beats_before_balancing: final_avg < before_balancing_avg,
            beats_after_balancing: final_avg < after_balancing_avg,
            target_met,
        })
    }

    /// Issues and adjustments for `config`; `None` with too little history.
    pub fn suggest(&self, history: &PerformanceHistory, config: &PlannerConfig) -> Option<TuningReport> {
        let analysis = self.analyze(history)?;
        let mut issues = Vec::new();
        let mut adjustments = Adjustments::default();

        if !analysis.beats_initial {
            issues.push(TuningIssue::NotBeatingInitial {
                gap: analysis.final_avg - analysis.initial_avg,
            });
            adjustments.swap_aggressiveness =
                Some((config.swap_aggressiveness * 1.2).min(MAX_AGGRESSIVENESS));
            adjustments.balance_threshold = Some((config.balance_threshold * 0.8).max(MIN_THRESHOLD));
            adjustments.max_passes = Some((config.max_passes + 3).min(MAX_PASSES));
        }

        if !analysis.beats_before_balancing {
            issues.push(TuningIssue::NotBeatingBeforeBalancing {
                gap: analysis.final_avg - analysis.before_balancing_avg,
            });
            if config.outfit_strategy == OutfitStrategy::DeficitFirst {
                adjustments.outfit_strategy = Some(OutfitStrategy::Hybrid);
            }
            adjustments.min_skill_threshold =
                Some((config.min_skill_threshold + 1).min(MAX_SKILL_THRESHOLD));
        }

        if analysis.final_trend > DEGRADING_SLOPE {
            issues.push(TuningIssue::Degrading {
                slope: analysis.final_trend,
            });
            adjustments.swap_aggressiveness =
                Some((config.swap_aggressiveness * 1.3).min(MAX_AGGRESSIVENESS));
        }

        if analysis.beats_initial && analysis.beats_before_balancing && analysis.beats_after_balancing {
            let percent = analysis.improvement_percent();
            if percent < FINE_TUNE_PERCENT {
                issues.push(TuningIssue::RoomToImprove { percent });
                adjustments.balance_threshold = Some((config.balance_threshold * 0.9).max(MIN_THRESHOLD));
            }
        }

        info!(
            event = "tuning_analysis",
            cycles = analysis.cycles,
            initial_avg = analysis.initial_avg,
            final_avg = analysis.final_avg,
            final_trend = analysis.final_trend,
            target_met = analysis.target_met,
            issues = issues.len(),
        );
        for issue in &issues {
            debug!(event = "tuning_issue", issue = ?issue);
        }

        Some(TuningReport {
            analysis,
            issues,
            adjustments,
        })
    }

    /// `config` with the suggested adjustments applied, or unchanged when
    /// there is not enough history.
    pub fn apply(&self, history: &PerformanceHistory, config: &PlannerConfig) -> PlannerConfig {
        match self.suggest(history, config) {
            Some(report) => report.adjustments.apply(config),
            None => config.clone(),
        }
    }
}
