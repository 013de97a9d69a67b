//! Iterative balancing phase.
//!
//! Each pass evaluates the throughput table. If every producing station is
//! within the threshold of its class mean the phase has **converged**.
//! Otherwise the configured [`SwapFinder`] is asked for swaps, up to a fixed
//! number per pass; workers moved in a pass are tabu until the next one. A
//! pass that commits nothing means the search is **exhausted**. Running out
//! of passes ends the phase with a best-effort plan.
//!
//! Every committed swap keeps the summed time of the two stations involved
//! from growing and never turns a station undefined, so the overall
//! production average never gets worse.

mod log;
mod swap;

use crewforge_config::PlannerConfig;
use crewforge_core::{AssignmentPlan, Result, ThroughputTable};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::phase::Phase;
use crate::scope::PlanningScope;
use crate::stats::PhaseStats;

pub use log::{SwapLog, SwapReason, SwapRecord};
pub use swap::{
    evaluate_exchange, urgent_stations, CrossSkillFinder, SameSkillFinder, SwapCandidate,
    SwapContext, SwapFinder,
};


const EPSILON: f64 = 1e-9;

/// How balancing ended. `passes` counts passes that searched for swaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BalanceOutcome {
    /// Every producing station is within the threshold.
    Converged { passes: u32 },
    /// A pass found nothing worth swapping.
    Exhausted { passes: u32 },
    /// The pass limit was reached first.
    PassLimitReached { passes: u32 },
}

impl BalanceOutcome {
    pub fn passes(self) -> u32 {
        match self {
            BalanceOutcome::Converged { passes }
            | BalanceOutcome::Exhausted { passes }
            | BalanceOutcome::PassLimitReached { passes } => passes,
        }
    }

    pub fn is_best_effort(self) -> bool {
        matches!(self, BalanceOutcome::PassLimitReached { .. })
    }

    pub fn name(self) -> &'static str {
        match self {
            BalanceOutcome::Converged { .. } => "converged",
            BalanceOutcome::Exhausted { .. } => "exhausted",
            BalanceOutcome::PassLimitReached { .. } => "pass_limit_reached",
        }
    }
}

/// True when every defined producing station is within `threshold` of its
/// class mean.
pub fn is_balanced(plan: &AssignmentPlan, table: &ThroughputTable, threshold: f64) -> bool {
    (0..plan.station_count())
        .filter(|s| plan.station(*s).is_production())
        .filter_map(|s| table.deviation(s))
        .all(|d| d.abs() <= threshold + EPSILON)
}

/// Bounded swap search toward class means.
#[derive(Debug)]
pub struct BalancingPhase {
    threshold: f64,
    max_passes: u32,
    max_swaps_per_pass: usize,
    aggressiveness: f64,
    finder: Box<dyn SwapFinder>,
}

impl BalancingPhase {
    pub fn new(threshold: f64, max_passes: u32, finder: Box<dyn SwapFinder>) -> Self {
        let defaults = PlannerConfig::default();
        Self {
            threshold,
            max_passes,
            max_swaps_per_pass: defaults.max_swaps_per_pass,
            aggressiveness: defaults.swap_aggressiveness,
            finder,
        }
    }

    /// Cross-skill search when enabled, same-skill pairs otherwise.
    pub fn from_config(config: &PlannerConfig) -> Self {
        let finder: Box<dyn SwapFinder> = if config.enable_cross_skill_balancing {
            Box::new(CrossSkillFinder)
        } else {
            Box::new(SameSkillFinder::new(config.same_skill_min_ratio))
        };
        Self::new(config.balance_threshold, config.max_passes, finder)
            .with_max_swaps_per_pass(config.max_swaps_per_pass)
            .with_aggressiveness(config.swap_aggressiveness)
    }

    pub fn with_max_swaps_per_pass(mut self, swaps: usize) -> Self {
        self.max_swaps_per_pass = swaps;
        self
    }

    pub fn with_aggressiveness(mut self, aggressiveness: f64) -> Self {
        self.aggressiveness = aggressiveness;
        self
    }

    /// Runs passes until converged, exhausted or out of passes.
    fn run_passes(
        &self,
        scope: &mut PlanningScope<'_>,
        phase: &mut PhaseStats,
    ) -> Result<BalanceOutcome> {
        let morale = scope.morale();
        let mut table = scope.throughput();
        let mut passes = 0u32;

        loop {
            if is_balanced(scope.plan(), &table, self.threshold) {
                return Ok(BalanceOutcome::Converged { passes });
            }
            if passes >= self.max_passes {
                return Ok(BalanceOutcome::PassLimitReached { passes });
            }
            passes += 1;
            debug!(event = "pass_start", pass = passes, overall = ?table.overall());

            let mut tabu = vec![false; scope.plan().worker_count()];
            let mut committed = 0usize;
            while committed < self.max_swaps_per_pass {
                let candidate = {
                    let ctx = SwapContext {
                        table: &table,
                        morale,
                        threshold: self.threshold,
                        aggressiveness: self.aggressiveness,
                        tabu: &tabu,
                    };
                    self.finder.find_best_swap(scope.plan(), &ctx)
                };
                let Some(candidate) = candidate else {
                    break;
                };

                let before_a = table.time(candidate.station_a);
                let before_b = table.time(candidate.station_b);
                scope
                    .plan_mut()
                    .swap_workers(candidate.worker_a, candidate.worker_b)?;
                table = scope.throughput();

                let plan = scope.plan();
                let record = SwapRecord {
                    pass: passes,
                    worker_a: plan.worker(candidate.worker_a).id,
                    worker_b: plan.worker(candidate.worker_b).id,
                    station_a: plan.station(candidate.station_a).key,
                    station_b: plan.station(candidate.station_b).key,
                    before_a,
                    before_b,
                    after_a: table.time(candidate.station_a),
                    after_b: table.time(candidate.station_b),
                    improvement: candidate.net,
                    reason: self.finder.reason(),
                };
                debug!(
                    event = "swap_committed",
                    pass = passes,
                    worker_a = %record.worker_a,
                    worker_b = %record.worker_b,
                    station_a = %record.station_a,
                    station_b = %record.station_b,
                    before_a = ?record.before_a,
                    after_a = ?record.after_a,
                    improvement = record.improvement,
                );
                scope.record_swap(record);

                tabu[candidate.worker_a] = true;
                tabu[candidate.worker_b] = true;
                committed += 1;
                phase.record_step();
                phase.record_move(true);
            }

            if committed == 0 {
                return Ok(BalanceOutcome::Exhausted { passes });
            }
        }
    }
}

impl Default for BalancingPhase {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl Phase for BalancingPhase {
    fn solve(&mut self, scope: &mut PlanningScope<'_>) -> Result<()> {
        let mut phase = scope.start_phase(self.phase_type_name());
        let overall_before = scope.throughput().overall();

        let outcome = self.run_passes(scope, &mut phase)?;

        let overall_after = scope.throughput().overall();
        if outcome.is_best_effort() {
            warn!(
                event = "non_convergence",
                passes = outcome.passes(),
                "balancing stopped at the pass limit; keeping the best plan found"
            );
            scope.diagnostics_mut().best_effort = true;
        }
        info!(
            event = "balance_end",
            outcome = outcome.name(),
            passes = outcome.passes(),
            swaps = scope.swap_log().len(),
            overall_before = ?overall_before,
            overall_after = ?overall_after,
        );
        scope.set_balance_outcome(outcome);

        scope.end_phase(phase);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Balancing"
    }
}
