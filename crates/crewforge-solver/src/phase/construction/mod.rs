//! Greedy construction phase.
//!
//! Builds the first placement from scratch. Production stations are emptied
//! (training occupants stay) and refilled in three rounds: every unassigned
//! worker first competes for the group they contribute most to, then their
//! second-best group, then their weakest. Within a group the strongest
//! candidates claim seats first, highest-priority stations first.
//!
//! Whoever is left is diverted to training stations in the same three tiers
//! reversed (weakest skill first), weakest candidates first. Anyone still
//! left stays unassigned.

mod ranking;

use crewforge_config::PlannerConfig;
use crewforge_core::{AssignmentPlan, Result};
use tracing::{debug, trace, warn};

use crate::phase::Phase;
use crate::scope::PlanningScope;
use crate::stats::PhaseStats;

pub use ranking::{
    preferences, production_groups, training_groups, CandidateOrder, StationGroup, Tier,
};


const PRODUCTION_ROUNDS: [Tier; 3] = [Tier::Best, Tier::Second, Tier::Worst];
const TRAINING_ROUNDS: [Tier; 3] = [Tier::Worst, Tier::Second, Tier::Best];

/// Greedy multi-round placement.
#[derive(Debug, Clone)]
pub struct ConstructionPhase {
    /// Contribution required in the first two production rounds; zero disables.
    min_skill_threshold: u32,
    level_weight_base: f64,
}

impl ConstructionPhase {
    pub fn new(min_skill_threshold: u32, level_weight_base: f64) -> Self {
        Self {
            min_skill_threshold,
            level_weight_base,
        }
    }

    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.min_skill_threshold, config.level_weight_base)
    }

    fn gate(&self, round: usize) -> Option<f64> {
        (round < 2 && self.min_skill_threshold > 0).then(|| f64::from(self.min_skill_threshold))
    }
}

impl Default for ConstructionPhase {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}

impl Phase for ConstructionPhase {
    fn solve(&mut self, scope: &mut PlanningScope<'_>) -> Result<()> {
        let mut phase = scope.start_phase(self.phase_type_name());

        let plan = scope.plan_mut();
        plan.reset_assignments(|s| !s.class.is_production());

        let groups = production_groups(plan, self.level_weight_base);
        let prefs = preferences(plan, &groups);
        for (round, tier) in PRODUCTION_ROUNDS.into_iter().enumerate() {
            let placed = fill_round(
                plan,
                &groups,
                &prefs,
                tier,
                CandidateOrder::Descending,
                self.gate(round),
                &mut phase,
            )?;
            debug!(
                event = "round_end",
                round = round + 1,
                tier = tier.name(),
                placed = placed,
                remaining = plan.unassigned_workers().len(),
            );
        }

        let training = training_groups(plan, self.level_weight_base);
        if !training.is_empty() && !plan.unassigned_workers().is_empty() {
            let training_prefs = preferences(plan, &training);
            for tier in TRAINING_ROUNDS {
                let placed = fill_round(
                    plan,
                    &training,
                    &training_prefs,
                    tier,
                    CandidateOrder::Ascending,
                    None,
                    &mut phase,
                )?;
                debug!(
                    event = "training_round_end",
                    tier = tier.name(),
                    placed = placed,
                    remaining = plan.unassigned_workers().len(),
                );
            }
        }

        let unassigned = plan.unassigned_workers().len();
        if unassigned > 0 {
            debug!(event = "unassigned", workers = unassigned);
        }

        let table = scope.throughput();
        let infeasible: Vec<_> = scope
            .plan()
            .production_classes()
            .into_iter()
            .filter(|class| table.class_mean(*class).is_none())
            .collect();
        for class in &infeasible {
            warn!(
                event = "infeasible_class",
                class = class.name(),
                "no worker contributes to {}; its stations stay undefined",
                class
            );
        }
        scope.diagnostics_mut().infeasible_classes = infeasible;

        scope.end_phase(phase);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Construction"
    }
}

/// Runs one placement round. Returns how many workers were seated.
fn fill_round(
    plan: &mut AssignmentPlan,
    groups: &[StationGroup],
    prefs: &[Vec<usize>],
    tier: Tier,
    order: CandidateOrder,
    gate: Option<f64>,
    phase: &mut PhaseStats,
) -> Result<usize> {
    let mut placed = 0;
    for (g, group) in groups.iter().enumerate() {
        let mut candidates: Vec<(usize, f64)> = plan
            .unassigned_workers()
            .into_iter()
            .filter(|w| {
                let ranking = &prefs[*w];
                tier.position(ranking.len()).map(|i| ranking[i]) == Some(g)
            })
            .map(|w| (w, plan.contribution(w, &group.requirement)))
            .filter(|(_, contribution)| gate.map_or(true, |min| *contribution >= min))
            .collect();
        candidates.sort_by(|a, b| order.compare(a.1, b.1));

        let mut queue = candidates.into_iter();
        'stations: for &station in &group.stations {
            while !plan.station(station).is_full() {
                let Some((worker, contribution)) = queue.next() else {
                    break 'stations;
                };
                plan.try_assign(worker, station)?;
                phase.record_step();
                placed += 1;
                trace!(
                    event = "worker_placed",
                    worker = %plan.worker(worker).id,
                    station = %plan.station(station).key,
                    contribution = contribution,
                );
            }
        }
    }
    Ok(placed)
}
