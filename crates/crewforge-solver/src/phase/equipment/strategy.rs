//! Station ordering and item choice for each outfit strategy.

use crewforge_config::OutfitStrategy;
use crewforge_core::{AssignmentPlan, MoraleFactor, SkillRequirement};

use super::deficit::ClassTargets;

const EPSILON: f64 = 1e-9;

/// Knobs shared by ordering and picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrategyParams {
    pub strategy: OutfitStrategy,
    /// Deficit share of the hybrid score, in `[0, 1]`.
    pub hybrid_weight: f64,
    /// Smallest efficiency the efficiency-first strategy accepts.
    pub efficiency_floor: f64,
}

/// Outcome of choosing an item for one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    Item(usize),
    /// The best candidate is below the efficiency floor; stop at this station.
    BelowFloor,
}

/// Free items the worker may wear that add something to `requirement`,
/// in item order.
pub fn candidate_items(plan: &AssignmentPlan, worker: usize, requirement: &SkillRequirement) -> Vec<usize> {
    let tag = plan.worker(worker).tag.as_deref();
    plan.free_items()
        .into_iter()
        .filter(|i| {
            let equipment = &plan.item(*i).equipment;
            equipment.fits(tag) && equipment.bonus_for(requirement) > 0.0
        })
        .collect()
}

/// Unequipped members of a station, weakest first.
pub fn unequipped_members(plan: &AssignmentPlan, station: usize) -> Vec<usize> {
    let s = plan.station(station);
    let mut members: Vec<(usize, f64)> = s
        .members()
        .iter()
        .copied()
        .filter(|w| plan.item_of(*w).is_none())
        .map(|w| (w, plan.contribution(w, &s.requirement)))
        .collect();
    members.sort_by(|a, b| a.1.total_cmp(&b.1));
    members.into_iter().map(|(w, _)| w).collect()
}

/// Producing stations in the order the strategy visits them.
///
/// Deficit-first only visits stations behind their class target. Efficiency
/// first skips stations no free item helps.
pub fn station_order(
    plan: &AssignmentPlan,
    targets: &ClassTargets,
    morale: MoraleFactor,
    params: &StrategyParams,
) -> Vec<usize> {
    let producing: Vec<usize> = (0..plan.station_count())
        .filter(|s| plan.station(*s).is_production())
        .collect();

    match params.strategy {
        OutfitStrategy::DeficitFirst => {
            let mut behind: Vec<(usize, f64)> = producing
                .into_iter()
                .filter_map(|s| targets.deficit(plan, s, morale).map(|d| (s, d)))
                .filter(|(_, d)| *d > EPSILON)
                .collect();
            behind.sort_by(|a, b| {
                plan.station(a.0)
                    .priority
                    .cmp(&plan.station(b.0).priority)
                    .then(b.1.total_cmp(&a.1))
                    .then(a.0.cmp(&b.0))
            });
            behind.into_iter().map(|(s, _)| s).collect()
        }
        OutfitStrategy::BigRoomsFirst => by_value(plan, producing),
        OutfitStrategy::Hybrid => {
            let deficits: Vec<f64> = producing
                .iter()
                .map(|s| targets.deficit(plan, *s, morale).unwrap_or(0.0).max(0.0))
                .collect();
            let max_deficit = deficits.iter().copied().fold(0.0, f64::max);
            let max_value = producing
                .iter()
                .map(|s| plan.station(*s).value())
                .max()
                .unwrap_or(0);
            let w = params.hybrid_weight;
            let mut scored: Vec<(usize, f64)> = producing
                .iter()
                .zip(&deficits)
                .map(|(s, d)| {
                    let deficit_part = if max_deficit > 0.0 { d / max_deficit } else { 0.0 };
                    let value_part = if max_value > 0 {
                        f64::from(plan.station(*s).value()) / f64::from(max_value)
                    } else {
                        0.0
                    };
                    (*s, w * deficit_part + (1.0 - w) * value_part)
                })
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.into_iter().map(|(s, _)| s).collect()
        }
        OutfitStrategy::EfficiencyFirst => {
            let free = plan.free_items();
            let mut scored: Vec<(usize, f64)> = producing
                .into_iter()
                .filter_map(|s| {
                    let requirement = plan.station(s).requirement;
                    let efficiencies: Vec<f64> = free
                        .iter()
                        .map(|i| &plan.item(*i).equipment)
                        .filter(|e| e.bonus_for(&requirement) > 0.0)
                        .map(|e| e.efficiency_for(&requirement))
                        .collect();
                    if efficiencies.is_empty() {
                        return None;
                    }
                    let mean = efficiencies.iter().sum::<f64>() / efficiencies.len() as f64;
                    Some((s, mean))
                })
                .collect();
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
            scored.into_iter().map(|(s, _)| s).collect()
        }
    }
}

/// Stations by value, largest first.
pub fn by_value(plan: &AssignmentPlan, stations: Vec<usize>) -> Vec<usize> {
    let mut stations = stations;
    stations.sort_by(|a, b| {
        plan.station(*b)
            .value()
            .cmp(&plan.station(*a).value())
            .then(a.cmp(b))
    });
    stations
}

/// Chooses among non-empty `candidates` for a worker at a station reading
/// `requirement`. Ties go to the lower item index.
pub fn pick_item(
    plan: &AssignmentPlan,
    candidates: &[usize],
    requirement: &SkillRequirement,
    params: &StrategyParams,
) -> Option<Pick> {
    let bonus = |i: usize| plan.item(i).equipment.bonus_for(requirement);
    let efficiency = |i: usize| plan.item(i).equipment.efficiency_for(requirement);

    match params.strategy {
        OutfitStrategy::DeficitFirst | OutfitStrategy::BigRoomsFirst => {
            best_by(candidates, bonus).map(Pick::Item)
        }
        OutfitStrategy::EfficiencyFirst => {
            let item = best_by(candidates, efficiency)?;
            if efficiency(item) + EPSILON < params.efficiency_floor {
                Some(Pick::BelowFloor)
            } else {
                Some(Pick::Item(item))
            }
        }
        OutfitStrategy::Hybrid => {
            let max_bonus = candidates.iter().map(|i| bonus(*i)).fold(0.0, f64::max);
            let w = params.hybrid_weight;
            best_by(candidates, |i| {
                let bonus_part = if max_bonus > 0.0 { bonus(i) / max_bonus } else { 0.0 };
                w * bonus_part + (1.0 - w) * efficiency(i)
            })
            .map(Pick::Item)
        }
    }
}

/// First candidate with the highest score.
fn best_by<F>(candidates: &[usize], score: F) -> Option<usize>
where
    F: Fn(usize) -> f64,
{
    let mut best: Option<(usize, f64)> = None;
    for &i in candidates {
        let s = score(i);
        if best.map_or(true, |(_, bs)| s > bs + EPSILON) {
            best = Some((i, s));
        }
    }
    best.map(|(i, _)| i)
}
