//! Swap finders.
//!
//! A [`SwapFinder`] looks at the working plan and proposes the single best
//! exchange for the most urgent station it can help, or nothing. Both
//! finders score candidates the same way ([`evaluate_exchange`]); they
//! differ in which pairs they consider.

use std::fmt::Debug;

use crewforge_core::{time_for_total, AssignmentPlan, MoraleFactor, ThroughputTable};
use tracing::trace;

use super::log::SwapReason;

const EPSILON: f64 = 1e-9;

/// Read-only inputs a finder needs besides the plan.
#[derive(Debug, Clone, Copy)]
pub struct SwapContext<'a> {
    pub table: &'a ThroughputTable,
    pub morale: MoraleFactor,
    /// Allowed distance from the class mean.
    pub threshold: f64,
    /// Weight added to the urgent station's gain.
    pub aggressiveness: f64,
    /// Workers already moved this pass, by worker index.
    pub tabu: &'a [bool],
}

/// A scored, not yet applied exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapCandidate {
    /// Worker leaving the urgent station.
    pub worker_a: usize,
    /// Worker joining the urgent station.
    pub worker_b: usize,
    pub station_a: usize,
    pub station_b: usize,
    /// Reduction of the urgent station's distance from its class mean.
    pub gain: f64,
    /// Growth of the partner station's distance from its class mean.
    pub collateral: f64,
    /// `gain * (1 + aggressiveness) - collateral`.
    pub net: f64,
}

/// Strategy for proposing one swap.
pub trait SwapFinder: Send + Debug {
    /// Best swap for the most urgent station that has one.
    fn find_best_swap(&self, plan: &AssignmentPlan, ctx: &SwapContext<'_>) -> Option<SwapCandidate>;

    /// Tag written to the swap log.
    fn reason(&self) -> SwapReason;
}

/// Stations lagging their class mean by more than the threshold.
///
/// Ordered by station priority, then deviation (largest first), then
/// input order.
pub fn urgent_stations(plan: &AssignmentPlan, table: &ThroughputTable, threshold: f64) -> Vec<usize> {
    let mut urgent: Vec<(usize, f64)> = (0..plan.station_count())
        .filter(|s| plan.station(*s).is_production())
        .filter_map(|s| table.deviation(s).map(|d| (s, d)))
        .filter(|(_, d)| *d > threshold + EPSILON)
        .collect();
    urgent.sort_by(|a, b| {
        plan.station(a.0)
            .priority
            .cmp(&plan.station(b.0).priority)
            .then(b.1.total_cmp(&a.1))
            .then(a.0.cmp(&b.0))
    });
    urgent.into_iter().map(|(s, _)| s).collect()
}

/// Simulates exchanging `worker_a` (in `station_a`) with `worker_b` (in
/// `station_b`) and scores it.
///
/// Returns `None` when the exchange must not be committed: a station would
/// change between defined and undefined, the summed time of the two
/// stations would grow, two stations of one class would just trade times,
/// or the weighted net is not positive.
pub fn evaluate_exchange(
    plan: &AssignmentPlan,
    ctx: &SwapContext<'_>,
    worker_a: usize,
    station_a: usize,
    worker_b: usize,
    station_b: usize,
) -> Option<SwapCandidate> {
    let sa = plan.station(station_a);
    let sb = plan.station(station_b);

    let total_a = plan.station_total(station_a) - plan.contribution(worker_a, &sa.requirement)
        + plan.contribution(worker_b, &sa.requirement);
    let total_b = plan.station_total(station_b) - plan.contribution(worker_b, &sb.requirement)
        + plan.contribution(worker_a, &sb.requirement);
    let after_a = sa.pool.and_then(|pool| time_for_total(pool, total_a, ctx.morale));
    let after_b = sb.pool.and_then(|pool| time_for_total(pool, total_b, ctx.morale));
    let before_a = ctx.table.time(station_a);
    let before_b = ctx.table.time(station_b);

    if before_a.is_some() != after_a.is_some() || before_b.is_some() != after_b.is_some() {
        return None;
    }
    let before_sum = before_a.unwrap_or(0.0) + before_b.unwrap_or(0.0);
    let after_sum = after_a.unwrap_or(0.0) + after_b.unwrap_or(0.0);
    if after_sum > before_sum + EPSILON {
        return None;
    }
    // Trading places within one class only relabels the imbalance.
    if sa.class == sb.class
        && matches!((after_a, before_b), (Some(x), Some(y)) if (x - y).abs() < EPSILON)
        && matches!((after_b, before_a), (Some(x), Some(y)) if (x - y).abs() < EPSILON)
    {
        return None;
    }

    let mean_a = ctx.table.class_mean(sa.class)?;
    let (old_a, new_a) = (before_a?, after_a?);
    let gain = (old_a - mean_a).abs() - (new_a - mean_a).abs();

    let collateral = match (sb.is_production(), before_b, after_b) {
        (true, Some(old_b), Some(new_b)) => ctx
            .table
            .class_mean(sb.class)
            .map_or(0.0, |mean_b| ((new_b - mean_b).abs() - (old_b - mean_b).abs()).max(0.0)),
        _ => 0.0,
    };

    let net = gain * (1.0 + ctx.aggressiveness) - collateral;
    trace!(
        event = "swap_evaluated",
        worker_a = %plan.worker(worker_a).id,
        worker_b = %plan.worker(worker_b).id,
        gain = gain,
        collateral = collateral,
        net = net,
    );
    (net > EPSILON).then_some(SwapCandidate {
        worker_a,
        worker_b,
        station_a,
        station_b,
        gain,
        collateral,
        net,
    })
}

/// Lowest contributor of a station among workers not yet moved this pass.
fn weakest_member(plan: &AssignmentPlan, station: usize, tabu: &[bool]) -> Option<(usize, f64)> {
    let requirement = plan.station(station).requirement;
    plan.station(station)
        .members()
        .iter()
        .filter(|w| !tabu[**w])
        .map(|w| (*w, plan.contribution(*w, &requirement)))
        .fold(None, |best: Option<(usize, f64)>, (w, c)| match best {
            Some((_, bc)) if bc <= c => best,
            _ => Some((w, c)),
        })
}

/// Searches every other station for a partner that raises the urgent
/// station's total, and keeps the highest net improvement.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossSkillFinder;

impl SwapFinder for CrossSkillFinder {
    fn find_best_swap(&self, plan: &AssignmentPlan, ctx: &SwapContext<'_>) -> Option<SwapCandidate> {
        for urgent in urgent_stations(plan, ctx.table, ctx.threshold) {
            let Some((worst, worst_contribution)) = weakest_member(plan, urgent, ctx.tabu) else {
                continue;
            };
            let requirement = plan.station(urgent).requirement;

            let mut best: Option<SwapCandidate> = None;
            for other in (0..plan.station_count()).filter(|s| *s != urgent) {
                for &partner in plan.station(other).members() {
                    if ctx.tabu[partner] || plan.contribution(partner, &requirement) <= worst_contribution {
                        continue;
                    }
                    let Some(candidate) = evaluate_exchange(plan, ctx, worst, urgent, partner, other) else {
                        continue;
                    };
                    if best.map_or(true, |b| candidate.net > b.net + EPSILON) {
                        best = Some(candidate);
                    }
                }
            }
            if best.is_some() {
                return best;
            }
        }
        None
    }

    fn reason(&self) -> SwapReason {
        SwapReason::CrossSkill
    }
}

/// Exchanges the urgent station's weakest worker with the strongest worker
/// of the fastest station in the same class.
#[derive(Debug, Clone, Copy)]
pub struct SameSkillFinder {
    /// Required ratio of the strong to the weak contribution.
    min_ratio: f64,
}

impl SameSkillFinder {
    pub fn new(min_ratio: f64) -> Self {
        Self { min_ratio }
    }
}

impl SwapFinder for SameSkillFinder {
    fn find_best_swap(&self, plan: &AssignmentPlan, ctx: &SwapContext<'_>) -> Option<SwapCandidate> {
        for urgent in urgent_stations(plan, ctx.table, ctx.threshold) {
            let class = plan.station(urgent).class;
            let fastest = plan
                .stations_in_class(class)
                .into_iter()
                .filter(|s| *s != urgent)
                .filter_map(|s| ctx.table.time(s).map(|t| (s, t)))
                .fold(None, |best: Option<(usize, f64)>, (s, t)| match best {
                    Some((_, bt)) if bt <= t => best,
                    _ => Some((s, t)),
                });
            let Some((fastest, _)) = fastest else {
                continue;
            };
            let Some((worst, worst_contribution)) = weakest_member(plan, urgent, ctx.tabu) else {
                continue;
            };

            let requirement = plan.station(urgent).requirement;
            let strongest = plan
                .station(fastest)
                .members()
                .iter()
                .filter(|w| !ctx.tabu[**w])
                .map(|w| (*w, plan.contribution(*w, &requirement)))
                .fold(None, |best: Option<(usize, f64)>, (w, c)| match best {
                    Some((_, bc)) if bc >= c => best,
                    _ => Some((w, c)),
                });
            let Some((best, best_contribution)) = strongest else {
                continue;
            };
            if best_contribution <= worst_contribution
                || best_contribution < worst_contribution * self.min_ratio
            {
                continue;
            }
            if let Some(candidate) = evaluate_exchange(plan, ctx, worst, urgent, best, fastest) {
                return Some(candidate);
            }
        }
        None
    }

    fn reason(&self) -> SwapReason {
        SwapReason::SameSkill
    }
}
