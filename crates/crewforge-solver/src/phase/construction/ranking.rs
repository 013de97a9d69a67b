//! Station groups and worker preferences for greedy placement.
//!
//! Stations that share a class and requirement form a [`StationGroup`],
//! filled in descending priority score. Each worker ranks the groups by what
//! they would contribute there; a placement round then looks at one
//! [`Tier`] of that ranking.

use std::cmp::Ordering;

use crewforge_core::{AssignmentPlan, SkillRequirement, StationClass};

/// Which entry of a worker's group ranking a round uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Best,
    Second,
    Worst,
}

impl Tier {
    /// Position in a ranking of `len` entries. Short rankings reuse the
    /// nearest entry, so a single-group worker has the same choice in every
    /// tier.
    pub fn position(self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(match self {
            Tier::Best => 0,
            Tier::Second => 1.min(len - 1),
            Tier::Worst => len - 1,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Best => "best",
            Tier::Second => "second",
            Tier::Worst => "worst",
        }
    }
}

/// Stations sharing a class and requirement, in fill order.
#[derive(Debug, Clone, PartialEq)]
pub struct StationGroup {
    pub class: StationClass,
    pub requirement: SkillRequirement,
    pub priority: i32,
    pub stations: Vec<usize>,
}

/// Producing stations grouped and ordered for placement.
///
/// Groups are ordered by their most urgent station priority, then class.
/// Within a group, stations go by descending priority score with input
/// order breaking ties.
pub fn production_groups(plan: &AssignmentPlan, level_weight_base: f64) -> Vec<StationGroup> {
    let mut groups = collect_groups(plan, |s| plan.station(s).is_production());
    groups.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.class.cmp(&b.class))
            .then(a.stations[0].cmp(&b.stations[0]))
    });
    for group in &mut groups {
        sort_by_priority_score(plan, &mut group.stations, level_weight_base);
    }
    groups
}

/// Training stations grouped by the skill they train, in input order.
pub fn training_groups(plan: &AssignmentPlan, level_weight_base: f64) -> Vec<StationGroup> {
    let mut groups = collect_groups(plan, |s| plan.station(s).class == StationClass::Training);
    for group in &mut groups {
        sort_by_priority_score(plan, &mut group.stations, level_weight_base);
    }
    groups
}

fn collect_groups<F>(plan: &AssignmentPlan, include: F) -> Vec<StationGroup>
where
    F: Fn(usize) -> bool,
{
    let mut groups: Vec<StationGroup> = Vec::new();
    for index in (0..plan.station_count()).filter(|s| include(*s)) {
        let station = plan.station(index);
        match groups
            .iter_mut()
            .find(|g| g.class == station.class && g.requirement == station.requirement)
        {
            Some(group) => {
                group.priority = group.priority.min(station.priority);
                group.stations.push(index);
            }
            None => groups.push(StationGroup {
                class: station.class,
                requirement: station.requirement,
                priority: station.priority,
                stations: vec![index],
            }),
        }
    }
    groups
}

fn sort_by_priority_score(plan: &AssignmentPlan, stations: &mut [usize], base: f64) {
    stations.sort_by(|a, b| {
        let sa = plan.station(*a).priority_score(base);
        let sb = plan.station(*b).priority_score(base);
        sb.total_cmp(&sa).then(a.cmp(b))
    });
}

/// For every worker, group indices ordered by contribution, highest first.
///
/// Equal contributions keep group order.
pub fn preferences(plan: &AssignmentPlan, groups: &[StationGroup]) -> Vec<Vec<usize>> {
    (0..plan.worker_count())
        .map(|worker| {
            let mut ranked: Vec<(usize, f64)> = groups
                .iter()
                .enumerate()
                .map(|(g, group)| (g, plan.contribution(worker, &group.requirement)))
                .collect();
            ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
            ranked.into_iter().map(|(g, _)| g).collect()
        })
        .collect()
}

/// Order in which a round's candidates claim seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateOrder {
    /// Strongest first; production rounds.
    Descending,
    /// Weakest first; training rounds.
    Ascending,
}

impl CandidateOrder {
    pub(crate) fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            CandidateOrder::Descending => b.total_cmp(&a),
            CandidateOrder::Ascending => a.total_cmp(&b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewforge_core::{Footprint, StationType};
    use crewforge_test::{spa, three_skill_catalog, PlanBuilder};

    #[test]
    fn test_tier_positions() {
        assert_eq!(Tier::Best.position(3), Some(0));
        assert_eq!(Tier::Second.position(3), Some(1));
        assert_eq!(Tier::Worst.position(3), Some(2));
        assert_eq!(Tier::Second.position(1), Some(0));
        assert_eq!(Tier::Worst.position(0), None);
    }

    #[test]
    fn test_groups_follow_class_priority() {
        let plan = PlanBuilder::new(three_skill_catalog(2))
            .station(StationType::Cafeteria)
            .station(StationType::WaterPlant)
            .station(StationType::Geothermal)
            .station(StationType::Gym)
            .build();

        let groups = production_groups(&plan, 2.1);
        let classes: Vec<_> = groups.iter().map(|g| g.class).collect();
        assert_eq!(
            classes,
            vec![StationClass::Power, StationClass::Water, StationClass::Food]
        );
        assert_eq!(training_groups(&plan, 2.1).len(), 1);
    }

    #[test]
    fn test_higher_level_stations_fill_first() {
        let plan = PlanBuilder::new(three_skill_catalog(2))
            .station(StationType::Geothermal)
            .station_at(StationType::Geothermal, 3, Footprint::Single)
            .station_at(StationType::Energy2, 1, Footprint::Double)
            .build();

        let groups = production_groups(&plan, 2.1);
        assert_eq!(groups.len(), 1);
        // 2.1^2 * 3 = 13.23 beats 6 cells at level 1, which beats 3 cells.
        assert_eq!(groups[0].stations, vec![1, 2, 0]);
    }

    #[test]
    fn test_preferences_rank_by_contribution() {
        let plan = PlanBuilder::new(three_skill_catalog(2))
            .station(StationType::Geothermal)
            .station(StationType::WaterPlant)
            .station(StationType::Cafeteria)
            .worker(spa(1, 2, 9, 5))
            .worker(spa(2, 4, 4, 4))
            .build();

        let groups = production_groups(&plan, 2.1);
        let prefs = preferences(&plan, &groups);
        assert_eq!(prefs[0], vec![1, 2, 0]);
        // Ties keep group order.
        assert_eq!(prefs[1], vec![0, 1, 2]);
    }
}
