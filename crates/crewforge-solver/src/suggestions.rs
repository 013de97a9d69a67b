//! Per-station skill adjustment suggestions.
//!
//! Compares each producing station's aggregate skill with the total it
//! would need to run at its class mean.

use crewforge_core::{ideal_total, round1, AssignmentPlan, MoraleFactor, StationKey, ThroughputTable};
use serde::Serialize;

/// Differences smaller than this count as balanced.
pub const BALANCED_TOLERANCE: f64 = 0.5;

/// How far a station is from its ideal total skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", content = "amount", rename_all = "snake_case")]
pub enum AdjustmentStatus {
    Balanced,
    /// Skill missing, one decimal.
    NeedsMore(f64),
    /// Skill to spare, one decimal.
    HasSurplus(f64),
}

impl AdjustmentStatus {
    /// Classifies `ideal - current`.
    ///
    /// ```
    /// use crewforge_solver::AdjustmentStatus;
    ///
    /// assert_eq!(AdjustmentStatus::from_difference(0.3), AdjustmentStatus::Balanced);
    /// assert_eq!(AdjustmentStatus::from_difference(2.46), AdjustmentStatus::NeedsMore(2.5));
    /// assert_eq!(AdjustmentStatus::from_difference(-4.0), AdjustmentStatus::HasSurplus(4.0));
    /// ```
    pub fn from_difference(difference: f64) -> Self {
        if difference.abs() < BALANCED_TOLERANCE {
            AdjustmentStatus::Balanced
        } else if difference > 0.0 {
            AdjustmentStatus::NeedsMore(round1(difference))
        } else {
            AdjustmentStatus::HasSurplus(round1(-difference))
        }
    }
}

/// Suggestion for one producing station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub station: StationKey,
    pub time: Option<f64>,
    /// Class mean time.
    pub target: f64,
    pub current_total: f64,
    /// Total skill that would hit the target, one decimal.
    pub ideal_total: f64,
    #[serde(flatten)]
    pub status: AdjustmentStatus,
}

/// Suggestions for every producing station whose class has a mean.
pub fn suggest_adjustments(
    plan: &AssignmentPlan,
    table: &ThroughputTable,
    morale: MoraleFactor,
) -> Vec<Suggestion> {
    (0..plan.station_count())
        .filter_map(|index| {
            let station = plan.station(index);
            if !station.is_production() {
                return None;
            }
            let target = table.class_mean(station.class)?;
            let ideal = ideal_total(station.pool?, target, morale)?;
            let current = plan.station_total(index);
            Some(Suggestion {
                station: station.key,
                time: table.time(index),
                target,
                current_total: current,
                ideal_total: round1(ideal),
                status: AdjustmentStatus::from_difference(ideal - current),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewforge_core::StationType;
    use crewforge_test::{spa, three_skill_catalog, PlanBuilder};

    #[test]
    fn test_suggestions_for_uneven_power() {
        let plan = PlanBuilder::new(three_skill_catalog(1))
            .station(StationType::Geothermal)
            .station(StationType::Geothermal)
            .station(StationType::Gym)
            .worker(spa(1, 20, 0, 0))
            .worker(spa(2, 5, 0, 0))
            .worker(spa(3, 8, 0, 0))
            .assign(0, 0)
            .assign(1, 1)
            .assign(2, 2)
            .build();
        let table = plan.throughput(MoraleFactor::NONE);

        let suggestions = suggest_adjustments(&plan, &table, MoraleFactor::NONE);

        // Training stations are never reported.
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].target, 12.5);
        assert_eq!(suggestions[0].ideal_total, 8.0);
        assert_eq!(suggestions[0].status, AdjustmentStatus::HasSurplus(12.0));
        assert_eq!(suggestions[1].status, AdjustmentStatus::NeedsMore(3.0));
    }

    #[test]
    fn test_empty_station_in_defined_class_needs_skill() {
        let plan = PlanBuilder::new(three_skill_catalog(1))
            .station(StationType::Geothermal)
            .station(StationType::Geothermal)
            .worker(spa(1, 10, 0, 0))
            .assign(0, 0)
            .build();
        let table = plan.throughput(MoraleFactor::NONE);

        let suggestions = suggest_adjustments(&plan, &table, MoraleFactor::NONE);

        assert_eq!(suggestions[0].status, AdjustmentStatus::Balanced);
        assert_eq!(suggestions[1].time, None);
        assert_eq!(suggestions[1].status, AdjustmentStatus::NeedsMore(10.0));
    }

    #[test]
    fn test_suggestion_serializes_flat() {
        let plan = PlanBuilder::new(three_skill_catalog(1))
            .station(StationType::Geothermal)
            .worker(spa(1, 10, 0, 0))
            .assign(0, 0)
            .build();
        let table = plan.throughput(MoraleFactor::NONE);
        let suggestion = &suggest_adjustments(&plan, &table, MoraleFactor::NONE)[0];

        let json = serde_json::to_value(suggestion).unwrap();
        assert_eq!(json["status"], "balanced");
        assert_eq!(json["ideal_total"], 10.0);
    }
}
