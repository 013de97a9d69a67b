//! Plan export.
//!
//! [`PlanReport`] flattens a [`PlanningOutcome`] into plain records for
//! whatever persists or displays the plan. Times are `null` where a station
//! cannot produce.

use std::collections::BTreeMap;

use crewforge_config::ReferenceBaseline;
use crewforge_core::{
    AssignmentPlan, EquipmentId, PlanDiagnostics, StationClass, StationKey, ThroughputTable,
    WorkerId,
};
use serde::Serialize;

use crate::phase::balancing::{BalanceOutcome, SwapRecord};
use crate::phase::equipment::BindingRecord;
use crate::planner::{Improvement, PlanningOutcome};
use crate::stats::PhaseSummary;
use crate::suggestions::Suggestion;

/// Station times at the four capture points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StationTimes {
    pub initial: Option<f64>,
    pub before_balancing: Option<f64>,
    pub after_balancing: Option<f64>,
    pub with_equipment: Option<f64>,
}

/// One station of the final plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReport {
    pub key: StationKey,
    pub class: StationClass,
    pub capacity: usize,
    pub workers: Vec<WorkerId>,
    pub times: StationTimes,
}

/// A worker and the item it ends up holding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkerReport {
    pub id: WorkerId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub station: Option<StationKey>,
    pub equipment: Option<EquipmentId>,
}

/// Class means and overall average of one capture point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSnapshot {
    pub class_means: BTreeMap<StationClass, f64>,
    pub overall: Option<f64>,
}

impl PerformanceSnapshot {
    pub fn from_table(table: &ThroughputTable) -> Self {
        Self {
            class_means: table.class_means().clone(),
            overall: table.overall(),
        }
    }
}

/// Aggregate summary at the four capture points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSummary {
    pub initial: PerformanceSnapshot,
    pub before_balancing: PerformanceSnapshot,
    pub after_balancing: PerformanceSnapshot,
    pub with_equipment: PerformanceSnapshot,
}

/// Serializable view of a whole planning run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub stations: Vec<StationReport>,
    pub workers: Vec<WorkerReport>,
    pub unassigned: Vec<WorkerId>,
    pub bindings: Vec<BindingRecord>,
    pub swaps: Vec<SwapRecord>,
    pub suggestions: Vec<Suggestion>,
    pub performance: PerformanceSummary,
    pub balance: BalanceOutcome,
    pub reference: ReferenceBaseline,
    pub improvement: Option<Improvement>,
    pub morale: f64,
    pub diagnostics: PlanDiagnostics,
    pub phases: Vec<PhaseSummary>,
}

impl PlanReport {
    pub fn from_outcome(outcome: &PlanningOutcome) -> Self {
        let plan = &outcome.plan;
        let snapshots = &outcome.snapshots;

        let stations = (0..plan.station_count())
            .map(|index| {
                let station = plan.station(index);
                StationReport {
                    key: station.key,
                    class: station.class,
                    capacity: station.capacity,
                    workers: station
                        .members()
                        .iter()
                        .map(|w| plan.worker(*w).id)
                        .collect(),
                    times: StationTimes {
                        initial: snapshots.initial.time(index),
                        before_balancing: snapshots.before_balancing.time(index),
                        after_balancing: snapshots.after_balancing.time(index),
                        with_equipment: snapshots.with_equipment.time(index),
                    },
                }
            })
            .collect();

        Self {
            stations,
            workers: worker_reports(plan),
            unassigned: plan
                .unassigned_workers()
                .into_iter()
                .map(|w| plan.worker(w).id)
                .collect(),
            bindings: outcome.bindings.clone(),
            swaps: outcome.swap_log.records().to_vec(),
            suggestions: outcome.suggestions(),
            performance: PerformanceSummary {
                initial: PerformanceSnapshot::from_table(&snapshots.initial),
                before_balancing: PerformanceSnapshot::from_table(&snapshots.before_balancing),
                after_balancing: PerformanceSnapshot::from_table(&snapshots.after_balancing),
                with_equipment: PerformanceSnapshot::from_table(&snapshots.with_equipment),
            },
            balance: outcome.balance_outcome,
            reference: outcome.reference,
            improvement: outcome.improvement(),
            morale: outcome.morale.value(),
            diagnostics: outcome.diagnostics.clone(),
            phases: outcome.phase_summaries.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn worker_reports(plan: &AssignmentPlan) -> Vec<WorkerReport> {
    (0..plan.worker_count())
        .map(|index| {
            let worker = plan.worker(index);
            WorkerReport {
                id: worker.id,
                name: worker.name.clone(),
                station: plan.station_of(index).map(|s| plan.station(s).key),
                equipment: plan
                    .item_of(index)
                    .map(|i| plan.item(i).equipment.id.clone()),
            }
        })
        .collect()
}

impl PlanningOutcome {
    pub fn report(&self) -> PlanReport {
        PlanReport::from_outcome(self)
    }
}

#[cfg(test)]
mod tests {
    use crewforge_config::PlannerConfig;
    use crewforge_core::{Footprint, Skill};
    use crewforge_test::{three_skill_catalog, SnapshotBuilder};

    use crate::Planner;

    #[test]
    fn test_report_json_shape() {
        let snapshot = SnapshotBuilder::new()
            .worker(1, 2, 0, 0)
            .worker(2, 20, 0, 0)
            .worker(3, 0, 0, 0)
            .station("Geothermal", 1, Footprint::Single, &[1])
            .station("Geothermal", 1, Footprint::Single, &[])
            .equipment("wrench", Skill::Strength, 3, None)
            .inventory("wrench", 1)
            .build();
        let config = PlannerConfig::default().with_catalog(three_skill_catalog(1));
        let outcome = Planner::new(config).plan(&snapshot).unwrap();

        let json: serde_json::Value = serde_json::from_str(&outcome.report().to_json().unwrap()).unwrap();

        assert_eq!(json["stations"].as_array().unwrap().len(), 2);
        assert_eq!(json["stations"][1]["times"]["initial"], serde_json::Value::Null);
        assert_eq!(json["unassigned"], serde_json::json!([3]));
        assert_eq!(json["reference"], "initial");
        assert_eq!(json["balance"]["state"], "exhausted");
        assert_eq!(json["performance"]["initial"]["overall"], 50.0);
        assert_eq!(json["bindings"].as_array().unwrap().len(), 1);
        assert_eq!(json["bindings"][0]["item"], "wrench");
        assert_eq!(json["phases"].as_array().unwrap().len(), 3);
        assert_eq!(json["diagnostics"]["unused_items"], 0);
    }
}
