//! Tests for the planner.

use super::*;
use crate::event::CountingEventListener;
use crewforge_core::{Footprint, Skill, StationType};
use crewforge_test::{three_skill_catalog, SnapshotBuilder};

fn test_config() -> PlannerConfig {
    PlannerConfig::default().with_catalog(three_skill_catalog(1))
}

fn round_robin() -> SnapshotBuilder {
    SnapshotBuilder::new()
        .worker(1, 10, 1, 1)
        .worker(2, 1, 10, 1)
        .worker(3, 1, 1, 10)
        .station("Geothermal", 1, Footprint::Single, &[])
        .station("WaterPlant", 1, Footprint::Single, &[])
        .station("Cafeteria", 1, Footprint::Single, &[])
}

#[test]
fn test_round_robin_is_balanced_without_swaps() {
    let outcome = Planner::new(test_config())
        .plan(&round_robin().build())
        .unwrap();

    let times = outcome.snapshots.with_equipment.times().to_vec();
    assert_eq!(times, vec![Some(10.0), Some(10.0), Some(10.0)]);
    assert!(outcome.swap_log.is_empty());
    assert_eq!(outcome.balance_outcome, BalanceOutcome::Converged { passes: 0 });
    assert_eq!(outcome.plan.station_of(0), Some(0));
    assert_eq!(outcome.plan.station_of(1), Some(1));
    assert_eq!(outcome.plan.station_of(2), Some(2));
}

#[test]
fn test_happiness_scales_every_station() {
    let snapshot = round_robin().happiness(50.0).build();

    let outcome = Planner::new(test_config()).plan(&snapshot).unwrap();

    // 100 / (10 * 1.5)
    assert_eq!(outcome.morale.value(), 0.5);
    assert_eq!(outcome.snapshots.with_equipment.time(0), Some(6.7));
}

#[test]
fn test_reference_baseline_follows_snapshot_layout() {
    let empty = round_robin().build();
    let occupied = SnapshotBuilder::new()
        .worker(1, 2, 0, 0)
        .worker(2, 20, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[1])
        .station("Geothermal", 1, Footprint::Single, &[])
        .build();
    let planner = Planner::new(test_config());

    assert_eq!(
        planner.plan(&empty).unwrap().reference,
        ReferenceBaseline::BeforeBalancing
    );
    assert_eq!(
        planner.plan(&occupied).unwrap().reference,
        ReferenceBaseline::Initial
    );

    let explicit = Planner::new(test_config().with_reference_baseline(ReferenceBaseline::BeforeBalancing));
    assert_eq!(
        explicit.plan(&occupied).unwrap().reference,
        ReferenceBaseline::BeforeBalancing
    );
}

#[test]
fn test_improvement_against_initial_layout() {
    // Initially only the weak worker produces (50.0) and the second station
    // is idle. The greedy plan staffs both: 5.0 and 50.0.
    let snapshot = SnapshotBuilder::new()
        .worker(1, 2, 0, 0)
        .worker(2, 20, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[1])
        .station("Geothermal", 1, Footprint::Single, &[])
        .build();

    let outcome = Planner::new(test_config()).plan(&snapshot).unwrap();

    assert_eq!(outcome.snapshots.initial.overall(), Some(50.0));
    assert_eq!(outcome.snapshots.before_balancing.overall(), Some(27.5));
    let improvement = outcome.improvement().unwrap();
    assert_eq!(improvement.reference, 50.0);
    assert_eq!(improvement.seconds, 22.5);
    assert_eq!(improvement.percent, 45.0);
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = test_config().with_swap_aggressiveness(5.0);

    let err = Planner::new(config).plan(&round_robin().build()).unwrap_err();

    assert!(matches!(err, CrewForgeError::Config(_)));
}

#[test]
fn test_unknown_station_type_aborts() {
    let snapshot = round_robin()
        .station("FusionReactor", 1, Footprint::Single, &[])
        .build();

    let err = Planner::new(test_config()).plan(&snapshot).unwrap_err();

    assert!(matches!(err, CrewForgeError::MissingCatalogEntry { .. }));
}

#[test]
fn test_room_priorities_override_class_priority() {
    let config = test_config().with_room_priority("Cafeteria", -1);

    let outcome = Planner::new(config).plan(&round_robin().build()).unwrap();

    assert_eq!(outcome.plan.station(2).priority, -1);
    assert_eq!(outcome.plan.station(0).priority, 0);
}

#[test]
fn test_listeners_see_whole_run() {
    let listener = Arc::new(CountingEventListener::new());
    let planner = Planner::new(test_config()).with_listener(listener.clone());

    planner.plan(&round_robin().build()).unwrap();

    assert_eq!(listener.planning_started_count(), 1);
    assert_eq!(listener.planning_ended_count(), 1);
    assert_eq!(listener.phase_started_count(), 3);
    assert_eq!(listener.phase_ended_count(), 3);
}

#[test]
fn test_phase_summaries_in_order() {
    let outcome = Planner::new(test_config())
        .plan(&round_robin().build())
        .unwrap();

    let names: Vec<_> = outcome
        .phase_summaries
        .iter()
        .map(|s| (s.phase_index, s.phase_type))
        .collect();
    assert_eq!(
        names,
        vec![(0, "Construction"), (1, "Balancing"), (2, "Equipment")]
    );
}

#[test]
fn test_incompatible_inventory_stays_unused() {
    let mut values = [0i64; Skill::COUNT];
    values[Skill::Strength.index()] = 5;
    let snapshot = SnapshotBuilder::new()
        .worker_with(1, values, Some("F"), None)
        .station("Geothermal", 1, Footprint::Single, &[])
        .equipment("power_armor", Skill::Strength, 3, Some("M"))
        .inventory("power_armor", 1)
        .build();

    let outcome = Planner::new(test_config()).plan(&snapshot).unwrap();

    assert!(outcome.bindings.is_empty());
    assert_eq!(outcome.plan.item_of(0), None);
    assert_eq!(outcome.diagnostics.unused_items, 1);
}

#[test]
fn test_ingestion_diagnostics_survive_planning() {
    let snapshot = round_robin()
        .station("Gym", 1, Footprint::Single, &[99])
        .build();

    let outcome = Planner::new(test_config()).plan(&snapshot).unwrap();

    assert_eq!(outcome.diagnostics.unknown_worker_refs, 1);
    assert_eq!(outcome.plan.station_count(), 4);
    assert_eq!(
        outcome.plan.station(3).key.station_type,
        StationType::Gym
    );
}

#[test]
fn test_suggestions_cover_producing_stations() {
    let outcome = Planner::new(test_config())
        .plan(&round_robin().build())
        .unwrap();

    let suggestions = outcome.suggestions();

    assert_eq!(suggestions.len(), 3);
    assert!(suggestions
        .iter()
        .all(|s| s.status == crate::suggestions::AdjustmentStatus::Balanced));
}
