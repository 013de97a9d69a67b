//! End-to-end planning scenarios through the facade.

use crewforge::prelude::*;
use crewforge::{BindingKind, StationClass, ThroughputTable};
use crewforge_test::{three_skill_catalog, SnapshotBuilder};

fn test_config(capacity: usize) -> PlannerConfig {
    PlannerConfig::default().with_catalog(three_skill_catalog(capacity))
}

fn mixed_habitat() -> Snapshot {
    let mut values = [0i64; Skill::COUNT];
    values[Skill::Strength.index()] = 6;
    values[Skill::Intelligence.index()] = 9;
    SnapshotBuilder::new()
        .worker(1, 9, 2, 4)
        .worker(2, 3, 8, 1)
        .worker(3, 5, 5, 7)
        .worker(4, 1, 1, 2)
        .worker(5, 10, 3, 3)
        .worker(6, 2, 9, 6)
        .worker_with(7, values, Some("F"), Some("helmet"))
        .worker(8, 0, 0, 1)
        .station("Geothermal", 2, Footprint::Single, &[1, 4])
        .station("WaterPlant", 1, Footprint::Double, &[2])
        .station("Cafeteria", 1, Footprint::Single, &[3, 6, 8])
        .station("MedBay", 1, Footprint::Single, &[])
        .station("Gym", 1, Footprint::Single, &[])
        .equipment("helmet", Skill::Perception, 2, None)
        .equipment("gloves", Skill::Strength, 3, None)
        .equipment("dress", Skill::Agility, 4, Some("F"))
        .equipment("power_armor", Skill::Strength, 5, Some("M"))
        .inventory("gloves", 2)
        .inventory("dress", 1)
        .inventory("power_armor", 1)
        .happiness(75.0)
        .build()
}

#[test]
fn basic_round_robin() {
    let snapshot = SnapshotBuilder::new()
        .worker(1, 10, 1, 1)
        .worker(2, 1, 10, 1)
        .worker(3, 1, 1, 10)
        .station("Geothermal", 1, Footprint::Single, &[])
        .station("WaterPlant", 1, Footprint::Single, &[])
        .station("Cafeteria", 1, Footprint::Single, &[])
        .build();

    let outcome = plan_habitat(&snapshot, &test_config(1)).unwrap();

    for station in 0..3 {
        assert_eq!(outcome.plan.station(station).members(), &[station]);
        assert_eq!(outcome.snapshots.with_equipment.time(station), Some(10.0));
    }
    assert!(outcome.swap_log.is_empty());
    assert!(outcome.diagnostics.is_clean());
}

#[test]
fn forced_swap_narrows_the_slow_station() {
    // Greedy seats both strong workers together: totals 50 and 5.
    let snapshot = SnapshotBuilder::new()
        .worker(1, 25, 0, 0)
        .worker(2, 25, 0, 0)
        .worker(3, 3, 0, 0)
        .worker(4, 2, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[])
        .station("Geothermal", 1, Footprint::Single, &[])
        .build();
    let config = test_config(2).with_balance_threshold(1.0);

    let outcome = plan_habitat(&snapshot, &config).unwrap();

    let before = &outcome.snapshots.before_balancing;
    let after = &outcome.snapshots.after_balancing;
    assert_eq!(before.time(0), Some(2.0));
    assert_eq!(before.time(1), Some(20.0));
    assert!(!outcome.swap_log.is_empty());

    let deviation = |table: &ThroughputTable| {
        let mean = table.class_mean(StationClass::Power).unwrap();
        (table.time(1).unwrap() - mean).abs()
    };
    assert!(deviation(after) < deviation(before));
}

#[test]
fn equipment_closes_station_deficit() {
    // Times 5.0, 5.0 and 50.0 give a Power target of 20.0, which the weak
    // station reaches with a total of 5.
    let snapshot = SnapshotBuilder::new()
        .worker(1, 20, 0, 0)
        .worker(2, 20, 0, 0)
        .worker(3, 2, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[])
        .station("Geothermal", 1, Footprint::Single, &[])
        .station("Geothermal", 1, Footprint::Single, &[])
        .equipment("gloves", Skill::Strength, 3, None)
        .inventory("gloves", 1)
        .build();
    let config = test_config(1).with_outfit_strategy(OutfitStrategy::DeficitFirst);

    let outcome = plan_habitat(&snapshot, &config).unwrap();

    assert_eq!(outcome.snapshots.after_balancing.time(2), Some(50.0));
    assert_eq!(outcome.bindings.len(), 1);
    assert_eq!(outcome.bindings[0].kind, BindingKind::Allocated);
    assert_eq!(outcome.bindings[0].worker.0, 3);
    assert_eq!(outcome.plan.station_total(2), 5.0);
    assert_eq!(outcome.snapshots.with_equipment.time(2), Some(20.0));
    assert_eq!(outcome.diagnostics.unused_items, 0);
}

#[test]
fn incompatible_equipment_is_never_worn() {
    let outcome = plan_habitat(&mixed_habitat(), &PlannerConfig::default()).unwrap();
    let plan = &outcome.plan;

    for item in 0..plan.item_count() {
        if let Some(worker) = plan.holder_of(item) {
            let tag = plan.worker(worker).tag.as_deref();
            assert!(plan.item(item).equipment.fits(tag));
        }
    }
}

#[test]
fn worn_restricted_item_leaves_a_disallowed_wearer() {
    let mut values = [0i64; Skill::COUNT];
    values[Skill::Strength.index()] = 8;
    let snapshot = SnapshotBuilder::new()
        .worker_with(1, values, Some("F"), Some("power_armor"))
        .worker(2, 4, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[1])
        .station("Geothermal", 1, Footprint::Single, &[2])
        .equipment("power_armor", Skill::Strength, 5, Some("M"))
        .build();

    let outcome = plan_habitat(&snapshot, &PlannerConfig::default()).unwrap();
    let plan = &outcome.plan;

    for item in 0..plan.item_count() {
        if let Some(worker) = plan.holder_of(item) {
            let tag = plan.worker(worker).tag.as_deref();
            assert!(plan.item(item).equipment.fits(tag), "{tag:?} wears a restricted item");
        }
    }
    assert_eq!(outcome.diagnostics.incompatible_bindings, 1);
    assert_eq!(outcome.diagnostics.unused_items, 1);
}

#[test]
fn overwhelming_skill_keeps_a_positive_time() {
    let snapshot = SnapshotBuilder::new()
        .worker(1, 5000, 0, 0)
        .station("Geothermal", 1, Footprint::Single, &[])
        .build();

    let outcome = plan_habitat(&snapshot, &test_config(1)).unwrap();

    assert_eq!(outcome.snapshots.with_equipment.time(0), Some(0.1));
}

#[test]
fn plan_invariants_hold_for_every_strategy() {
    for strategy in [
        OutfitStrategy::DeficitFirst,
        OutfitStrategy::BigRoomsFirst,
        OutfitStrategy::Hybrid,
        OutfitStrategy::EfficiencyFirst,
    ] {
        let config = PlannerConfig::default().with_outfit_strategy(strategy);
        let outcome = plan_habitat(&mixed_habitat(), &config).unwrap();
        let plan = &outcome.plan;

        plan.check_invariants().unwrap();
        for worker in 0..plan.worker_count() {
            let held = (0..plan.item_count())
                .filter(|i| plan.holder_of(*i) == Some(worker))
                .count();
            assert!(held <= 1, "{strategy}: worker holds {held} items");
        }
    }
}

#[test]
fn balancing_never_regresses() {
    for threshold in [1.0, 5.0, 20.0] {
        let config = PlannerConfig::default().with_balance_threshold(threshold);
        let outcome = plan_habitat(&mixed_habitat(), &config).unwrap();

        let before = outcome.snapshots.before_balancing.overall().unwrap();
        let after = outcome.snapshots.after_balancing.overall().unwrap();
        assert!(after <= before, "threshold {threshold}: {after} > {before}");
    }
}

#[test]
fn planning_is_deterministic() {
    let config = PlannerConfig::default();
    let first = plan_habitat(&mixed_habitat(), &config).unwrap();
    let second = plan_habitat(&mixed_habitat(), &config).unwrap();

    for worker in 0..first.plan.worker_count() {
        assert_eq!(first.plan.station_of(worker), second.plan.station_of(worker));
        assert_eq!(first.plan.item_of(worker), second.plan.item_of(worker));
    }
    assert_eq!(first.swap_log.len(), second.swap_log.len());
    assert_eq!(first.bindings, second.bindings);
}

#[test]
fn snapshot_from_json() {
    let json = r#"{
        "workers": [
            {"id": 1, "skills": {"S": {"value": 12}, "P": {"value": 3, "modifier": 1}}},
            {"id": 2, "name": "Brooke", "skills": {"Perception": {"value": 9}}}
        ],
        "stations": [
            {"station_type": "power", "level": 1, "footprint": "single", "occupants": [1]},
            {"station_type": "Water", "level": 2, "footprint": "double"}
        ],
        "happiness": 100.0
    }"#;
    let snapshot: Snapshot = serde_json::from_str(json).unwrap();

    let outcome = plan_habitat(&snapshot, &PlannerConfig::default()).unwrap();

    assert_eq!(outcome.plan.station_count(), 2);
    assert!(outcome.plan.unassigned_workers().is_empty());
    assert_eq!(outcome.morale.value(), 1.0);
}

#[test]
fn unknown_station_type_aborts() {
    let snapshot = SnapshotBuilder::new()
        .worker(1, 10, 0, 0)
        .station("Reactor9000", 1, Footprint::Single, &[])
        .build();

    let err = plan_habitat(&snapshot, &PlannerConfig::default()).unwrap_err();

    assert!(matches!(err, crewforge::CrewForgeError::MissingCatalogEntry { .. }));
}

#[test]
fn report_exports_every_station() {
    let outcome = plan_habitat(&mixed_habitat(), &PlannerConfig::default()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&outcome.report().to_json_pretty().unwrap()).unwrap();

    assert_eq!(json["stations"].as_array().unwrap().len(), 5);
    assert_eq!(json["workers"].as_array().unwrap().len(), 8);
    assert_eq!(json["reference"], "initial");
    // Training stations are listed but never produce.
    assert_eq!(json["stations"][4]["times"]["with_equipment"], serde_json::Value::Null);
}

#[test]
fn history_feeds_the_tuner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.json");
    let config = PlannerConfig::default();

    for _ in 0..3 {
        let outcome = plan_habitat(&mixed_habitat(), &config).unwrap();
        let mut history = PerformanceHistory::load(&path).unwrap();
        history.record(CycleRecord::from_outcome(&outcome).unwrap());
        history.save(&path).unwrap();
    }

    let history = PerformanceHistory::load(&path).unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.summary_stats().unwrap().total_cycles, 3);

    let report = AdaptiveTuner::from_config(&config)
        .suggest(&history, &config)
        .unwrap();
    // Identical cycles have no trend.
    assert_eq!(report.analysis.final_trend, 0.0);
    let tuned = report.adjustments.apply(&config);
    assert!(tuned.validate().is_ok());
}
