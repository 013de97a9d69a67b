//! Tests for relocation and equipment allocation.

use std::sync::Arc;

use super::*;
use crate::event::{CountingEventListener, PlanEventSupport};
use crewforge_core::{
    AssignmentPlan, Equipment, Footprint, MoraleFactor, PlanDiagnostics, Skill, SkillRequirement,
    SkillVector, StationType,
};
use crewforge_test::{item, restricted_item, spa, three_skill_catalog, PlanBuilder};

struct Run {
    plan: AssignmentPlan,
    bindings: Vec<BindingRecord>,
    diagnostics: PlanDiagnostics,
}

fn outfit(plan: AssignmentPlan, config: &PlannerConfig) -> Run {
    let events = PlanEventSupport::new();
    let mut scope = PlanningScope::new(plan, config, &events, MoraleFactor::NONE);
    EquipmentPhase::from_config(config).solve(&mut scope).unwrap();
    let parts = scope.into_parts();
    Run {
        plan: parts.plan,
        bindings: parts.bindings,
        diagnostics: parts.diagnostics,
    }
}

fn params(strategy: OutfitStrategy) -> StrategyParams {
    let defaults = PlannerConfig::default();
    StrategyParams {
        strategy,
        hybrid_weight: defaults.hybrid_deficit_weight,
        efficiency_floor: defaults.efficiency_floor,
    }
}

/// Two Power stations with totals 20 and 5: the second needs 3 more.
fn short_power(extra: Equipment) -> AssignmentPlan {
    PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .worker(spa(1, 20, 0, 0))
        .worker(spa(2, 5, 0, 0))
        .item(extra)
        .assign(0, 0)
        .assign(1, 1)
        .build()
}

#[test]
fn test_item_closes_station_deficit() {
    let plan = short_power(item("wrench", Skill::Strength, 3));
    let targets = ClassTargets::from_table(&plan.throughput(MoraleFactor::NONE));
    assert_eq!(targets.deficit(&plan, 1, MoraleFactor::NONE), Some(3.0));

    let run = outfit(plan, &PlannerConfig::default());

    assert_eq!(run.bindings.len(), 1);
    let binding = &run.bindings[0];
    assert_eq!(binding.kind, BindingKind::Allocated);
    assert_eq!(binding.worker, crewforge_core::WorkerId(2));
    assert_eq!(binding.bonus, 3.0);
    assert_eq!(run.plan.holder_of(0), Some(1));
    assert!(targets.deficit(&run.plan, 1, MoraleFactor::NONE).unwrap() <= 0.0);
    assert_eq!(run.diagnostics.unused_items, 0);
    assert!(!run.diagnostics.inventory_exhausted);
    run.plan.check_invariants().unwrap();
}

#[test]
fn test_incompatible_item_is_never_bound() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .worker(spa(1, 20, 0, 0))
        .worker(spa(2, 5, 0, 0).with_tag("F"))
        .item(restricted_item("power_armor", Skill::Strength, 3, "M"))
        .assign(0, 0)
        .assign(1, 1)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    // Neither worker carries the tag the item asks for.
    assert_eq!(run.plan.holder_of(0), None);
    assert!(run.bindings.is_empty());
    assert!(run.diagnostics.inventory_exhausted);
    assert_eq!(run.diagnostics.unused_items, 1);
}

#[test]
fn test_empty_inventory_is_not_exhausted() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .worker(spa(1, 20, 0, 0))
        .worker(spa(2, 5, 0, 0))
        .assign(0, 0)
        .assign(1, 1)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    assert!(run.bindings.is_empty());
    assert!(!run.diagnostics.inventory_exhausted);
    assert_eq!(run.diagnostics.unused_items, 0);
}

#[test]
fn test_one_item_per_worker() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .worker(spa(1, 20, 0, 0))
        .worker(spa(2, 5, 0, 0))
        .item(item("a", Skill::Strength, 1))
        .item(item("b", Skill::Strength, 1))
        .item(item("c", Skill::Strength, 1))
        .assign(0, 0)
        .assign(1, 1)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    assert_eq!(run.bindings.len(), 2);
    assert!(run.plan.item_of(0).is_some());
    assert!(run.plan.item_of(1).is_some());
    assert_eq!(run.diagnostics.unused_items, 1);
    run.plan.check_invariants().unwrap();
}

#[test]
fn test_misplaced_item_is_relocated() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::WaterPlant)
        .station(StationType::Geothermal)
        .worker(spa(1, 0, 10, 0))
        .worker(spa(2, 5, 0, 0))
        .worn_item(item("glove", Skill::Strength, 4), 0)
        .assign(0, 0)
        .assign(1, 1)
        .build();
    assert!(is_misplaced(&plan, 0));

    let run = outfit(plan, &PlannerConfig::default());

    assert_eq!(run.bindings.len(), 1);
    let binding = &run.bindings[0];
    assert_eq!(binding.kind, BindingKind::Relocated);
    assert_eq!(binding.from_worker, Some(crewforge_core::WorkerId(1)));
    assert_eq!(binding.worker, crewforge_core::WorkerId(2));
    assert_eq!(run.plan.holder_of(0), Some(1));
    assert!(!is_misplaced(&run.plan, 0));
}

#[test]
fn test_item_on_unassigned_worker_is_misplaced() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .worker(spa(1, 5, 0, 0))
        .worker(spa(2, 5, 0, 0))
        .worn_item(item("glove", Skill::Strength, 4), 1)
        .assign(0, 0)
        .build();

    assert!(is_misplaced(&plan, 0));
}

#[test]
fn test_incompatible_worn_item_moves_to_allowed_wearer() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .worker(spa(1, 5, 0, 0).with_tag("F"))
        .worker(spa(2, 5, 0, 0).with_tag("M"))
        .worn_item(restricted_item("power_armor", Skill::Strength, 5, "M"), 0)
        .assign(0, 0)
        .assign(1, 1)
        .build();
    // The F wearer sits where Strength counts.
    assert!(is_misplaced(&plan, 0));

    let run = outfit(plan, &PlannerConfig::default());

    assert_eq!(run.bindings.len(), 1);
    assert_eq!(run.bindings[0].kind, BindingKind::Relocated);
    assert_eq!(run.bindings[0].from_worker, Some(crewforge_core::WorkerId(1)));
    assert_eq!(run.plan.holder_of(0), Some(1));
    run.plan.check_invariants().unwrap();
}

#[test]
fn test_incompatible_worn_item_is_released_without_a_seat() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .worker(spa(1, 5, 0, 0).with_tag("F"))
        .worn_item(restricted_item("power_armor", Skill::Strength, 5, "M"), 0)
        .assign(0, 0)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    assert_eq!(run.plan.holder_of(0), None);
    assert!(run.bindings.is_empty());
    assert_eq!(run.diagnostics.unused_items, 1);
    assert!(!is_misplaced(&run.plan, 0));
}

#[test]
fn test_well_placed_item_stays() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .worker(spa(1, 5, 0, 0))
        .worn_item(item("glove", Skill::Strength, 4), 0)
        .assign(0, 0)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    assert!(run.bindings.is_empty());
    assert_eq!(run.plan.holder_of(0), Some(0));
}

#[test]
fn test_relocation_is_idempotent() {
    // The Strength glove starts in Water and the Perception goggles in
    // Power. Power has no free seat until the goggles move out.
    let mut plan = PlanBuilder::new(three_skill_catalog(2))
        .station(StationType::Geothermal)
        .station(StationType::WaterPlant)
        .worker(spa(1, 0, 5, 0))
        .worker(spa(2, 5, 0, 0))
        .worker(spa(3, 0, 5, 0))
        .worn_item(item("glove", Skill::Strength, 4), 0)
        .worn_item(item("goggles", Skill::Perception, 4), 1)
        .assign(0, 1)
        .assign(1, 0)
        .assign(2, 1)
        .build();
    let targets = ClassTargets::from_table(&plan.throughput(MoraleFactor::NONE));

    let first = relocate_misplaced(&mut plan, &targets, MoraleFactor::NONE).unwrap();
    assert_eq!(first.len(), 2);
    assert_eq!(plan.holder_of(0), Some(1));
    assert_eq!(plan.holder_of(1), Some(2));

    let second = relocate_misplaced(&mut plan, &targets, MoraleFactor::NONE).unwrap();
    assert!(second.is_empty());
    plan.check_invariants().unwrap();
}

#[test]
fn test_deficit_first_order() {
    // Power deficits -12, 3, 0 against a 12.5 mean; Water deficits about
    // -32.7 and 3.27 against 13.75.
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .station(StationType::Geothermal)
        .station(StationType::WaterPlant)
        .station(StationType::WaterPlant)
        .worker(spa(1, 20, 0, 0))
        .worker(spa(2, 5, 0, 0))
        .worker(spa(3, 8, 0, 0))
        .worker(spa(4, 0, 40, 0))
        .worker(spa(5, 0, 4, 0))
        .assign(0, 0)
        .assign(1, 1)
        .assign(2, 2)
        .assign(3, 3)
        .assign(4, 4)
        .build();
    let targets = ClassTargets::from_table(&plan.throughput(MoraleFactor::NONE));

    let order = station_order(
        &plan,
        &targets,
        MoraleFactor::NONE,
        &params(OutfitStrategy::DeficitFirst),
    );

    // Power outranks Water even with the smaller deficit.
    assert_eq!(order, vec![1, 4]);
}

#[test]
fn test_big_rooms_first_ignores_deficit() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station_at(StationType::Geothermal, 3, Footprint::Single)
        .worker(spa(1, 5, 0, 0))
        .worker(spa(2, 20, 0, 0))
        .item(item("wrench", Skill::Strength, 3))
        .assign(0, 0)
        .assign(1, 1)
        .build();
    let config = PlannerConfig::default().with_outfit_strategy(OutfitStrategy::BigRoomsFirst);

    let run = outfit(plan, &config);

    // The level-3 room is already ahead of its class but ranks first.
    assert_eq!(run.plan.holder_of(0), Some(1));
    assert_eq!(run.bindings[0].kind, BindingKind::Allocated);
}

#[test]
fn test_efficiency_first_order_skips_unhelped_stations() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Cafeteria)
        .station(StationType::WaterPlant)
        .station(StationType::Geothermal)
        .worker(spa(1, 0, 0, 5))
        .worker(spa(2, 0, 5, 0))
        .worker(spa(3, 5, 0, 0))
        .item(Equipment::new(
            "goggles",
            "Goggles",
            SkillVector::single(Skill::Perception, 2).with(Skill::Luck, 2),
        ))
        .item(item("wrench", Skill::Strength, 2))
        .assign(0, 0)
        .assign(1, 1)
        .assign(2, 2)
        .build();
    let targets = ClassTargets::from_table(&plan.throughput(MoraleFactor::NONE));

    let order = station_order(
        &plan,
        &targets,
        MoraleFactor::NONE,
        &params(OutfitStrategy::EfficiencyFirst),
    );

    assert_eq!(order, vec![2, 1]);
}

#[test]
fn test_efficiency_floor_defers_wasteful_items_to_leftovers() {
    let plan = short_power(Equipment::new(
        "lucky_charm",
        "Lucky Charm",
        SkillVector::single(Skill::Strength, 1).with(Skill::Luck, 9),
    ));
    let mut config = PlannerConfig::default().with_outfit_strategy(OutfitStrategy::EfficiencyFirst);
    config.efficiency_floor = 0.5;

    let run = outfit(plan, &config);

    assert_eq!(run.bindings.len(), 1);
    assert_eq!(run.bindings[0].kind, BindingKind::Leftover);
}

#[test]
fn test_hybrid_pick_weighs_bonus_against_efficiency() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .worker(spa(1, 5, 0, 0))
        .item(Equipment::new(
            "heavy",
            "Heavy",
            SkillVector::single(Skill::Strength, 4).with(Skill::Luck, 4),
        ))
        .item(item("light", Skill::Strength, 2))
        .assign(0, 0)
        .build();
    let requirement = SkillRequirement::Single(Skill::Strength);
    let candidates = candidate_items(&plan, 0, &requirement);
    assert_eq!(candidates, vec![0, 1]);

    let mut hybrid = params(OutfitStrategy::Hybrid);
    hybrid.hybrid_weight = 0.8;
    assert_eq!(pick_item(&plan, &candidates, &requirement, &hybrid), Some(Pick::Item(0)));
    hybrid.hybrid_weight = 0.2;
    assert_eq!(pick_item(&plan, &candidates, &requirement, &hybrid), Some(Pick::Item(1)));

    let deficit = params(OutfitStrategy::DeficitFirst);
    assert_eq!(pick_item(&plan, &candidates, &requirement, &deficit), Some(Pick::Item(0)));
    let efficiency = params(OutfitStrategy::EfficiencyFirst);
    assert_eq!(pick_item(&plan, &candidates, &requirement, &efficiency), Some(Pick::Item(1)));
}

#[test]
fn test_leftovers_go_to_biggest_room() {
    let plan = PlanBuilder::new(three_skill_catalog(1))
        .station(StationType::Geothermal)
        .station_at(StationType::Geothermal, 2, Footprint::Single)
        .worker(spa(1, 10, 0, 0))
        .worker(spa(2, 10, 0, 0))
        .item(item("wrench", Skill::Strength, 3))
        .assign(0, 0)
        .assign(1, 1)
        .build();

    let run = outfit(plan, &PlannerConfig::default());

    // Nothing is behind target, so only the leftover pass hands it out.
    assert_eq!(run.bindings.len(), 1);
    assert_eq!(run.bindings[0].kind, BindingKind::Leftover);
    assert_eq!(run.plan.holder_of(0), Some(1));
    assert!(!run.diagnostics.inventory_exhausted);
}

#[test]
fn test_bindings_reach_listeners() {
    let config = PlannerConfig::default();
    let listener = Arc::new(CountingEventListener::new());
    let mut events = PlanEventSupport::new();
    events.add_listener(listener.clone());

    let plan = short_power(item("wrench", Skill::Strength, 3));
    let mut scope = PlanningScope::new(plan, &config, &events, MoraleFactor::NONE);
    EquipmentPhase::from_config(&config).solve(&mut scope).unwrap();

    assert_eq!(listener.binding_count(), 1);
    assert_eq!(listener.relocation_count(), 0);
    assert_eq!(listener.phase_ended_count(), 1);
}
