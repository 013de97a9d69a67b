//! Tests for the station catalog.

use crate::catalog::*;
use crate::error::CrewForgeError;
use crate::skill::{Skill, SkillRequirement};

#[test]
fn test_standard_pool_scales_with_footprint() {
    let catalog = Catalog::standard();

    let single = catalog
        .resolve(StationType::Geothermal, Footprint::Single)
        .unwrap();
    let triple = catalog
        .resolve(StationType::Energy2, Footprint::Triple)
        .unwrap();

    assert_eq!(single.pool, Some(1320.0));
    assert_eq!(single.capacity, 2);
    assert_eq!(triple.pool, Some(3960.0));
    assert_eq!(triple.capacity, 6);
    assert_eq!(triple.class, StationClass::Power);
}

#[test]
fn test_training_station_has_no_pool() {
    let resolved = Catalog::standard()
        .resolve(StationType::Dojo, Footprint::Double)
        .unwrap();
    assert_eq!(resolved.class, StationClass::Training);
    assert_eq!(resolved.pool, None);
    assert_eq!(resolved.requirement, SkillRequirement::Single(Skill::Agility));
}

#[test]
fn test_nuka_cola_is_dual_skill() {
    let resolved = Catalog::standard()
        .resolve(StationType::NukaCola, Footprint::Single)
        .unwrap();
    assert_eq!(
        resolved.requirement,
        SkillRequirement::Dual(Skill::Perception, Skill::Agility)
    );
}

#[test]
fn test_missing_station_entry_is_an_error() {
    let catalog = Catalog::empty().with_class(ClassSpec {
        class: StationClass::Power,
        base_pool: Some(100.0),
        priority: 0,
    });
    let err = catalog
        .resolve(StationType::Geothermal, Footprint::Single)
        .unwrap_err();
    assert!(matches!(err, CrewForgeError::MissingCatalogEntry { .. }));
}

#[test]
fn test_missing_class_entry_is_an_error() {
    let catalog = Catalog::empty().with_station(StationSpec {
        station_type: StationType::MedBay,
        class: StationClass::Medical,
        requirement: SkillRequirement::Single(Skill::Intelligence),
    });
    let err = catalog
        .resolve(StationType::MedBay, Footprint::Single)
        .unwrap_err();
    assert!(matches!(err, CrewForgeError::MissingClassEntry { .. }));
}

#[test]
fn test_station_type_aliases() {
    assert_eq!(StationType::from_name("Power"), Some(StationType::Geothermal));
    assert_eq!(StationType::from_name("medbay"), Some(StationType::MedBay));
    assert_eq!(StationType::from_name("Vault Door"), None);
}

#[test]
fn test_with_footprint_overrides_capacity() {
    let catalog = Catalog::standard().with_footprint(
        Footprint::Single,
        FootprintSpec {
            cells: 3,
            size_multiplier: 1.0,
            capacity: 1,
        },
    );
    let resolved = catalog
        .resolve(StationType::Cafeteria, Footprint::Single)
        .unwrap();
    assert_eq!(resolved.capacity, 1);
}
