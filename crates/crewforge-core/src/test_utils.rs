//! Test utilities for crewforge-core
//!
//! Fixtures shared by the crate's unit tests. Integration tests in other
//! crates use `crewforge-test` instead.

use crate::catalog::{Catalog, ClassSpec, Footprint, FootprintSpec, StationClass, StationType};
use crate::skill::{Skill, SkillVector};
use crate::station::{Station, StationKey};
use crate::worker::Worker;

/// Power, Water and Food with pool 100 each and single-footprint stations
/// of the given capacity.
pub fn test_catalog(capacity: usize) -> Catalog {
    let mut catalog = Catalog::standard();
    for class in [StationClass::Power, StationClass::Water, StationClass::Food] {
        let priority = catalog.class(class).map_or(0, |c| c.priority);
        catalog = catalog.with_class(ClassSpec {
            class,
            base_pool: Some(100.0),
            priority,
        });
    }
    catalog.with_footprint(
        Footprint::Single,
        FootprintSpec {
            cells: 3,
            size_multiplier: 1.0,
            capacity,
        },
    )
}

/// A level-1 single-footprint station.
pub fn station(catalog: &Catalog, station_type: StationType, ordinal: u16) -> Station {
    let key = StationKey::new(station_type, 1, Footprint::Single, ordinal);
    Station::from_catalog(key, catalog).unwrap()
}

/// A worker with Strength, Perception and Agility set.
pub fn worker(id: u64, strength: u32, perception: u32, agility: u32) -> Worker {
    Worker::new(
        id,
        SkillVector::zero()
            .with(Skill::Strength, strength)
            .with(Skill::Perception, perception)
            .with(Skill::Agility, agility),
    )
}
