//! Test catalogs.

use crewforge_core::{Catalog, ClassSpec, Footprint, FootprintSpec, StationClass};

/// Base pool of every production class in [`three_skill_catalog`].
pub const TEST_POOL: f64 = 100.0;

/// The standard catalog with Power, Water and Food pools set to
/// [`TEST_POOL`] and single-footprint stations of the given capacity.
///
/// Power reads Strength, Water reads Perception, Food reads Agility.
pub fn three_skill_catalog(capacity: usize) -> Catalog {
    let mut catalog = Catalog::standard();
    for class in [StationClass::Power, StationClass::Water, StationClass::Food] {
        let priority = catalog.class(class).map_or(0, |c| c.priority);
        catalog = catalog.with_class(ClassSpec {
            class,
            base_pool: Some(TEST_POOL),
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
