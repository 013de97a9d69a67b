//! Assignment plan fixtures.

use std::collections::HashMap;

use crewforge_core::{
    AssignmentPlan, Catalog, Compatibility, Equipment, Footprint, ItemInstance, ItemOrigin, Skill,
    SkillVector, Station, StationKey, StationType, Worker,
};

/// An unrestricted item granting `bonus` to one skill.
pub fn item(id: &str, skill: Skill, bonus: u32) -> Equipment {
    Equipment::new(id, id, SkillVector::single(skill, bonus))
}

/// An item only workers tagged `tag` may hold.
pub fn restricted_item(id: &str, skill: Skill, bonus: u32, tag: &str) -> Equipment {
    item(id, skill, bonus).with_compatibility(Compatibility::Only(tag.to_string()))
}

/// Builds an [`AssignmentPlan`] step by step.
///
/// Stations are level 1 with the single footprint unless added through
/// [`PlanBuilder::station_at`]. Ordinals are assigned per identical group.
/// Assignments and bindings refer to workers, stations and items by the
/// order they were added.
#[derive(Debug, Clone)]
pub struct PlanBuilder {
    catalog: Catalog,
    workers: Vec<Worker>,
    stations: Vec<Station>,
    items: Vec<ItemInstance>,
    assignments: Vec<(usize, usize)>,
    bindings: Vec<(usize, usize)>,
    ordinals: HashMap<(StationType, u8, Footprint), u16>,
}

impl PlanBuilder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            workers: Vec::new(),
            stations: Vec::new(),
            items: Vec::new(),
            assignments: Vec::new(),
            bindings: Vec::new(),
            ordinals: HashMap::new(),
        }
    }

    pub fn worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    pub fn workers(mut self, workers: impl IntoIterator<Item = Worker>) -> Self {
        self.workers.extend(workers);
        self
    }

    /// Adds a level-1 single-footprint station.
    pub fn station(self, station_type: StationType) -> Self {
        self.station_at(station_type, 1, Footprint::Single)
    }

    /// Adds a station with explicit level and footprint.
    ///
    /// # Panics
    ///
    /// If the catalog cannot resolve the station.
    pub fn station_at(mut self, station_type: StationType, level: u8, footprint: Footprint) -> Self {
        let ordinal = self
            .ordinals
            .entry((station_type, level, footprint))
            .or_insert(0);
        let key = StationKey::new(station_type, level, footprint, *ordinal);
        *ordinal += 1;
        let station = Station::from_catalog(key, &self.catalog)
            .unwrap_or_else(|e| panic!("fixture station {key}: {e}"));
        self.stations.push(station);
        self
    }

    /// Adds an inventory item.
    pub fn item(mut self, equipment: Equipment) -> Self {
        self.items.push(ItemInstance {
            equipment,
            origin: ItemOrigin::Inventory,
        });
        self
    }

    /// Adds an item already worn by `worker`.
    pub fn worn_item(mut self, equipment: Equipment, worker: usize) -> Self {
        self.bindings.push((self.items.len(), worker));
        self.items.push(ItemInstance {
            equipment,
            origin: ItemOrigin::Binding,
        });
        self
    }

    pub fn assign(mut self, worker: usize, station: usize) -> Self {
        self.assignments.push((worker, station));
        self
    }

    /// # Panics
    ///
    /// If an assignment or binding breaks a plan invariant.
    pub fn build(self) -> AssignmentPlan {
        let mut plan = AssignmentPlan::new(self.workers, self.stations, self.items);
        for (worker, station) in self.assignments {
            plan.try_assign(worker, station)
                .unwrap_or_else(|e| panic!("fixture assignment: {e}"));
        }
        for (item, worker) in self.bindings {
            plan.bind_item(item, worker)
                .unwrap_or_else(|e| panic!("fixture binding: {e}"));
        }
        plan
    }
}
