//! The assignment plan aggregate.
//!
//! [`AssignmentPlan`] owns every worker, station and item instance of one
//! planning run and the two relations between them: worker to station and
//! item to worker. Both relations are stored in both directions and kept in
//! sync by the mutators here, which are the only way to change them.
//!
//! Worker skill vectors are never mutated. The skills a station sees are the
//! [effective skills](AssignmentPlan::effective_skills): base skills plus the
//! bonus of the held item, derived on demand.

use crate::catalog::{StationClass, StationType};
use crate::equipment::ItemInstance;
use crate::error::{CrewForgeError, Result};
use crate::skill::{SkillRequirement, SkillVector};
use crate::station::{Station, StationKey};
use crate::throughput::{self, MoraleFactor, ThroughputTable};
use crate::worker::{Worker, WorkerId};


/// Workers, stations and items of one run, plus who sits where.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentPlan {
    workers: Vec<Worker>,
    stations: Vec<Station>,
    items: Vec<ItemInstance>,
    station_of: Vec<Option<usize>>,
    worker_item: Vec<Option<usize>>,
    item_holder: Vec<Option<usize>>,
}

impl AssignmentPlan {
    /// Creates a plan with nobody assigned and nothing bound.
    ///
    /// Stations passed in are emptied.
    pub fn new(workers: Vec<Worker>, mut stations: Vec<Station>, items: Vec<ItemInstance>) -> Self {
        for station in &mut stations {
            station.members.clear();
        }
        let worker_count = workers.len();
        let item_count = items.len();
        Self {
            workers,
            stations,
            items,
            station_of: vec![None; worker_count],
            worker_item: vec![None; worker_count],
            item_holder: vec![None; item_count],
        }
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn items(&self) -> &[ItemInstance] {
        &self.items
    }

    pub fn worker(&self, worker: usize) -> &Worker {
        &self.workers[worker]
    }

    pub fn station(&self, station: usize) -> &Station {
        &self.stations[station]
    }

    pub fn item(&self, item: usize) -> &ItemInstance {
        &self.items[item]
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn find_worker(&self, id: WorkerId) -> Option<usize> {
        self.workers.iter().position(|w| w.id == id)
    }

    pub fn find_station(&self, key: &StationKey) -> Option<usize> {
        self.stations.iter().position(|s| &s.key == key)
    }

    /// Station the worker is assigned to, if any.
    pub fn station_of(&self, worker: usize) -> Option<usize> {
        self.station_of[worker]
    }

    /// Item instance held by the worker, if any.
    pub fn item_of(&self, worker: usize) -> Option<usize> {
        self.worker_item[worker]
    }

    /// Worker holding the item instance, if any.
    pub fn holder_of(&self, item: usize) -> Option<usize> {
        self.item_holder[item]
    }

    /// Workers not assigned to any station, in input order.
    pub fn unassigned_workers(&self) -> Vec<usize> {
        (0..self.workers.len())
            .filter(|w| self.station_of[*w].is_none())
            .collect()
    }

    /// Item instances not held by anyone, in input order.
    pub fn free_items(&self) -> Vec<usize> {
        (0..self.items.len())
            .filter(|i| self.item_holder[*i].is_none())
            .collect()
    }

    /// Station indices belonging to `class`, in input order.
    pub fn stations_in_class(&self, class: StationClass) -> Vec<usize> {
        (0..self.stations.len())
            .filter(|s| self.stations[*s].class == class)
            .collect()
    }

    /// Production classes present in the plan, in class order.
    pub fn production_classes(&self) -> Vec<StationClass> {
        let mut classes: Vec<StationClass> = self
            .stations
            .iter()
            .filter(|s| s.is_production())
            .map(|s| s.class)
            .collect();
        classes.sort();
        classes.dedup();
        classes
    }

    /// Assigns an unassigned worker to a station with free capacity.
    pub fn try_assign(&mut self, worker: usize, station: usize) -> Result<()> {
        if let Some(current) = self.station_of[worker] {
            return Err(CrewForgeError::InvalidState(format!(
                "worker {} already assigned to {}",
                self.workers[worker].id, self.stations[current].key
            )));
        }
        let target = &mut self.stations[station];
        if target.is_full() {
            return Err(CrewForgeError::InvalidState(format!(
                "station {} is at capacity {}",
                target.key, target.capacity
            )));
        }
        target.members.push(worker);
        self.station_of[worker] = Some(station);
        Ok(())
    }

    /// Removes a worker from its station. Returns the station it left.
    pub fn unassign(&mut self, worker: usize) -> Option<usize> {
        let station = self.station_of[worker].take()?;
        self.stations[station].members.retain(|m| *m != worker);
        Some(station)
    }

    /// Exchanges two workers assigned to different stations.
    ///
    /// Each worker takes the other's slot, so member order is preserved.
    pub fn swap_workers(&mut self, a: usize, b: usize) -> Result<()> {
        let (sa, sb) = match (self.station_of[a], self.station_of[b]) {
            (Some(sa), Some(sb)) if sa != sb => (sa, sb),
            _ => {
                return Err(CrewForgeError::InvalidState(format!(
                    "cannot swap {} and {}: both must sit in different stations",
                    self.workers[a].id, self.workers[b].id
                )))
            }
        };
        for slot in self.stations[sa].members.iter_mut() {
            if *slot == a {
                *slot = b;
            }
        }
        for slot in self.stations[sb].members.iter_mut() {
            if *slot == b {
                *slot = a;
            }
        }
        self.station_of[a] = Some(sb);
        self.station_of[b] = Some(sa);
        Ok(())
    }

    /// Clears every station for which `keep` returns false.
    pub fn reset_assignments<F>(&mut self, keep: F)
    where
        F: Fn(&Station) -> bool,
    {
        for station in &mut self.stations {
            if keep(station) {
                continue;
            }
            for worker in station.members.drain(..) {
                self.station_of[worker] = None;
            }
        }
    }

    /// Binds a free item to a worker holding nothing.
    pub fn bind_item(&mut self, item: usize, worker: usize) -> Result<()> {
        if let Some(holder) = self.item_holder[item] {
            return Err(CrewForgeError::InvalidState(format!(
                "item {} already held by {}",
                self.items[item].equipment.id, self.workers[holder].id
            )));
        }
        if self.worker_item[worker].is_some() {
            return Err(CrewForgeError::InvalidState(format!(
                "worker {} already holds an item",
                self.workers[worker].id
            )));
        }
        self.item_holder[item] = Some(worker);
        self.worker_item[worker] = Some(item);
        Ok(())
    }

    /// Releases an item. Returns its former holder.
    pub fn unbind_item(&mut self, item: usize) -> Option<usize> {
        let holder = self.item_holder[item].take()?;
        self.worker_item[holder] = None;
        Some(holder)
    }

    /// Base skills plus the bonus of the held item.
    pub fn effective_skills(&self, worker: usize) -> SkillVector {
        let base = self.workers[worker].skills;
        match self.worker_item[worker] {
            Some(item) => base.plus(&self.items[item].equipment.bonus),
            None => base,
        }
    }

    /// What one worker contributes toward `requirement`.
    pub fn contribution(&self, worker: usize, requirement: &SkillRequirement) -> f64 {
        requirement.value(&self.effective_skills(worker))
    }

    /// Aggregate relevant skill of a station's members.
    pub fn station_total(&self, station: usize) -> f64 {
        let s = &self.stations[station];
        s.members
            .iter()
            .map(|w| self.contribution(*w, &s.requirement))
            .sum()
    }

    /// Time to produce for one station; `None` when undefined.
    pub fn station_time(&self, station: usize, morale: MoraleFactor) -> Option<f64> {
        let s = &self.stations[station];
        let skills: Vec<SkillVector> = s.members.iter().map(|w| self.effective_skills(*w)).collect();
        throughput::throughput(s, skills.iter(), morale)
    }

    /// Throughput of every station plus class and overall means.
    pub fn throughput(&self, morale: MoraleFactor) -> ThroughputTable {
        ThroughputTable::compute(self, morale)
    }

    /// Overrides the urgency rank of every station of one type.
    pub fn set_priority(&mut self, station_type: StationType, priority: i32) {
        for station in &mut self.stations {
            if station.key.station_type == station_type {
                station.priority = priority;
            }
        }
    }

    /// Verifies capacity, single assignment and single binding.
    pub fn check_invariants(&self) -> Result<()> {
        let mut seen = vec![false; self.workers.len()];
        for (index, station) in self.stations.iter().enumerate() {
            if station.members.len() > station.capacity {
                return Err(CrewForgeError::InvalidState(format!(
                    "station {} holds {} workers, capacity {}",
                    station.key,
                    station.members.len(),
                    station.capacity
                )));
            }
            for &worker in &station.members {
                if seen[worker] {
                    return Err(CrewForgeError::InvalidState(format!(
                        "worker {} appears in more than one station",
                        self.workers[worker].id
                    )));
                }
                seen[worker] = true;
                if self.station_of[worker] != Some(index) {
                    return Err(CrewForgeError::InvalidState(format!(
                        "worker {} station index out of sync",
                        self.workers[worker].id
                    )));
                }
            }
        }
        for (worker, station) in self.station_of.iter().enumerate() {
            if station.is_some() && !seen[worker] {
                return Err(CrewForgeError::InvalidState(format!(
                    "worker {} points at a station that does not list it",
                    self.workers[worker].id
                )));
            }
        }
        for (item, holder) in self.item_holder.iter().enumerate() {
            if let Some(worker) = holder {
                if self.worker_item[*worker] != Some(item) {
                    return Err(CrewForgeError::InvalidState(format!(
                        "item {} binding out of sync",
                        self.items[item].equipment.id
                    )));
                }
            }
        }
        for (worker, item) in self.worker_item.iter().enumerate() {
            if let Some(item) = item {
                if self.item_holder[*item] != Some(worker) {
                    return Err(CrewForgeError::InvalidState(format!(
                        "worker {} binding out of sync",
                        self.workers[worker].id
                    )));
                }
            }
        }
        Ok(())
    }
}
