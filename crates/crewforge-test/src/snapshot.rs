//! Snapshot fixtures for end-to-end planning runs.

use std::collections::BTreeMap;

use crewforge_core::{
    EquipmentRecord, Footprint, Skill, SkillEntry, Snapshot, StationRecord, WorkerRecord,
};

/// Builds a [`Snapshot`] with complete skill maps.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    snapshot: Snapshot,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worker with Strength, Perception and Agility set; other skills
    /// are present with value zero.
    pub fn worker(self, id: u64, strength: i64, perception: i64, agility: i64) -> Self {
        let mut values = [0i64; Skill::COUNT];
        values[Skill::Strength.index()] = strength;
        values[Skill::Perception.index()] = perception;
        values[Skill::Agility.index()] = agility;
        self.worker_with(id, values, None, None)
    }

    /// Adds a worker with a full skill row, an optional tag and worn item.
    pub fn worker_with(
        mut self,
        id: u64,
        values: [i64; Skill::COUNT],
        tag: Option<&str>,
        equipped: Option<&str>,
    ) -> Self {
        let skills = Skill::ALL
            .iter()
            .zip(values)
            .map(|(skill, value)| (skill.name().to_string(), SkillEntry::new(value)))
            .collect();
        self.snapshot.workers.push(WorkerRecord {
            id,
            name: None,
            skills,
            tag: tag.map(str::to_string),
            equipped: equipped.map(str::to_string),
        });
        self
    }

    pub fn station(mut self, station_type: &str, level: u8, footprint: Footprint, occupants: &[u64]) -> Self {
        self.snapshot.stations.push(StationRecord {
            station_type: station_type.to_string(),
            level,
            footprint,
            ordinal: None,
            occupants: occupants.to_vec(),
        });
        self
    }

    /// Adds an equipment kind granting `bonus` to one skill.
    pub fn equipment(mut self, id: &str, skill: Skill, bonus: u32, compatibility: Option<&str>) -> Self {
        self.snapshot.equipment.push(EquipmentRecord {
            id: id.to_string(),
            name: id.to_string(),
            bonus: BTreeMap::from([(skill.name().to_string(), bonus)]),
            compatibility: compatibility.map(str::to_string),
        });
        self
    }

    /// Adds `count` free items of an equipment kind.
    pub fn inventory(mut self, id: &str, count: usize) -> Self {
        self.snapshot
            .inventory
            .extend(std::iter::repeat(id.to_string()).take(count));
        self
    }

    pub fn happiness(mut self, happiness: f64) -> Self {
        self.snapshot.happiness = happiness;
        self
    }

    pub fn build(self) -> Snapshot {
        self.snapshot
    }
}
