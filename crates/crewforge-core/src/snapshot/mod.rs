//! Snapshot input records and ingestion.
//!
//! A [`Snapshot`] is the raw material handed over by whatever reads the
//! habitat save: worker records with named skill maps, station records with
//! their current occupants, the equipment catalog and the free inventory.
//! [`Snapshot::ingest`] resolves it against a [`Catalog`] into a baseline
//! [`AssignmentPlan`] in which current occupants are assigned and worn items
//! are bound.
//!
//! Ingestion is lenient. Missing or negative skill entries read as zero,
//! unknown references are skipped and over-capacity occupants are dropped;
//! each of these is counted in [`PlanDiagnostics`]. The only hard failures
//! are station records the catalog cannot describe and duplicate explicit
//! station ordinals.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Footprint, StationType};
use crate::diagnostics::PlanDiagnostics;
use crate::equipment::{Compatibility, Equipment, EquipmentId, ItemInstance, ItemOrigin};
use crate::error::{CrewForgeError, Result};
use crate::plan::AssignmentPlan;
use crate::skill::{Skill, SkillVector};
use crate::station::{Station, StationKey};
use crate::worker::{Worker, WorkerId};


/// One skill as exported: base value plus the modifier granted by gear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub value: i64,
    #[serde(default)]
    pub modifier: i64,
}

impl SkillEntry {
    pub fn new(value: i64) -> Self {
        Self { value, modifier: 0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerRecord {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Skill name (full or single letter) to entry.
    #[serde(default)]
    pub skills: BTreeMap<String, SkillEntry>,
    #[serde(default)]
    pub tag: Option<String>,
    /// Equipment id currently worn.
    #[serde(default)]
    pub equipped: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_type: String,
    pub level: u8,
    pub footprint: Footprint,
    /// Explicit ordinal; assigned in record order when absent.
    #[serde(default)]
    pub ordinal: Option<u16>,
    #[serde(default)]
    pub occupants: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub bonus: BTreeMap<String, u32>,
    #[serde(default)]
    pub compatibility: Option<String>,
}

/// Everything the engine needs from the outside world for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub workers: Vec<WorkerRecord>,
    #[serde(default)]
    pub stations: Vec<StationRecord>,
    #[serde(default)]
    pub equipment: Vec<EquipmentRecord>,
    /// Equipment ids free for assignment, one entry per physical item.
    #[serde(default)]
    pub inventory: Vec<String>,
    /// Habitat happiness, 0-100.
    #[serde(default)]
    pub happiness: f64,
}

/// Result of [`Snapshot::ingest`].
#[derive(Debug, Clone)]
pub struct IngestedSnapshot {
    /// Baseline plan: snapshot occupants assigned, worn items bound.
    pub plan: AssignmentPlan,
    pub happiness: f64,
    pub diagnostics: PlanDiagnostics,
}

impl IngestedSnapshot {
    /// True when at least one production station had occupants.
    pub fn has_productive_baseline(&self) -> bool {
        self.plan
            .stations()
            .iter()
            .any(|s| s.is_production() && !s.is_empty())
    }
}

impl Snapshot {
    /// Resolves the snapshot into a baseline plan.
    ///
    /// # Errors
    ///
    /// [`CrewForgeError::MissingCatalogEntry`] for an unknown station type,
    /// [`CrewForgeError::DuplicateStation`] when two records share an
    /// explicit identity.
    pub fn ingest(&self, catalog: &Catalog) -> Result<IngestedSnapshot> {
        let mut diagnostics = PlanDiagnostics::default();

        let equipment = self.equipment_catalog();
        let stations = self.resolve_stations(catalog)?;

        let mut workers = Vec::with_capacity(self.workers.len());
        let mut worn: Vec<Option<Equipment>> = Vec::with_capacity(self.workers.len());
        let mut seen_ids = HashSet::new();
        for record in &self.workers {
            if !seen_ids.insert(record.id) {
                diagnostics.duplicate_records += 1;
                continue;
            }
            let item = match &record.equipped {
                Some(id) => {
                    let found = equipment.get(id.as_str()).cloned();
                    if found.is_none() {
                        diagnostics.unknown_equipment_refs += 1;
                    }
                    found
                }
                None => None,
            };
            let skills = read_skills(record, item.is_none(), &mut diagnostics);
            workers.push(Worker {
                id: WorkerId(record.id),
                name: record.name.clone(),
                skills,
                tag: record.tag.clone(),
            });
            worn.push(item);
        }

        let mut items = Vec::new();
        let mut bindings = Vec::new();
        for (worker, item) in worn.into_iter().enumerate() {
            if let Some(equipment) = item {
                // An item the wearer may not wear is released to the pool.
                if equipment.fits(workers[worker].tag.as_deref()) {
                    bindings.push((items.len(), worker));
                } else {
                    diagnostics.incompatible_bindings += 1;
                }
                items.push(ItemInstance {
                    equipment,
                    origin: ItemOrigin::Binding,
                });
            }
        }
        for id in &self.inventory {
            match equipment.get(id.as_str()) {
                Some(equipment) => items.push(ItemInstance {
                    equipment: equipment.clone(),
                    origin: ItemOrigin::Inventory,
                }),
                None => diagnostics.unknown_equipment_refs += 1,
            }
        }

        let mut plan = AssignmentPlan::new(workers, stations, items);
        for (item, worker) in bindings {
            plan.bind_item(item, worker)?;
        }

        let index: HashMap<u64, usize> = plan
            .workers()
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.0, i))
            .collect();
        for (station, record) in self.stations.iter().enumerate() {
            for occupant in &record.occupants {
                let Some(&worker) = index.get(occupant) else {
                    diagnostics.unknown_worker_refs += 1;
                    continue;
                };
                if plan.station_of(worker).is_some() {
                    diagnostics.duplicate_records += 1;
                    continue;
                }
                if plan.station(station).is_full() {
                    diagnostics.over_capacity_baseline += 1;
                    continue;
                }
                plan.try_assign(worker, station)?;
            }
        }

        Ok(IngestedSnapshot {
            plan,
            happiness: self.happiness,
            diagnostics,
        })
    }

    fn equipment_catalog(&self) -> HashMap<&str, Equipment> {
        self.equipment
            .iter()
            .map(|record| {
                let mut bonus = SkillVector::zero();
                for (name, value) in &record.bonus {
                    if let Some(skill) = Skill::from_name(name) {
                        bonus.set(skill, *value);
                    }
                }
                let item = Equipment {
                    id: EquipmentId::new(record.id.clone()),
                    name: record.name.clone(),
                    bonus,
                    compatibility: Compatibility::from_tag(record.compatibility.as_deref()),
                };
                (record.id.as_str(), item)
            })
            .collect()
    }

    fn resolve_stations(&self, catalog: &Catalog) -> Result<Vec<Station>> {
        let mut taken: HashSet<StationKey> = HashSet::new();
        let explicit: Vec<Option<StationKey>> = self
            .stations
            .iter()
            .map(|record| -> Result<Option<StationKey>> {
                let station_type = parse_station_type(&record.station_type)?;
                Ok(record.ordinal.map(|ordinal| {
                    StationKey::new(station_type, record.level.max(1), record.footprint, ordinal)
                }))
            })
            .collect::<Result<_>>()?;
        for key in explicit.iter().flatten() {
            if !taken.insert(*key) {
                return Err(CrewForgeError::DuplicateStation(key.to_string()));
            }
        }

        let mut stations = Vec::with_capacity(self.stations.len());
        for (record, key) in self.stations.iter().zip(explicit) {
            let key = match key {
                Some(key) => key,
                None => {
                    let station_type = parse_station_type(&record.station_type)?;
                    let mut candidate =
                        StationKey::new(station_type, record.level.max(1), record.footprint, 0);
                    while taken.contains(&candidate) {
                        candidate.ordinal += 1;
                    }
                    taken.insert(candidate);
                    candidate
                }
            };
            stations.push(Station::from_catalog(key, catalog)?);
        }
        Ok(stations)
    }
}

fn parse_station_type(name: &str) -> Result<StationType> {
    StationType::from_name(name).ok_or_else(|| CrewForgeError::MissingCatalogEntry {
        station_type: name.to_string(),
    })
}

/// Builds the base skill vector. When the worn item is unknown the modifier
/// is folded into the base, since no binding will supply it.
fn read_skills(
    record: &WorkerRecord,
    fold_modifier: bool,
    diagnostics: &mut PlanDiagnostics,
) -> SkillVector {
    let mut entries: [Option<SkillEntry>; Skill::COUNT] = [None; Skill::COUNT];
    for (name, entry) in &record.skills {
        if let Some(skill) = Skill::from_name(name) {
            entries[skill.index()] = Some(*entry);
        }
    }

    let mut skills = SkillVector::zero();
    for skill in Skill::ALL {
        let Some(entry) = entries[skill.index()] else {
            diagnostics.malformed_defaults += 1;
            continue;
        };
        let mut value = entry.value;
        if fold_modifier && record.equipped.is_some() {
            value = value.saturating_add(entry.modifier);
        }
        if value < 0 {
            diagnostics.malformed_defaults += 1;
            continue;
        }
        skills.set(skill, u32::try_from(value).unwrap_or(u32::MAX));
    }
    skills
}
