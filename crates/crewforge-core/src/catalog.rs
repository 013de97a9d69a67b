//! Static station catalog.
//!
//! Lookup tables describing which skill each station type needs, how large
//! its resource pool is, and how many workers each footprint holds. The
//! catalog carries no behavior beyond lookups; [`Catalog::standard`] returns
//! the stock tables and custom catalogs can be assembled with the `with_*`
//! builders or deserialized from configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CrewForgeError, Result};
use crate::skill::{Skill, SkillRequirement};

/// Group of stations delivering the same resource.
///
/// All stations of a class share one balancing target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StationClass {
    Power,
    Water,
    Food,
    Medical,
    Science,
    Bottling,
    /// Overflow bucket; never produces.
    Training,
}

impl StationClass {
    pub const ALL: [StationClass; 7] = [
        StationClass::Power,
        StationClass::Water,
        StationClass::Food,
        StationClass::Medical,
        StationClass::Science,
        StationClass::Bottling,
        StationClass::Training,
    ];

    /// True for classes whose stations produce a resource.
    pub fn is_production(self) -> bool {
        self != StationClass::Training
    }

    pub fn name(self) -> &'static str {
        match self {
            StationClass::Power => "power",
            StationClass::Water => "water",
            StationClass::Food => "food",
            StationClass::Medical => "medical",
            StationClass::Science => "science",
            StationClass::Bottling => "bottling",
            StationClass::Training => "training",
        }
    }
}

impl fmt::Display for StationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Concrete station type as it appears in a habitat layout.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum StationType {
    Geothermal,
    Energy2,
    WaterPlant,
    Water2,
    Cafeteria,
    Hydroponic,
    MedBay,
    ScienceLab,
    NukaCola,
    Gym,
    Armory,
    Dojo,
    Classroom,
}

impl StationType {
    pub const ALL: [StationType; 13] = [
        StationType::Geothermal,
        StationType::Energy2,
        StationType::WaterPlant,
        StationType::Water2,
        StationType::Cafeteria,
        StationType::Hydroponic,
        StationType::MedBay,
        StationType::ScienceLab,
        StationType::NukaCola,
        StationType::Gym,
        StationType::Armory,
        StationType::Dojo,
        StationType::Classroom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StationType::Geothermal => "Geothermal",
            StationType::Energy2 => "Energy2",
            StationType::WaterPlant => "WaterPlant",
            StationType::Water2 => "Water2",
            StationType::Cafeteria => "Cafeteria",
            StationType::Hydroponic => "Hydroponic",
            StationType::MedBay => "MedBay",
            StationType::ScienceLab => "ScienceLab",
            StationType::NukaCola => "NukaCola",
            StationType::Gym => "Gym",
            StationType::Armory => "Armory",
            StationType::Dojo => "Dojo",
            StationType::Classroom => "Classroom",
        }
    }

    /// Parses a station type name, case-insensitively.
    ///
    /// Layout exports sometimes use the resource name instead of the room
    /// name; `Power`, `Water` and `Food` map to the base room of each class.
    pub fn from_name(name: &str) -> Option<StationType> {
        let lower = name.trim().to_ascii_lowercase();
        let ty = match lower.as_str() {
            "geothermal" | "power" => StationType::Geothermal,
            "energy2" => StationType::Energy2,
            "waterplant" | "water" => StationType::WaterPlant,
            "water2" => StationType::Water2,
            "cafeteria" | "food" => StationType::Cafeteria,
            "hydroponic" => StationType::Hydroponic,
            "medbay" => StationType::MedBay,
            "sciencelab" => StationType::ScienceLab,
            "nukacola" => StationType::NukaCola,
            "gym" => StationType::Gym,
            "armory" => StationType::Armory,
            "dojo" => StationType::Dojo,
            "classroom" => StationType::Classroom,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Footprint class of a station (how many cells it spans once merged).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Footprint {
    Single,
    Double,
    Triple,
}

impl Footprint {
    pub const ALL: [Footprint; 3] = [Footprint::Single, Footprint::Double, Footprint::Triple];

    /// Maps a merge level (1-3) to a footprint. Out-of-range levels clamp.
    pub fn from_merge_level(level: u8) -> Footprint {
        match level {
            0 | 1 => Footprint::Single,
            2 => Footprint::Double,
            _ => Footprint::Triple,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Footprint::Single => "single",
            Footprint::Double => "double",
            Footprint::Triple => "triple",
        }
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Size parameters for one footprint class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FootprintSpec {
    /// Layout cells covered; also the size factor in priority scores.
    pub cells: u32,
    /// Multiplier applied to the class base pool.
    pub size_multiplier: f64,
    /// Maximum assigned workers.
    pub capacity: usize,
}

/// One [`FootprintSpec`] per [`Footprint`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FootprintTable {
    pub single: FootprintSpec,
    pub double: FootprintSpec,
    pub triple: FootprintSpec,
}

impl FootprintTable {
    pub fn get(&self, footprint: Footprint) -> &FootprintSpec {
        match footprint {
            Footprint::Single => &self.single,
            Footprint::Double => &self.double,
            Footprint::Triple => &self.triple,
        }
    }

    pub fn get_mut(&mut self, footprint: Footprint) -> &mut FootprintSpec {
        match footprint {
            Footprint::Single => &mut self.single,
            Footprint::Double => &mut self.double,
            Footprint::Triple => &mut self.triple,
        }
    }
}

impl Default for FootprintTable {
    fn default() -> Self {
        Self {
            single: FootprintSpec {
                cells: 3,
                size_multiplier: 1.0,
                capacity: 2,
            },
            double: FootprintSpec {
                cells: 6,
                size_multiplier: 2.0,
                capacity: 4,
            },
            triple: FootprintSpec {
                cells: 9,
                size_multiplier: 3.0,
                capacity: 6,
            },
        }
    }
}

/// Per-class catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClassSpec {
    pub class: StationClass,
    /// Base resource pool; `None` for classes that never produce.
    pub base_pool: Option<f64>,
    /// Lower values are more urgent.
    pub priority: i32,
}

/// Per-station-type catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StationSpec {
    pub station_type: StationType,
    pub class: StationClass,
    /// Skill read by this station. For training stations, the trained skill.
    pub requirement: SkillRequirement,
}

/// Complete lookup tables for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Catalog {
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub stations: Vec<StationSpec>,
    #[serde(default)]
    pub footprints: FootprintTable,
}

/// Station attributes resolved from the catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStation {
    pub class: StationClass,
    pub requirement: SkillRequirement,
    pub pool: Option<f64>,
    pub capacity: usize,
    pub cells: u32,
    pub class_priority: i32,
}

impl Catalog {
    /// A catalog with no classes or stations and the default footprints.
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
            stations: Vec::new(),
            footprints: FootprintTable::default(),
        }
    }

    /// The stock habitat tables.
    pub fn standard() -> Self {
        use SkillRequirement::{Dual, Single};

        let classes = [
            (StationClass::Power, Some(1320.0), 0),
            (StationClass::Water, Some(960.0), 1),
            (StationClass::Food, Some(960.0), 2),
            (StationClass::Medical, Some(1800.0), 3),
            (StationClass::Science, Some(1800.0), 4),
            (StationClass::Bottling, Some(1200.0), 5),
            (StationClass::Training, None, 6),
        ];
        let stations = [
            (StationType::Geothermal, StationClass::Power, Single(Skill::Strength)),
            (StationType::Energy2, StationClass::Power, Single(Skill::Strength)),
            (StationType::WaterPlant, StationClass::Water, Single(Skill::Perception)),
            (StationType::Water2, StationClass::Water, Single(Skill::Perception)),
            (StationType::Cafeteria, StationClass::Food, Single(Skill::Agility)),
            (StationType::Hydroponic, StationClass::Food, Single(Skill::Agility)),
            (StationType::MedBay, StationClass::Medical, Single(Skill::Intelligence)),
            (StationType::ScienceLab, StationClass::Science, Single(Skill::Intelligence)),
            (
                StationType::NukaCola,
                StationClass::Bottling,
                Dual(Skill::Perception, Skill::Agility),
            ),
            (StationType::Gym, StationClass::Training, Single(Skill::Strength)),
            (StationType::Armory, StationClass::Training, Single(Skill::Perception)),
            (StationType::Dojo, StationClass::Training, Single(Skill::Agility)),
            (StationType::Classroom, StationClass::Training, Single(Skill::Intelligence)),
        ];

        Self {
            classes: classes
                .into_iter()
                .map(|(class, base_pool, priority)| ClassSpec {
                    class,
                    base_pool,
                    priority,
                })
                .collect(),
            stations: stations
                .into_iter()
                .map(|(station_type, class, requirement)| StationSpec {
                    station_type,
                    class,
                    requirement,
                })
                .collect(),
            footprints: FootprintTable::default(),
        }
    }

    /// Adds or replaces a class entry.
    pub fn with_class(mut self, spec: ClassSpec) -> Self {
        self.classes.retain(|c| c.class != spec.class);
        self.classes.push(spec);
        self
    }

    /// Adds or replaces a station type entry.
    pub fn with_station(mut self, spec: StationSpec) -> Self {
        self.stations.retain(|s| s.station_type != spec.station_type);
        self.stations.push(spec);
        self
    }

    /// Replaces the parameters of one footprint class.
    pub fn with_footprint(mut self, footprint: Footprint, spec: FootprintSpec) -> Self {
        *self.footprints.get_mut(footprint) = spec;
        self
    }

    pub fn class(&self, class: StationClass) -> Option<&ClassSpec> {
        self.classes.iter().find(|c| c.class == class)
    }

    pub fn station(&self, station_type: StationType) -> Option<&StationSpec> {
        self.stations.iter().find(|s| s.station_type == station_type)
    }

    pub fn footprint(&self, footprint: Footprint) -> &FootprintSpec {
        self.footprints.get(footprint)
    }

    /// Resolves pool, capacity and requirement for a station.
    ///
    /// # Errors
    ///
    /// Returns [`CrewForgeError::MissingCatalogEntry`] or
    /// [`CrewForgeError::MissingClassEntry`] when the tables cannot describe
    /// the station; the planner cannot compute a pool size without them.
    pub fn resolve(&self, station_type: StationType, footprint: Footprint) -> Result<ResolvedStation> {
        let spec = self
            .station(station_type)
            .ok_or_else(|| CrewForgeError::MissingCatalogEntry {
                station_type: station_type.name().to_string(),
            })?;
        let class = self
            .class(spec.class)
            .ok_or_else(|| CrewForgeError::MissingClassEntry {
                station_type,
                class: spec.class.name().to_string(),
            })?;
        let size = self.footprint(footprint);

        Ok(ResolvedStation {
            class: spec.class,
            requirement: spec.requirement,
            pool: class.base_pool.map(|base| base * size.size_multiplier),
            capacity: size.capacity,
            cells: size.cells,
            class_priority: class.priority,
        })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
