//! Equipment items and their compatibility rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::skill::{Skill, SkillRequirement, SkillVector};

/// Catalog identifier of an equipment kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EquipmentId(pub String);

impl EquipmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EquipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which workers may hold an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compatibility {
    #[default]
    Any,
    /// Only workers carrying this tag (compared case-insensitively).
    Only(String),
}

impl Compatibility {
    /// Parses a catalog compatibility tag. Empty or `"any"` means unrestricted.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag.map(str::trim) {
            None | Some("") => Compatibility::Any,
            Some(t) if t.eq_ignore_ascii_case("any") => Compatibility::Any,
            Some(t) => Compatibility::Only(t.to_string()),
        }
    }

    pub fn allows(&self, worker_tag: Option<&str>) -> bool {
        match self {
            Compatibility::Any => true,
            Compatibility::Only(required) => {
                worker_tag.is_some_and(|t| t.trim().eq_ignore_ascii_case(required))
            }
        }
    }
}

/// One equipment kind from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub bonus: SkillVector,
    #[serde(default)]
    pub compatibility: Compatibility,
}

impl Equipment {
    pub fn new(id: impl Into<String>, name: impl Into<String>, bonus: SkillVector) -> Self {
        Self {
            id: EquipmentId::new(id),
            name: name.into(),
            bonus,
            compatibility: Compatibility::Any,
        }
    }

    pub fn with_compatibility(mut self, compatibility: Compatibility) -> Self {
        self.compatibility = compatibility;
        self
    }

    /// Sum of all bonus entries.
    pub fn total_bonus(&self) -> u32 {
        self.bonus.total()
    }

    /// Skill receiving the largest bonus.
    pub fn dominant_skill(&self) -> Option<Skill> {
        self.bonus.dominant()
    }

    /// Bonus contributed toward `requirement`.
    pub fn bonus_for(&self, requirement: &SkillRequirement) -> f64 {
        requirement.value(&self.bonus)
    }

    /// Share of the total bonus that benefits `requirement`, in `[0, 1]`.
    pub fn efficiency_for(&self, requirement: &SkillRequirement) -> f64 {
        let total = self.total_bonus();
        if total == 0 {
            return 0.0;
        }
        self.bonus_for(requirement) / f64::from(total)
    }

    /// True if a station reading `requirement` benefits from the dominant bonus.
    pub fn benefits(&self, requirement: &SkillRequirement) -> bool {
        self.dominant_skill()
            .is_some_and(|skill| requirement.involves(skill))
    }

    pub fn fits(&self, worker_tag: Option<&str>) -> bool {
        self.compatibility.allows(worker_tag)
    }
}

/// Where an item instance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemOrigin {
    /// Already worn by a worker in the snapshot.
    Binding,
    /// Drawn from the free inventory.
    Inventory,
}

/// One physical item in a planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInstance {
    pub equipment: Equipment,
    pub origin: ItemOrigin,
}
