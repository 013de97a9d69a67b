//! Station identity and per-station state.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::catalog::{Catalog, Footprint, StationClass, StationType};
use crate::error::Result;
use crate::skill::SkillRequirement;

/// Structural identity of a station.
///
/// Two stations of the same type, level and footprint are told apart by
/// their ordinal, assigned in snapshot order. Ordering follows field order,
/// so sorting keys groups identical stations together.
///
/// ```
/// use crewforge_core::{Footprint, StationKey, StationType};
///
/// let key = StationKey::new(StationType::Cafeteria, 3, Footprint::Triple, 0);
/// assert_eq!(key.to_string(), "Cafeteria/L3/triple#0");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StationKey {
    pub station_type: StationType,
    pub level: u8,
    pub footprint: Footprint,
    pub ordinal: u16,
}

impl StationKey {
    pub fn new(station_type: StationType, level: u8, footprint: Footprint, ordinal: u16) -> Self {
        Self {
            station_type,
            level,
            footprint,
            ordinal,
        }
    }
}

impl fmt::Display for StationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/L{}/{}#{}",
            self.station_type, self.level, self.footprint, self.ordinal
        )
    }
}

/// Worker indices held by one station. Inline up to the largest footprint.
pub type Members = SmallVec<[usize; 6]>;

/// A station with its catalog attributes resolved and its current members.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub key: StationKey,
    pub class: StationClass,
    pub requirement: SkillRequirement,
    /// `base_pool * size_multiplier`; `None` for non-producing stations.
    pub pool: Option<f64>,
    pub capacity: usize,
    pub cells: u32,
    /// Urgency rank; lower is more urgent. Starts at the class priority.
    pub priority: i32,
    pub(crate) members: Members,
}

impl Station {
    /// Builds an empty station, resolving its attributes from `catalog`.
    pub fn from_catalog(key: StationKey, catalog: &Catalog) -> Result<Self> {
        let resolved = catalog.resolve(key.station_type, key.footprint)?;
        Ok(Self {
            key,
            class: resolved.class,
            requirement: resolved.requirement,
            pool: resolved.pool,
            capacity: resolved.capacity,
            cells: resolved.cells,
            priority: resolved.class_priority,
            members: Members::new(),
        })
    }

    /// Assigned workers, in assignment order.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.members.len())
    }

    /// True when the station produces a resource and takes part in balancing.
    pub fn is_production(&self) -> bool {
        self.class.is_production() && self.pool.is_some()
    }

    /// Fill order score for initial assignment: `base^(level-1) * cells`.
    pub fn priority_score(&self, level_weight_base: f64) -> f64 {
        let exponent = i32::from(self.key.level.max(1)) - 1;
        level_weight_base.powi(exponent) * f64::from(self.cells)
    }

    /// Footprint-times-level value used to rank stations for equipment.
    pub fn value(&self) -> u32 {
        self.cells * u32::from(self.key.level)
    }
}
