//! Throughput model.
//!
//! A station's throughput is the time it needs to fill its resource pool:
//!
//! ```text
//! time = pool / (total_skill * (1 + morale_factor))
//! ```
//!
//! rounded to one decimal. A station with zero aggregate skill, or one with
//! no pool, has no defined time. Class means average the defined times of all
//! stations in a class; the overall mean averages every defined production
//! station and ignores training stations.
//!
//! Everything here is pure. The plan aggregate calls in through
//! [`AssignmentPlan::throughput`](crate::AssignmentPlan::throughput).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::StationClass;
use crate::plan::AssignmentPlan;
use crate::skill::SkillVector;
use crate::station::Station;


/// Habitat-wide morale multiplier, applied uniformly to every station.
///
/// ```
/// use crewforge_core::MoraleFactor;
///
/// let morale = MoraleFactor::from_happiness(50.0, 100.0);
/// assert_eq!(morale.value(), 0.5);
///
/// // Happiness outside 0-100 is clamped.
/// assert_eq!(MoraleFactor::from_happiness(140.0, 100.0).value(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MoraleFactor(f64);

impl MoraleFactor {
    /// No morale bonus.
    pub const NONE: MoraleFactor = MoraleFactor(0.0);

    /// Wraps a raw factor. Negative or non-finite values become zero.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            Self::NONE
        }
    }

    /// `clamp(happiness, 0, 100) / divisor`.
    pub fn from_happiness(happiness: f64, divisor: f64) -> Self {
        if !(divisor.is_finite() && divisor > 0.0) {
            return Self::NONE;
        }
        let happiness = if happiness.is_finite() {
            happiness.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self::new(happiness / divisor)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// `1 + factor`.
    pub fn multiplier(self) -> f64 {
        1.0 + self.0
    }
}

/// Rounds to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Smallest time a staffed station reports.
pub const MIN_TIME: f64 = 0.1;

/// Time for a pool given an aggregate skill. `None` when `total_skill <= 0`.
///
/// A defined time never rounds below [`MIN_TIME`].
pub fn time_for_total(pool: f64, total_skill: f64, morale: MoraleFactor) -> Option<f64> {
    if total_skill <= 0.0 {
        return None;
    }
    Some(round1(pool / (total_skill * morale.multiplier())).max(MIN_TIME))
}

/// Aggregate skill a station would need to reach `target_time`.
pub fn ideal_total(pool: f64, target_time: f64, morale: MoraleFactor) -> Option<f64> {
    if target_time <= 0.0 {
        return None;
    }
    Some(pool / (target_time * morale.multiplier()))
}

/// Time to produce for `station` staffed by workers with the given skills.
///
/// Dual-skill stations take the mean of the two skills per worker before
/// summing.
///
/// ```
/// use crewforge_core::{throughput, Catalog, Footprint, MoraleFactor, Skill, SkillVector};
/// use crewforge_core::{Station, StationKey, StationType};
///
/// let catalog = Catalog::standard();
/// let key = StationKey::new(StationType::Geothermal, 1, Footprint::Single, 0);
/// let station = Station::from_catalog(key, &catalog).unwrap();
///
/// let crew = [
///     SkillVector::single(Skill::Strength, 6),
///     SkillVector::single(Skill::Strength, 4),
/// ];
/// assert_eq!(throughput(&station, crew.iter(), MoraleFactor::NONE), Some(132.0));
/// assert_eq!(throughput(&station, std::iter::empty(), MoraleFactor::NONE), None);
/// ```
pub fn throughput<'a, I>(station: &Station, skills: I, morale: MoraleFactor) -> Option<f64>
where
    I: IntoIterator<Item = &'a SkillVector>,
{
    let pool = station.pool?;
    let total: f64 = skills
        .into_iter()
        .map(|s| station.requirement.value(s))
        .sum();
    time_for_total(pool, total, morale)
}

/// Read-only view of every station's time plus class and overall means.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputTable {
    times: Vec<Option<f64>>,
    classes: Vec<StationClass>,
    class_means: BTreeMap<StationClass, f64>,
    overall: Option<f64>,
}

impl ThroughputTable {
    pub fn compute(plan: &AssignmentPlan, morale: MoraleFactor) -> Self {
        let times: Vec<Option<f64>> = (0..plan.station_count())
            .map(|s| plan.station_time(s, morale))
            .collect();
        let classes: Vec<StationClass> = plan.stations().iter().map(|s| s.class).collect();

        let mut sums: BTreeMap<StationClass, (f64, usize)> = BTreeMap::new();
        let mut overall_sum = 0.0;
        let mut overall_count = 0usize;
        for (station, time) in plan.stations().iter().zip(&times) {
            if !station.is_production() {
                continue;
            }
            if let Some(t) = time {
                let entry = sums.entry(station.class).or_insert((0.0, 0));
                entry.0 += t;
                entry.1 += 1;
                overall_sum += t;
                overall_count += 1;
            }
        }
        let class_means = sums
            .into_iter()
            .map(|(class, (sum, n))| (class, sum / n as f64))
            .collect();
        let overall = (overall_count > 0).then(|| overall_sum / overall_count as f64);

        Self {
            times,
            classes,
            class_means,
            overall,
        }
    }

    pub fn time(&self, station: usize) -> Option<f64> {
        self.times[station]
    }

    pub fn times(&self) -> &[Option<f64>] {
        &self.times
    }

    /// Mean of defined times in a class; `None` if the class has none.
    pub fn class_mean(&self, class: StationClass) -> Option<f64> {
        self.class_means.get(&class).copied()
    }

    pub fn class_means(&self) -> &BTreeMap<StationClass, f64> {
        &self.class_means
    }

    /// Signed distance from the class mean. Positive means slower than mean.
    pub fn deviation(&self, station: usize) -> Option<f64> {
        let time = self.times[station]?;
        let mean = self.class_mean(self.classes[station])?;
        Some(time - mean)
    }

    /// Mean over all defined production stations.
    pub fn overall(&self) -> Option<f64> {
        self.overall
    }

    /// Number of stations with a defined time.
    pub fn defined_count(&self) -> usize {
        self.times.iter().filter(|t| t.is_some()).count()
    }
}
