//! Station deficits against fixed class targets.

use std::collections::BTreeMap;

use crewforge_core::{ideal_total, AssignmentPlan, MoraleFactor, StationClass, ThroughputTable};

/// Class mean times frozen at the start of the equipment phase.
///
/// Targets do not move while items are handed out, so one station's gain
/// never changes another station's deficit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassTargets {
    targets: BTreeMap<StationClass, f64>,
}

impl ClassTargets {
    pub fn from_table(table: &ThroughputTable) -> Self {
        Self {
            targets: table.class_means().clone(),
        }
    }

    pub fn target(&self, class: StationClass) -> Option<f64> {
        self.targets.get(&class).copied()
    }

    /// Skill still missing for `station` to reach its class target.
    ///
    /// Negative when the station is already faster than the target; `None`
    /// for stations that do not produce or whose class has no target.
    ///
    /// ```
    /// use crewforge_core::{MoraleFactor, StationType};
    /// use crewforge_solver::phase::equipment::ClassTargets;
    /// use crewforge_test::{spa, three_skill_catalog, PlanBuilder};
    ///
    /// // Totals 20 and 5 on pool 100: times 5.0 and 20.0, class mean 12.5.
    /// let plan = PlanBuilder::new(three_skill_catalog(1))
    ///     .station(StationType::Geothermal)
    ///     .station(StationType::Geothermal)
    ///     .worker(spa(1, 20, 0, 0))
    ///     .worker(spa(2, 5, 0, 0))
    ///     .assign(0, 0)
    ///     .assign(1, 1)
    ///     .build();
    /// let targets = ClassTargets::from_table(&plan.throughput(MoraleFactor::NONE));
    ///
    /// // 100 / 12.5 = 8 skill needed.
    /// assert_eq!(targets.deficit(&plan, 1, MoraleFactor::NONE), Some(3.0));
    /// assert_eq!(targets.deficit(&plan, 0, MoraleFactor::NONE), Some(-12.0));
    /// ```
    pub fn deficit(&self, plan: &AssignmentPlan, station: usize, morale: MoraleFactor) -> Option<f64> {
        let s = plan.station(station);
        if !s.is_production() {
            return None;
        }
        let target = self.target(s.class)?;
        let ideal = ideal_total(s.pool?, target, morale)?;
        Some(ideal - plan.station_total(station))
    }
}
