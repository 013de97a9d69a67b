//! Relocation of misplaced worn items.
//!
//! An item is misplaced when its holder may not wear it, or when the holder
//! is unassigned or seated where the item's dominant skill is not read. Such
//! an item moves to the weakest unequipped, compatible member of the
//! benefiting station with the largest deficit. An item its holder may not
//! wear is released when no such seat exists.
//! Sweeps repeat until one moves nothing, since freeing a holder can open a
//! seat for an item passed over earlier.

use crewforge_core::{AssignmentPlan, MoraleFactor, Result};

use super::deficit::ClassTargets;
use super::{BindingKind, BindingRecord};

/// True when the item is held by a worker who may not wear it, or whose
/// station gains nothing from its dominant bonus.
pub fn is_misplaced(plan: &AssignmentPlan, item: usize) -> bool {
    let Some(holder) = plan.holder_of(item) else {
        return false;
    };
    if !fits_holder(plan, item, holder) {
        return true;
    }
    let Some(skill) = plan.item(item).equipment.dominant_skill() else {
        return false;
    };
    match plan.station_of(holder) {
        Some(station) => {
            let station = plan.station(station);
            !(station.is_production() && station.requirement.involves(skill))
        }
        None => true,
    }
}

/// Moves every misplaced item that has somewhere better to go.
///
/// Items with no benefiting station that has a free, compatible seat stay
/// where they are, unless the holder may not wear them. Running this on its
/// own output moves nothing.
pub fn relocate_misplaced(
    plan: &mut AssignmentPlan,
    targets: &ClassTargets,
    morale: MoraleFactor,
) -> Result<Vec<BindingRecord>> {
    let mut records = Vec::new();
    loop {
        let mut moved = 0;
        for item in 0..plan.item_count() {
            if !is_misplaced(plan, item) {
                continue;
            }
            let Some((station, worker)) = destination(plan, item, targets, morale) else {
                let holder = plan.holder_of(item);
                if holder.is_some_and(|h| !fits_holder(plan, item, h)) {
                    plan.unbind_item(item);
                    moved += 1;
                }
                continue;
            };
            let from = plan.unbind_item(item);
            plan.bind_item(item, worker)?;
            let equipment = &plan.item(item).equipment;
            records.push(BindingRecord {
                item: equipment.id.clone(),
                worker: plan.worker(worker).id,
                station: plan.station(station).key,
                from_worker: from.map(|w| plan.worker(w).id),
                kind: BindingKind::Relocated,
                bonus: equipment.bonus_for(&plan.station(station).requirement),
            });
            moved += 1;
        }
        if moved == 0 {
            return Ok(records);
        }
    }
}

fn fits_holder(plan: &AssignmentPlan, item: usize, holder: usize) -> bool {
    plan.item(item)
        .equipment
        .fits(plan.worker(holder).tag.as_deref())
}

/// Best station and seat for a misplaced item.
fn destination(
    plan: &AssignmentPlan,
    item: usize,
    targets: &ClassTargets,
    morale: MoraleFactor,
) -> Option<(usize, usize)> {
    let equipment = &plan.item(item).equipment;
    let skill = equipment.dominant_skill()?;

    let mut best: Option<(usize, usize, f64)> = None;
    for station in 0..plan.station_count() {
        let s = plan.station(station);
        if !(s.is_production() && s.requirement.involves(skill)) {
            continue;
        }
        let seat = s
            .members()
            .iter()
            .copied()
            .filter(|w| plan.item_of(*w).is_none())
            .filter(|w| equipment.fits(plan.worker(*w).tag.as_deref()))
            .map(|w| (w, plan.contribution(w, &s.requirement)))
            .fold(None, |low: Option<(usize, f64)>, (w, c)| match low {
                Some((_, lc)) if lc <= c => low,
                _ => Some((w, c)),
            });
        let Some((worker, _)) = seat else {
            continue;
        };
        let deficit = targets
            .deficit(plan, station, morale)
            .unwrap_or(f64::NEG_INFINITY);
        if best.map_or(true, |(_, _, d)| deficit > d) {
            best = Some((station, worker, deficit));
        }
    }
    best.map(|(station, worker, _)| (station, worker))
}
