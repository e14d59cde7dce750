use crate::group::Group;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

pub const DEFAULT_DISTANCE: i32 = 120;
pub const DISTANCE_RANGE: RangeInclusive<i32> = 30..=300;

pub const DEFAULT_CHARGE: i32 = -300;
pub const CHARGE_RANGE: RangeInclusive<i32> = -800..=-50;

/// The one authoritative record of the viewer. Everything on screen is
/// derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub selection: BTreeSet<String>,
    pub groups: BTreeSet<Group>,
    pub labels: bool,

    /// Link distance of the force layout
    pub distance: i32,

    /// Node charge of the force layout
    pub charge: i32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            selection: BTreeSet::new(),
            groups: Group::ALL.into_iter().collect(),
            labels: true,
            distance: DEFAULT_DISTANCE,
            charge: DEFAULT_CHARGE,
        }
    }
}

impl ViewState {
    pub fn set_distance(&mut self, distance: i32) {
        self.distance = clamp(distance, &DISTANCE_RANGE);
    }

    pub fn set_charge(&mut self, charge: i32) {
        self.charge = clamp(charge, &CHARGE_RANGE);
    }

    pub fn is_active(&self, group: Group) -> bool {
        self.groups.contains(&group)
    }
}

fn clamp(value: i32, range: &RangeInclusive<i32>) -> i32 {
    value.clamp(*range.start(), *range.end())
}
