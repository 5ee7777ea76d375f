//! Priority ordering for aircraft awaiting service.
//!
//! Every comparison answers "is `a` served before `b`?": `Greater` means `a`
//! has strictly higher priority. Rules are applied in order, each one only
//! breaking ties left by the previous:
//!
//! 1. an absent aircraft sorts below any present one
//! 2. `Passenger` before `Cargo`
//! 3. `Large` before `Small`
//! 4. earlier `time_added` first
use std::cmp::{Ordering, Reverse};

use crate::{Aircraft, AircraftSize, AircraftType, TimeAdded};

/// Compare two possibly-absent aircraft by priority
pub fn compare(a: Option<&Aircraft>, b: Option<&Aircraft>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    compare_type(a.aircraft_type(), b.aircraft_type())
        .then_with(|| compare_size(a.size(), b.size()))
        .then_with(|| compare_time_added(a.time_added(), b.time_added()))
}

pub fn compare_type(a: AircraftType, b: AircraftType) -> Ordering {
    use AircraftType::*;

    match (a, b) {
        (Passenger, Cargo) => Ordering::Greater,
        (Cargo, Passenger) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

pub fn compare_size(a: AircraftSize, b: AircraftSize) -> Ordering {
    use AircraftSize::*;

    match (a, b) {
        (Large, Small) => Ordering::Greater,
        (Small, Large) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Whoever arrived first is served first
pub fn compare_time_added(a: TimeAdded, b: TimeAdded) -> Ordering {
    b.cmp(&a)
}

/// Composite key which orders exactly like [`compare`], for containers
/// (e.g. `BinaryHeap`) that sort by key instead of by comparator.
///
/// ```
/// use std::collections::BinaryHeap;
/// use schema::{Aircraft, AircraftSize, AircraftType, PriorityKey, TimeAdded};
///
/// let cargo = Aircraft::new(AircraftType::Cargo, AircraftSize::Large, TimeAdded(1));
/// let passenger = Aircraft::new(AircraftType::Passenger, AircraftSize::Small, TimeAdded(2));
///
/// let mut heap = BinaryHeap::new();
/// heap.push((PriorityKey::from(&cargo), cargo));
/// heap.push((PriorityKey::from(&passenger), passenger.clone()));
///
/// assert_eq!(heap.pop().map(|(_, aircraft)| aircraft), Some(passenger));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PriorityKey(u8, u8, Reverse<TimeAdded>);

impl From<&Aircraft> for PriorityKey {
    fn from(aircraft: &Aircraft) -> Self {
        let type_rank = match aircraft.aircraft_type() {
            AircraftType::Cargo => 0,
            AircraftType::Passenger => 1,
        };
        let size_rank = match aircraft.size() {
            AircraftSize::Small => 0,
            AircraftSize::Large => 1,
        };

        Self(type_rank, size_rank, Reverse(aircraft.time_added()))
    }
}
