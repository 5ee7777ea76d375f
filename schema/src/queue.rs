use itertools::Itertools;

use crate::{comparator, Aircraft};

/// An ordered container of aircraft, highest priority at the front
pub trait PriorityQueue {
    /// Aircraft currently held, from the front (served next) to the back
    type Items<'a>: Iterator<Item = &'a Aircraft>
    where
        Self: 'a;

    fn items<'a>(&'a self) -> Self::Items<'a>;

    /// Number of aircraft currently held
    fn size(&self) -> usize;

    /// Place an aircraft behind everything of equal or higher priority,
    /// returning the zero-based position it landed at.
    fn insert(&mut self, item: Aircraft) -> usize;

    /// Remove the aircraft at the front, or `None` if the queue is empty
    fn remove_highest(&mut self) -> Option<Aircraft>;

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether no aircraft is queued behind one of lower priority
    fn is_prioritized(&self) -> bool {
        self.items()
            .tuple_windows()
            .all(|(a, b)| comparator::compare(Some(a), Some(b)).is_ge())
    }
}
