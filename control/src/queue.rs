use std::{cmp::Ordering, slice};

use schema::{comparator, Aircraft, PriorityQueue};

/// A queue kept in priority order on every insertion.
/// Insertion scans linearly for the first lower-priority aircraft, so both
/// insert & removal are O(n); in exchange positions are always known exactly.
#[derive(Default, Clone, Debug)]
pub struct SortedQueue {
    /// Aircraft awaiting service, highest priority first
    queue: Vec<Aircraft>,
}

impl SortedQueue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PriorityQueue for SortedQueue {
    type Items<'a> = slice::Iter<'a, Aircraft>;

    fn items(&self) -> Self::Items<'_> {
        self.queue.iter()
    }

    fn size(&self) -> usize {
        self.queue.len()
    }

    fn insert(&mut self, item: Aircraft) -> usize {
        // Land in front of the first aircraft we strictly outrank; ties stay behind
        let position = self
            .queue
            .iter()
            .position(|queued| {
                matches!(
                    comparator::compare(Some(&item), Some(queued)),
                    Ordering::Greater
                )
            })
            .unwrap_or(self.queue.len());

        self.queue.insert(position, item);
        position
    }

    fn remove_highest(&mut self) -> Option<Aircraft> {
        if self.queue.is_empty() {
            return None;
        }

        Some(self.queue.remove(0))
    }
}
