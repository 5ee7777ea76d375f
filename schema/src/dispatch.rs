use std::num::NonZeroU8;
use std::time::Duration;

use futures::Future;

use crate::{Aircraft, QueueError};

/// Outcome of a successful enqueue
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enqueued {
    /// One-based position the aircraft was placed at
    pub added_at_position: usize,
    /// Queue length after the insertion
    pub total_size: usize,
    pub enqueued_item: Aircraft,
}

/// A `Dispatch` accepts queue requests immediately and resolves them once
/// they have been processed. Each returned future resolves exactly once.
pub trait Dispatch {
    type Enqueue: Future<Output = Result<Enqueued, QueueError>>;
    type Dequeue: Future<Output = Result<Aircraft, QueueError>>;

    /// Request that an aircraft be added to the queue
    fn enqueue(&self, item: Aircraft) -> Self::Enqueue;

    /// Request the highest-priority aircraft be released from the queue.
    /// Whether the queue is empty is decided when the request is processed,
    /// after every earlier request, not at the time of the call.
    fn dequeue(&self) -> Self::Dequeue;
}

/// Allows running in fast-forward or slow-motion instead of real-time
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    #[default]
    RealTime,
    /// Speed up processing by the provided multiplier (e.g. `2` gives double speed)
    FastForward(NonZeroU8),
    /// Slow down processing by the provided multiplier (e.g. `2` gives half speed)
    SlowMotion(NonZeroU8),
}

impl Speed {
    pub fn fast_forward(rate: u8) -> Option<Self> {
        NonZeroU8::new(rate).map(Self::FastForward)
    }

    pub fn slow_motion(rate: u8) -> Option<Self> {
        NonZeroU8::new(rate).map(Self::SlowMotion)
    }

    pub fn adjust_duration(&self, duration: Duration) -> Duration {
        match self {
            Self::RealTime => duration,
            Self::FastForward(x) => duration / x.get() as u32,
            Self::SlowMotion(x) => duration * x.get() as u32,
        }
    }
}
