use std::fmt;

use thiserror::Error;

/// Queue operation that was attempted, used to describe rejections
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Enqueue,
    Dequeue,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enqueue => f.write_str("enqueue"),
            Self::Dequeue => f.write_str("dequeue"),
        }
    }
}

/// All errors produced by the intake queue.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("unable to compare aircraft type {0:?}")]
    InvalidAircraftType(String),
    #[error("unable to compare aircraft size {0:?}")]
    InvalidAircraftSize(String),
    #[error("invalid operation: attempting to {0} on a system that is not booted")]
    SystemNotBooted(Operation),
    #[error("invalid operation: attempt to dequeue from an empty queue")]
    EmptyQueue,
    #[error("queue dispatcher is no longer running")]
    DispatcherClosed,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
}
