pub mod comparator;

mod boot;
mod dispatch;
mod entities;
mod error;
mod queue;

pub use boot::{BootStatus, BootStatusProvider};
pub use comparator::PriorityKey;
pub use dispatch::{Dispatch, Enqueued, Speed};
pub use entities::{Aircraft, AircraftSize, AircraftSpecification, AircraftType, TimeAdded};
pub use error::{Operation, QueueError};
pub use queue::PriorityQueue;

pub const SAMPLE_AIRCRAFT_CSV_PATH: &'static str = "./test_data/aircraft.csv";
