mod boot;
mod config;
mod queue;
mod service;

pub use boot::SystemBootService;
pub use config::ServiceConfig;
pub use queue::SortedQueue;
pub use service::{Dispatcher, QueueService, Response};
