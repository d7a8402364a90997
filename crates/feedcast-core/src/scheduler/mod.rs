mod service;
mod tasks;

pub use service::SchedulerService;
pub use tasks::{fetch_all_sources, publish_next};
