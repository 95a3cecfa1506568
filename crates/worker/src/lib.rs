//! Background job poller for AI improvement jobs.

pub mod poller;

pub use poller::JobPoller;
