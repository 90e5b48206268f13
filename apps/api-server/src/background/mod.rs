//! Background tasks running alongside the HTTP workers.

mod publisher;

pub use publisher::{PublisherConfig, ScheduledPublisher, SweepReport};
