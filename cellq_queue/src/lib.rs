//! `cellq_queue` owns the broker side of a cellq worker.
//!
//! It provides the broker connection traits with a Redis implementation, the
//! connection manager that rebuilds stale connections, the result publisher
//! and an interface for submitting jobs.

mod connection;
mod job_plan;
mod manager;
mod publisher;
mod redis_link;
mod submitter;

pub use connection::{Connector, QueueConnection};
pub use job_plan::JobPlan;
pub use manager::ConnectionManager;
pub use publisher::Publisher;
pub use redis_link::{RedisConnection, RedisConnector};
pub use submitter::Submitter;

pub mod prelude {
    pub use crate::{
        ConnectionManager, Connector, JobPlan, Publisher, QueueConnection, RedisConnector,
        Submitter,
    };
}
