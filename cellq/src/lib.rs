//! cellq runs cell-cell communication analyses handed to it over a queue.
//!
//! This is an _umbrella crate_ re-exporting the components of the worker
//! from a single place: `core` for the job and result model, `queue` for the
//! broker side, `storage` for the object store and `consume` for the
//! dispatcher and the analysis handlers.
//!
//! The `worker` module wires them together the way the `cellq-worker`
//! binary runs them.

pub use cellq_consume as consume;
pub use cellq_core as core;
pub use cellq_queue as queue;
pub use cellq_storage as storage;

pub mod worker;

pub mod prelude {
    pub use crate::consume::prelude::*;
    pub use crate::core::prelude::*;
    pub use crate::queue::prelude::*;
    pub use crate::storage::prelude::*;
}
