//! `cellq_storage` provides object storage access for cellq workers.
//!
//! The `Storage` trait abstracts the object store, `S3Storage` implements it
//! for S3-compatible endpoints, and `StagingArea` moves objects between the
//! store and a scoped local directory for the duration of one job.

mod s3;
mod staging;
mod storage;

pub use s3::S3Storage;
pub use staging::StagingArea;
pub use storage::Storage;

pub mod prelude {
    pub use crate::{S3Storage, StagingArea, Storage};
}
