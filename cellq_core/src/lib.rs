//! `cellq_core` provides shared utilities for the cellq worker.
//!
//! This crate includes common functionality used across the cellq components,
//! such as the job and result data model, storage key naming, configuration
//! and error types.

mod context;
mod error;
mod failure;
mod job;
mod job_stage;
mod keys;
mod result;
pub mod settings;
mod util;

pub use context::Context;
pub use error::{CellqError, Result};
pub use failure::{FailureKind, JobFailure};
pub use job::{Job, JobKind};
pub use job_stage::JobStage;
pub use keys::OutputKeys;
pub use result::{ErrorBody, JobResult, OutputRefs, ResultMessage};
pub use settings::Settings;
pub use util::{generate_job_id, get_hostname, key_extension};

pub mod prelude {
    pub use crate::{
        CellqError, Context, FailureKind, Job, JobFailure, JobKind, JobResult, JobStage,
        OutputKeys, Settings,
    };
}
