//! Process configuration read from the environment.

use crate::{CellqError, JobKind, Result};
use std::fmt;
use std::time::Duration;

pub const S3_ACCESS_KEY: &str = "S3_ACCESS_KEY";
pub const S3_SECRET_KEY: &str = "S3_SECRET_KEY";
pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
pub const S3_ENDPOINT: &str = "S3_ENDPOINT";
pub const S3_REGION: &str = "S3_REGION";
pub const BROKER_HOST: &str = "BROKER_HOST";
pub const BROKER_PORT: &str = "BROKER_PORT";
pub const BROKER_USER: &str = "BROKER_USER";
pub const BROKER_PASSWORD: &str = "BROKER_PASSWORD";
pub const BROKER_JOB_QUEUE: &str = "BROKER_JOB_QUEUE";
pub const BROKER_RESULT_QUEUE: &str = "BROKER_RESULT_QUEUE";
pub const WORKER_KIND: &str = "WORKER_KIND";
pub const WORKER_BATCH_SIZE: &str = "WORKER_BATCH_SIZE";
pub const WORKER_POLL_INTERVAL_MS: &str = "WORKER_POLL_INTERVAL_MS";
pub const WORKER_MAX_IDLE_POLLS: &str = "WORKER_MAX_IDLE_POLLS";
pub const CELLPHONEDB_BIN: &str = "CELLPHONEDB_BIN";
pub const CELLPHONEDB_THREADS: &str = "CELLPHONEDB_THREADS";

/// Everything a worker needs to know before it takes its first job
#[derive(Debug, Clone)]
pub struct Settings {
    pub broker: BrokerSettings,
    pub storage: StorageSettings,
    pub worker: WorkerSettings,
}

#[derive(Clone)]
pub struct BrokerSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub job_queue: String,
    pub result_queue: String,
}

#[derive(Clone)]
pub struct StorageSettings {
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub endpoint: String,
    pub region: String,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Which handler serves the job queue
    pub kind: JobKind,
    /// How many jobs to drain before the process exits
    pub batch_size: usize,
    /// How long to wait after finding the job queue empty
    pub poll_interval: Duration,
    /// How many empty polls to tolerate before giving up, None polls forever
    pub max_idle_polls: Option<usize>,
    /// The analysis program to invoke
    pub analyzer_program: String,
    /// Threads handed to the analysis program
    pub analyzer_threads: u32,
}

impl Settings {
    /// Read the settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let storage = StorageSettings {
            access_key: env.required(S3_ACCESS_KEY)?,
            secret_key: env.required(S3_SECRET_KEY)?,
            bucket: env.required(S3_BUCKET_NAME)?,
            endpoint: env.required(S3_ENDPOINT)?,
            region: env
                .optional(S3_REGION)
                .unwrap_or_else(|| "us-east-1".to_string()),
        };

        let broker = BrokerSettings {
            host: env.required(BROKER_HOST)?,
            port: env.parsed(BROKER_PORT, &env.required(BROKER_PORT)?)?,
            username: env.required(BROKER_USER)?,
            password: env.required(BROKER_PASSWORD)?,
            job_queue: env.required(BROKER_JOB_QUEUE)?,
            result_queue: env.required(BROKER_RESULT_QUEUE)?,
        };

        let kind = match env.optional(WORKER_KIND) {
            Some(value) => env.parsed(WORKER_KIND, &value)?,
            None => JobKind::from_queue_name(&broker.job_queue),
        };

        let worker = WorkerSettings {
            kind,
            batch_size: env.parsed_or(WORKER_BATCH_SIZE, 3)?,
            poll_interval: Duration::from_millis(env.parsed_or(WORKER_POLL_INTERVAL_MS, 1000)?),
            max_idle_polls: match env.optional(WORKER_MAX_IDLE_POLLS) {
                Some(value) => Some(env.parsed(WORKER_MAX_IDLE_POLLS, &value)?),
                None => None,
            },
            analyzer_program: env
                .optional(CELLPHONEDB_BIN)
                .unwrap_or_else(|| "cellphonedb".to_string()),
            analyzer_threads: env.parsed_or(CELLPHONEDB_THREADS, 4)?,
        };

        Ok(Self {
            broker,
            storage,
            worker,
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F: Fn(&str) -> Option<String>> Env<F> {
    fn optional(&self, name: &'static str) -> Option<String> {
        (self.lookup)(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String> {
        self.optional(name).ok_or(CellqError::MissingEnvVar(name))
    }

    fn parsed<T: std::str::FromStr>(&self, name: &'static str, value: &str) -> Result<T> {
        value
            .parse()
            .map_err(|_| CellqError::InvalidEnvVar(name, value.to_string()))
    }

    fn parsed_or<T: std::str::FromStr>(&self, name: &'static str, fallback: T) -> Result<T> {
        match self.optional(name) {
            Some(value) => self.parsed(name, &value),
            None => Ok(fallback),
        }
    }
}

impl fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("job_queue", &self.job_queue)
            .field("result_queue", &self.result_queue)
            .finish()
    }
}

impl fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageSettings")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .finish()
    }
}
