use crate::failure::{FailureKind, JobFailure};
use serde_json::{Map, Value};
use std::fmt::Display;
use std::str::FromStr;

/// Kind of work a worker instance accepts; fixed for the lifetime of the worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobKind {
    /// Cell-cell communication analysis over meta and counts datasets.
    Method,
    /// Plot generation from earlier analysis outputs.
    Plot,
}

impl JobKind {
    /// Pick the kind conventionally served by the given job queue
    pub fn from_queue_name(queue: &str) -> Self {
        if queue == "plot_jobs" {
            JobKind::Plot
        } else {
            JobKind::Method
        }
    }
}

impl Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            JobKind::Method => "method",
            JobKind::Plot => "plot",
        };
        write!(f, "{}", str)
    }
}

impl FromStr for JobKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "method" => Ok(JobKind::Method),
            "plot" => Ok(JobKind::Plot),
            _ => Err(format!("Unknown job kind: {}", s)),
        }
    }
}

/// A job decoded from a queue message
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    /// Caller-supplied identifier, echoed in the result
    pub id: String,

    /// The kind of the worker that received the job
    pub kind: JobKind,

    /// The whole JSON object of the message, `job_id` included
    pub payload: Map<String, Value>,
}

impl Job {
    /// Decode a raw queue message into a job
    pub fn decode(body: &[u8], kind: JobKind) -> Result<Self, JobFailure> {
        let value: Value = serde_json::from_slice(body).map_err(|err| {
            JobFailure::new(FailureKind::InvalidPayload)
                .description(format!("Message is not valid JSON: {}", err))
        })?;

        let Value::Object(payload) = value else {
            return Err(JobFailure::new(FailureKind::InvalidPayload)
                .description("Message is not a JSON object"));
        };

        let id = match payload.get("job_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            Some(Value::String(_)) | Some(Value::Null) | None => {
                return Err(JobFailure::missing_field("job_id"));
            }
            Some(_) => return Err(JobFailure::invalid_parameter("job_id", "string")),
        };

        Ok(Self { id, kind, payload })
    }

    /// Best-effort read of `job_id` from a message that may not decode as a job
    pub fn peek_id(body: &[u8]) -> String {
        serde_json::from_slice::<Value>(body)
            .ok()
            .and_then(|value| match value.get("job_id")? {
                Value::String(id) => Some(id.clone()),
                Value::Number(id) => Some(id.to_string()),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn field(&self, field: &str) -> Option<&Value> {
        self.payload.get(field).filter(|value| !value.is_null())
    }

    /// A required string field
    pub fn require_str(&self, field: &str) -> Result<&str, JobFailure> {
        self.opt_str(field)?
            .ok_or_else(|| JobFailure::missing_field(field))
    }

    /// An optional string field; empty strings count as absent
    pub fn opt_str(&self, field: &str) -> Result<Option<&str>, JobFailure> {
        match self.field(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(JobFailure::invalid_parameter(field, "string")),
        }
    }

    /// A required floating point field, given as a number or numeric string
    pub fn require_f64(&self, field: &str) -> Result<f64, JobFailure> {
        self.opt_f64(field)?
            .ok_or_else(|| JobFailure::missing_field(field))
    }

    pub fn opt_f64(&self, field: &str) -> Result<Option<f64>, JobFailure> {
        let Some(value) = self.field(field) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number
            .filter(|n| n.is_finite())
            .map(Some)
            .ok_or_else(|| JobFailure::invalid_parameter(field, "number"))
    }

    /// A required non-negative integer field, given as a number or numeric string
    pub fn require_u32(&self, field: &str) -> Result<u32, JobFailure> {
        self.opt_u32(field)?
            .ok_or_else(|| JobFailure::missing_field(field))
    }

    pub fn opt_u32(&self, field: &str) -> Result<Option<u32>, JobFailure> {
        let Some(value) = self.field(field) else {
            return Ok(None);
        };
        let number = match value {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        };
        number
            .map(Some)
            .ok_or_else(|| JobFailure::invalid_parameter(field, "non-negative integer"))
    }

    /// A boolean flag; absent means false
    pub fn flag(&self, field: &str) -> Result<bool, JobFailure> {
        let Some(value) = self.field(field) else {
            return Ok(false);
        };
        match value {
            Value::Bool(b) => Ok(*b),
            Value::Number(n) => Ok(n.as_f64().is_some_and(|n| n != 0.0)),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" | "" => Ok(false),
                _ => Err(JobFailure::invalid_parameter(field, "boolean")),
            },
            _ => Err(JobFailure::invalid_parameter(field, "boolean")),
        }
    }
}
