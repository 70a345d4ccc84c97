use cellq_core::*;
use serde_json::{Map, Value};

/// Job plan represents **a description** of a job to be queued soon and, _hopefully_, completed
#[derive(Debug, Clone)]
pub struct JobPlan {
    /// Identifier echoed back in the result
    pub id: String,

    /// The job JSON payload, without `job_id`
    pub payload: Map<String, Value>,
}

impl JobPlan {
    /// Create a new job plan; a `job_id` in the payload is kept, otherwise a ULID is generated
    pub fn new(payload: Value) -> Result<Self> {
        let Value::Object(mut payload) = payload else {
            return Err(CellqError::Job(
                JobFailure::new(FailureKind::InvalidPayload)
                    .description("Job payload must be a JSON object"),
            ));
        };
        let id = match payload.remove("job_id") {
            Some(Value::String(id)) if !id.is_empty() => id,
            _ => generate_job_id(),
        };
        Ok(Self { id, payload })
    }

    /// Override the job identifier
    pub fn job_id(mut self, id: impl ToString) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set a single payload field
    pub fn field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(name.to_string(), value.into());
        self
    }

    /// The queue message body for this plan
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut message = self.payload.clone();
        message.insert("job_id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::to_vec(&Value::Object(message))?)
    }
}
