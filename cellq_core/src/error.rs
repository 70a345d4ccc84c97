use crate::failure::JobFailure;

/// Return for cellq operations that can succeed (OK) or fail (Err)
pub type Result<T> = std::result::Result<T, CellqError>;

/// All the possible errors from cellq operations
#[derive(Debug)]
pub enum CellqError {
    Redis(redis::RedisError),
    Serialization(serde_json::Error),
    Io(std::io::Error),
    Storage(String),        // message with details from the object store
    ObjectNotFound(String), // storage key
    Analysis(String),       // message with details of the failed computation
    NotConnected,
    MissingEnvVar(&'static str),
    InvalidEnvVar(&'static str, String), // variable name and the rejected value
    Job(JobFailure),
}

impl CellqError {
    /// Whether the error means the broker connection can no longer be used
    pub fn is_connection_fault(&self) -> bool {
        match self {
            CellqError::Redis(err) => {
                err.is_io_error()
                    || err.is_connection_dropped()
                    || err.is_connection_refusal()
                    || err.is_unrecoverable_error()
            }
            CellqError::NotConnected => true,
            _ => false,
        }
    }
}

impl From<redis::RedisError> for CellqError {
    fn from(err: redis::RedisError) -> Self {
        CellqError::Redis(err)
    }
}

impl From<serde_json::Error> for CellqError {
    fn from(err: serde_json::Error) -> Self {
        CellqError::Serialization(err)
    }
}

impl From<std::io::Error> for CellqError {
    fn from(err: std::io::Error) -> Self {
        CellqError::Io(err)
    }
}

impl From<JobFailure> for CellqError {
    fn from(failure: JobFailure) -> Self {
        CellqError::Job(failure)
    }
}

impl std::fmt::Display for CellqError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CellqError::*;
        match self {
            Redis(err) => write!(f, "Redis error: {}", err),
            Serialization(err) => write!(f, "Serialization error: {}", err),
            Io(err) => write!(f, "I/O error: {}", err),
            Storage(msg) => write!(f, "Storage error: {}", msg),
            ObjectNotFound(key) => write!(f, "Object not found: {}", key),
            Analysis(msg) => write!(f, "Analysis failed: {}", msg),
            NotConnected => write!(f, "No live broker connection"),
            MissingEnvVar(var) => write!(f, "Missing environment variable: {}", var),
            InvalidEnvVar(var, value) => {
                write!(f, "Invalid value for environment variable {}: {:?}", var, value)
            }
            Job(failure) => write!(f, "Job failed: {}", failure),
        }
    }
}

impl std::error::Error for CellqError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use CellqError::*;
        match self {
            Redis(err) => Some(err),
            Serialization(err) => Some(err),
            Io(err) => Some(err),
            Storage(_) => None,
            ObjectNotFound(_) => None,
            Analysis(_) => None,
            NotConnected => None,
            MissingEnvVar(_) => None,
            InvalidEnvVar(_, _) => None,
            Job(_) => None,
        }
    }
}
