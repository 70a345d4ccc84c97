use std::fmt::Display;
use std::str::FromStr;

/// All the stages a job passes through inside a worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStage {
    /// The message has been dequeued.
    Received,
    /// Every input is in the staging area.
    InputsStaged,
    /// The external computation has finished.
    Computed,
    /// Every output has been written to storage.
    OutputsStaged,
    /// Something went wrong; a failure result will be published.
    Failed,
    /// The result has been published.
    Published,
}

impl JobStage {
    /// Whether the job can still move to the given stage
    pub fn can_advance_to(&self, next: JobStage) -> bool {
        use JobStage::*;
        matches!(
            (self, next),
            (Received, InputsStaged)
                | (InputsStaged, Computed)
                | (Computed, OutputsStaged)
                | (OutputsStaged, Published)
                | (Failed, Published)
        ) || (!matches!(self, Failed | Published) && next == Failed)
    }
}

impl Display for JobStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            JobStage::Received => "received",
            JobStage::InputsStaged => "inputs_staged",
            JobStage::Computed => "computed",
            JobStage::OutputsStaged => "outputs_staged",
            JobStage::Failed => "failed",
            JobStage::Published => "published",
        };
        write!(f, "{}", str)
    }
}

impl FromStr for JobStage {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "received" => Ok(JobStage::Received),
            "inputs_staged" => Ok(JobStage::InputsStaged),
            "computed" => Ok(JobStage::Computed),
            "outputs_staged" => Ok(JobStage::OutputsStaged),
            "failed" => Ok(JobStage::Failed),
            "published" => Ok(JobStage::Published),
            _ => Err(format!("Unknown job stage: {}", s)),
        }
    }
}
