use std::time::Duration;

/// Configuration options for a Dispatcher
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// How long to wait after finding the job queue empty
    poll_interval: Duration,

    /// How many empty polls a batch tolerates before it ends; `None` polls forever
    max_idle_polls: Option<usize>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            max_idle_polls: None,
        }
    }
}

impl DispatchConfig {
    pub fn new() -> DispatchConfig {
        DispatchConfig::default()
    }

    pub fn poll_interval(mut self, poll_interval: Duration) -> DispatchConfig {
        self.poll_interval = poll_interval;
        self
    }
    pub fn get_poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn max_idle_polls(mut self, max_idle_polls: Option<usize>) -> DispatchConfig {
        self.max_idle_polls = max_idle_polls;
        self
    }
    pub fn get_max_idle_polls(&self) -> Option<usize> {
        self.max_idle_polls
    }
}
