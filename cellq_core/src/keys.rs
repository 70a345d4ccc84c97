/// Storage key generator for the outputs of one job
#[derive(Clone)]
pub struct OutputKeys {
    job_id: String,
}

impl OutputKeys {
    /// Create a new key generator over the given job id
    pub fn for_job(job_id: impl ToString) -> Self {
        Self {
            job_id: job_id.to_string(),
        }
    }

    /// Storage key for the table of interaction p-values
    pub fn pvalues(&self) -> String {
        format!("pvalues_simple_{}.txt", self.job_id)
    }

    /// Storage key for the table of mean interaction values
    pub fn means(&self) -> String {
        format!("means_simple_{}.txt", self.job_id)
    }

    /// Storage key for the table of significant means; the non-statistical
    /// analysis has historically been published without the `simple` infix
    pub fn significant_means(&self, statistical: bool) -> String {
        if statistical {
            format!("significant_means_simple_{}.txt", self.job_id)
        } else {
            format!("significant_means_{}.txt", self.job_id)
        }
    }

    /// Storage key for the deconvoluted gene table
    pub fn deconvoluted(&self) -> String {
        format!("deconvoluted_simple_{}.txt", self.job_id)
    }

    /// Storage key for a dot plot image
    pub fn dot_plot(&self) -> String {
        format!("plot__{}.png", self.job_id)
    }

    /// Storage key for the interaction count heatmap
    pub fn count_plot(&self) -> String {
        format!("plot_count__{}.png", self.job_id)
    }

    /// Storage key for the log-scaled interaction count heatmap
    pub fn count_log_plot(&self) -> String {
        format!("plot_count_log__{}.png", self.job_id)
    }
}
