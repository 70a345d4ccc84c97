use crate::analyzer::{Analyzer, MethodRun};
use crate::dataset;
use crate::handler::{Handler, Progress};
use cellq_core::*;
use cellq_storage::{StagingArea, Storage};
use tracing::{info, warn};

const TABLE_CONTENT_TYPE: &str = "text/tab-separated-values";

/// Typed parameters of one analysis
#[derive(Debug, Clone, PartialEq)]
pub struct MethodParams {
    /// Shuffling iterations; 0 selects the non-statistical analysis
    pub iterations: u32,
    pub threshold: f64,
    pub result_precision: u32,
    pub pvalue: f64,
    pub subsampling: Option<Subsampling>,
}

impl MethodParams {
    pub fn is_statistical(&self) -> bool {
        self.iterations > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subsampling {
    pub log: bool,
    pub num_pc: u32,
    pub num_cells: Option<u32>,
}

/// A method job decoded from its payload
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRequest {
    pub meta_key: String,
    pub counts_key: String,
    pub params: MethodParams,
}

impl MethodRequest {
    pub fn from_job(job: &Job) -> std::result::Result<Self, JobFailure> {
        let meta_key = job.require_str("file_meta")?.to_string();
        let counts_key = job.require_str("file_counts")?.to_string();
        let iterations = job.require_u32("iterations")?;

        let threshold = job.require_f64("threshold")?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(JobFailure::new(FailureKind::ThresholdValue)
                .description(format!("Threshold value {} is not valid", threshold))
                .hint("Threshold must be a number between 0 and 1"));
        }

        let result_precision = job.require_u32("result_precision")?;
        let pvalue = job.opt_f64("pvalue")?.unwrap_or(0.05);
        if !(0.0..=1.0).contains(&pvalue) {
            return Err(JobFailure::invalid_parameter("pvalue", "probability between 0 and 1"));
        }

        let subsampling = if job.flag("subsampling")? {
            Some(Subsampling {
                log: job.flag("log")?,
                num_pc: job.require_u32("num_pc")?,
                num_cells: job.opt_u32("num_cells")?.filter(|n| *n > 0),
            })
        } else {
            None
        };

        Ok(Self {
            meta_key,
            counts_key,
            params: MethodParams {
                iterations,
                threshold,
                result_precision,
                pvalue,
                subsampling,
            },
        })
    }
}

/// Runs cell-cell communication analyses
pub struct MethodHandler<S: Storage, A: Analyzer> {
    storage: S,
    analyzer: A,
}

impl<S: Storage, A: Analyzer> MethodHandler<S, A> {
    pub fn new(storage: S, analyzer: A) -> Self {
        Self { storage, analyzer }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn fetch(&self, key: &str) -> Result<Vec<u8>> {
        self.storage.get(key).await.map_err(|err| {
            warn!(key = %key, error = %err, "Could not read input");
            CellqError::Job(JobFailure::read_file(key))
        })
    }
}

impl<S: Storage, A: Analyzer> Handler for MethodHandler<S, A> {
    fn kind(&self) -> JobKind {
        JobKind::Method
    }

    async fn handle(&self, job: &Job, progress: &mut Progress) -> Result<OutputRefs> {
        let request = MethodRequest::from_job(job)?;
        info!(
            job_id = %job.id,
            statistical = %request.params.is_statistical(),
            "New method job"
        );

        let staging = StagingArea::new()?;
        let meta = self.fetch(&request.meta_key).await?;
        dataset::validate_meta(&request.meta_key, &meta)?;
        let counts = self.fetch(&request.counts_key).await?;
        dataset::validate_counts(&request.counts_key, &counts)?;

        let run = MethodRun {
            meta_path: staging.write_input("meta", &request.meta_key, &meta).await?,
            counts_path: staging
                .write_input("counts", &request.counts_key, &counts)
                .await?,
            output_dir: staging.output_dir().to_path_buf(),
            params: request.params.clone(),
        };
        progress.advance(JobStage::InputsStaged);

        self.analyzer.run_method(&run).await?;
        progress.advance(JobStage::Computed);

        let keys = OutputKeys::for_job(&job.id);
        let statistical = request.params.is_statistical();
        let outputs = run.expected_outputs();

        if let Some(missing) = outputs
            .iter()
            .find(|output| !run.output_dir.join(output.file_name()).is_file())
        {
            return Err(JobFailure::new(FailureKind::EmptyResult)
                .description(format!(
                    "The analysis finished without producing {}",
                    missing.result_name()
                ))
                .hint("Please check your input files")
                .into());
        }

        let mut files = OutputRefs::new();
        for output in outputs {
            use crate::analyzer::MethodOutput::*;
            let key = match output {
                Pvalues => keys.pvalues(),
                Means => keys.means(),
                SignificantMeans => keys.significant_means(statistical),
                Deconvoluted => keys.deconvoluted(),
            };
            let path = run.output_dir.join(output.file_name());
            staging
                .stage_out(&self.storage, &path, &key, TABLE_CONTENT_TYPE)
                .await?;
            files.insert(output.result_name().to_string(), key);
        }
        progress.advance(JobStage::OutputsStaged);

        Ok(files)
    }
}
