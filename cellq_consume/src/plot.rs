use crate::analyzer::{Analyzer, DotPlotRun, HeatmapsPlotRun};
use crate::handler::{Handler, Progress};
use cellq_core::*;
use cellq_storage::{StagingArea, Storage};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const IMAGE_CONTENT_TYPE: &str = "image/png";

/// A plot job decoded from its payload
#[derive(Debug, Clone, PartialEq)]
pub enum PlotRequest {
    DotPlot(DotPlotRequest),
    HeatmapsPlot(HeatmapsPlotRequest),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotPlotRequest {
    pub means_key: String,
    pub pvalues_key: String,
    pub rows_key: Option<String>,
    pub columns_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapsPlotRequest {
    pub meta_key: String,
    pub pvalues_key: String,
}

impl PlotRequest {
    pub fn from_job(job: &Job) -> std::result::Result<Self, JobFailure> {
        let plot_type = job.require_str("type")?;
        match plot_type {
            "dot_plot" => Ok(PlotRequest::DotPlot(DotPlotRequest {
                means_key: job.require_str("file_means")?.to_string(),
                pvalues_key: job.require_str("file_pvalues")?.to_string(),
                rows_key: job.opt_str("file_rows")?.map(str::to_string),
                columns_key: job.opt_str("file_columns")?.map(str::to_string),
            })),
            "heatmaps_plot" => Ok(PlotRequest::HeatmapsPlot(HeatmapsPlotRequest {
                meta_key: job.require_str("file_meta")?.to_string(),
                pvalues_key: job.require_str("file_pvalues")?.to_string(),
            })),
            other => Err(JobFailure::unknown_plot_type(other)),
        }
    }

    pub fn plot_type(&self) -> &'static str {
        match self {
            PlotRequest::DotPlot(_) => "dot_plot",
            PlotRequest::HeatmapsPlot(_) => "heatmaps_plot",
        }
    }
}

/// Renders plots from earlier analysis outputs
pub struct PlotHandler<S: Storage, A: Analyzer> {
    storage: S,
    analyzer: A,
}

impl<S: Storage, A: Analyzer> PlotHandler<S, A> {
    pub fn new(storage: S, analyzer: A) -> Self {
        Self { storage, analyzer }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    async fn stage_in(&self, staging: &StagingArea, key: &str, stem: &str) -> Result<PathBuf> {
        staging
            .stage_in(&self.storage, key, stem)
            .await
            .map_err(|err| match err {
                CellqError::ObjectNotFound(_) | CellqError::Storage(_) => {
                    warn!(key = %key, error = %err, "Could not read input");
                    CellqError::Job(JobFailure::read_file(key))
                }
                other => other,
            })
    }

    async fn dot_plot(
        &self,
        job: &Job,
        staging: &StagingArea,
        progress: &mut Progress,
        request: &DotPlotRequest,
    ) -> Result<OutputRefs> {
        let key = OutputKeys::for_job(&job.id).dot_plot();

        let run = DotPlotRun {
            means_path: self.stage_in(staging, &request.means_key, "means").await?,
            pvalues_path: self
                .stage_in(staging, &request.pvalues_key, "pvalues")
                .await?,
            rows_path: match &request.rows_key {
                Some(key) => Some(self.stage_in(staging, key, "rows").await?),
                None => None,
            },
            columns_path: match &request.columns_key {
                Some(key) => Some(self.stage_in(staging, key, "columns").await?),
                None => None,
            },
            output_dir: staging.output_dir().to_path_buf(),
            output_name: "plot.png".to_string(),
        };
        progress.advance(JobStage::InputsStaged);

        self.analyzer.run_dot_plot(&run).await?;
        progress.advance(JobStage::Computed);

        let output = run.output_dir.join(&run.output_name);
        require_outputs("dot_plot", &[output.as_path()])?;

        staging
            .stage_out(&self.storage, &output, &key, IMAGE_CONTENT_TYPE)
            .await?;
        progress.advance(JobStage::OutputsStaged);

        Ok(OutputRefs::from([("plot".to_string(), key)]))
    }

    async fn heatmaps_plot(
        &self,
        job: &Job,
        staging: &StagingArea,
        progress: &mut Progress,
        request: &HeatmapsPlotRequest,
    ) -> Result<OutputRefs> {
        let keys = OutputKeys::for_job(&job.id);

        let run = HeatmapsPlotRun {
            meta_path: self.stage_in(staging, &request.meta_key, "meta").await?,
            pvalues_path: self
                .stage_in(staging, &request.pvalues_key, "pvalues")
                .await?,
            output_dir: staging.output_dir().to_path_buf(),
            count_name: "plot_count.png".to_string(),
            count_log_name: "plot_count_log.png".to_string(),
        };
        progress.advance(JobStage::InputsStaged);

        self.analyzer.run_heatmaps_plot(&run).await?;
        progress.advance(JobStage::Computed);

        let count = run.output_dir.join(&run.count_name);
        let count_log = run.output_dir.join(&run.count_log_name);
        require_outputs("heatmaps_plot", &[count.as_path(), count_log.as_path()])?;

        let (count_key, count_log_key) = (keys.count_plot(), keys.count_log_plot());
        staging
            .stage_out(&self.storage, &count, &count_key, IMAGE_CONTENT_TYPE)
            .await?;
        staging
            .stage_out(&self.storage, &count_log, &count_log_key, IMAGE_CONTENT_TYPE)
            .await?;
        progress.advance(JobStage::OutputsStaged);

        Ok(OutputRefs::from([
            ("count_plot".to_string(), count_key),
            ("count_log_plot".to_string(), count_log_key),
        ]))
    }
}

fn require_outputs(plot_type: &str, paths: &[&Path]) -> Result<()> {
    if paths.iter().all(|path| path.is_file()) {
        return Ok(());
    }
    Err(JobFailure::new(FailureKind::Plot)
        .description(format!(
            "Could not generate output file for plot of type {}",
            plot_type
        ))
        .into())
}

impl<S: Storage, A: Analyzer> Handler for PlotHandler<S, A> {
    fn kind(&self) -> JobKind {
        JobKind::Plot
    }

    async fn handle(&self, job: &Job, progress: &mut Progress) -> Result<OutputRefs> {
        let request = PlotRequest::from_job(job)?;
        info!(job_id = %job.id, plot_type = %request.plot_type(), "New plot job");

        let staging = StagingArea::new()?;
        match &request {
            PlotRequest::DotPlot(dot) => self.dot_plot(job, &staging, progress, dot).await,
            PlotRequest::HeatmapsPlot(heatmaps) => {
                self.heatmaps_plot(job, &staging, progress, heatmaps).await
            }
        }
    }
}
