use crate::analyzer::{Analyzer, DotPlotRun, HeatmapsPlotRun, MethodRun};
use cellq_core::{CellqError, FailureKind, JobFailure, Result};
use std::ffi::OsString;
use tokio::process::Command;
use tracing::{debug, warn};

/// Runs the analyses through the `cellphonedb` command line tool
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: OsString,
    threads: u32,
    debug_seed: i64,
}

impl Default for CommandAnalyzer {
    fn default() -> Self {
        Self {
            program: OsString::from("cellphonedb"),
            threads: 4,
            debug_seed: -1,
        }
    }
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    pub fn threads(mut self, threads: u32) -> Self {
        self.threads = threads;
        self
    }

    pub fn debug_seed(mut self, debug_seed: i64) -> Self {
        self.debug_seed = debug_seed;
        self
    }

    pub fn method_args(&self, run: &MethodRun) -> Vec<OsString> {
        let params = &run.params;
        let mut args: Vec<OsString> = vec!["method".into()];

        if params.is_statistical() {
            args.push("statistical_analysis".into());
        } else {
            args.push("analysis".into());
        }
        args.push(run.meta_path.clone().into());
        args.push(run.counts_path.clone().into());
        args.push("--output-path".into());
        args.push(run.output_dir.clone().into());
        args.push(format!("--threshold={}", params.threshold).into());
        args.push(format!("--result-precision={}", params.result_precision).into());

        if params.is_statistical() {
            args.push(format!("--iterations={}", params.iterations).into());
            args.push(format!("--pvalue={}", params.pvalue).into());
            args.push(format!("--threads={}", self.threads).into());
            args.push(format!("--debug-seed={}", self.debug_seed).into());
        }

        if let Some(subsampling) = &params.subsampling {
            args.push("--subsampling".into());
            args.push(format!("--subsampling-log={}", subsampling.log).into());
            args.push(format!("--subsampling-num-pc={}", subsampling.num_pc).into());
            if let Some(num_cells) = subsampling.num_cells {
                args.push(format!("--subsampling-num-cells={}", num_cells).into());
            }
        }

        args
    }

    pub fn dot_plot_args(&self, run: &DotPlotRun) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["plot".into(), "dot_plot".into()];
        args.push("--means-path".into());
        args.push(run.means_path.clone().into());
        args.push("--pvalues-path".into());
        args.push(run.pvalues_path.clone().into());
        args.push("--output-path".into());
        args.push(run.output_dir.clone().into());
        args.push("--output-name".into());
        args.push(run.output_name.clone().into());
        if let Some(rows) = &run.rows_path {
            args.push("--rows".into());
            args.push(rows.clone().into());
        }
        if let Some(columns) = &run.columns_path {
            args.push("--columns".into());
            args.push(columns.clone().into());
        }
        args
    }

    pub fn heatmaps_plot_args(&self, run: &HeatmapsPlotRun) -> Vec<OsString> {
        vec![
            "plot".into(),
            "heatmap_plot".into(),
            run.meta_path.clone().into(),
            "--pvalues-path".into(),
            run.pvalues_path.clone().into(),
            "--output-path".into(),
            run.output_dir.clone().into(),
            "--count-name".into(),
            run.count_name.clone().into(),
            "--log-name".into(),
            run.count_log_name.clone().into(),
        ]
    }

    async fn execute(&self, args: Vec<OsString>) -> Result<()> {
        debug!(program = ?self.program, args = ?args, "Running analysis command");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        warn!(
            program = ?self.program,
            status = %output.status,
            stderr = %stderr.trim(),
            "Analysis command failed"
        );
        Err(classify_failure(&stderr)
            .map(CellqError::Job)
            .unwrap_or_else(|| {
                CellqError::Analysis(format!("{:?} exited with {}", self.program, output.status))
            }))
    }
}

/// Recognize the failures the analysis reports on its own
pub fn classify_failure(stderr: &str) -> Option<JobFailure> {
    if stderr.contains("AllCountsFiltered") {
        return Some(
            JobFailure::new(FailureKind::AllCountsFiltered)
                .description("All counts were filtered out")
                .hint("Check that the counts file contains genes present in the database"),
        );
    }
    if stderr.contains("EmptyResult") {
        return Some(
            JobFailure::new(FailureKind::EmptyResult)
                .description("The analysis produced an empty result")
                .hint("Please check your input files"),
        );
    }
    if stderr.contains("ThresholdValue") {
        return Some(
            JobFailure::new(FailureKind::ThresholdValue)
                .description("The threshold value was rejected by the analysis")
                .hint("Threshold must be a number between 0 and 1"),
        );
    }
    None
}

impl Analyzer for CommandAnalyzer {
    async fn run_method(&self, run: &MethodRun) -> Result<()> {
        self.execute(self.method_args(run)).await
    }

    async fn run_dot_plot(&self, run: &DotPlotRun) -> Result<()> {
        self.execute(self.dot_plot_args(run)).await
    }

    async fn run_heatmaps_plot(&self, run: &HeatmapsPlotRun) -> Result<()> {
        self.execute(self.heatmaps_plot_args(run)).await
    }
}
