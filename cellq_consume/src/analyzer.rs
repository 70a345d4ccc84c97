//! The seam to the external analysis and plotting computations.

use crate::method::MethodParams;
use cellq_core::Result;
use std::future::Future;
use std::path::PathBuf;

/// Runs the computations; each run writes its outputs into the given directory
pub trait Analyzer: Send + Sync {
    fn run_method<'a>(&'a self, run: &'a MethodRun) -> impl Future<Output = Result<()>> + Send + 'a;

    fn run_dot_plot<'a>(
        &'a self,
        run: &'a DotPlotRun,
    ) -> impl Future<Output = Result<()>> + Send + 'a;

    fn run_heatmaps_plot<'a>(
        &'a self,
        run: &'a HeatmapsPlotRun,
    ) -> impl Future<Output = Result<()>> + Send + 'a;
}

/// One cell-cell communication analysis over staged datasets
#[derive(Debug, Clone)]
pub struct MethodRun {
    pub meta_path: PathBuf,
    pub counts_path: PathBuf,
    pub output_dir: PathBuf,
    pub params: MethodParams,
}

impl MethodRun {
    /// Outputs the analysis is expected to leave in `output_dir`
    pub fn expected_outputs(&self) -> Vec<MethodOutput> {
        let mut outputs = Vec::with_capacity(4);
        if self.params.is_statistical() {
            outputs.push(MethodOutput::Pvalues);
        }
        outputs.extend([
            MethodOutput::Means,
            MethodOutput::SignificantMeans,
            MethodOutput::Deconvoluted,
        ]);
        outputs
    }
}

/// Tables produced by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodOutput {
    Pvalues,
    Means,
    SignificantMeans,
    Deconvoluted,
}

impl MethodOutput {
    /// File name the analysis writes
    pub fn file_name(&self) -> &'static str {
        match self {
            MethodOutput::Pvalues => "pvalues.txt",
            MethodOutput::Means => "means.txt",
            MethodOutput::SignificantMeans => "significant_means.txt",
            MethodOutput::Deconvoluted => "deconvoluted.txt",
        }
    }

    /// Name under which the output is listed in the result
    pub fn result_name(&self) -> &'static str {
        match self {
            MethodOutput::Pvalues => "pvalues",
            MethodOutput::Means => "means",
            MethodOutput::SignificantMeans => "significant_means",
            MethodOutput::Deconvoluted => "deconvoluted",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DotPlotRun {
    pub means_path: PathBuf,
    pub pvalues_path: PathBuf,
    pub rows_path: Option<PathBuf>,
    pub columns_path: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub output_name: String,
}

#[derive(Debug, Clone)]
pub struct HeatmapsPlotRun {
    pub meta_path: PathBuf,
    pub pvalues_path: PathBuf,
    pub output_dir: PathBuf,
    pub count_name: String,
    pub count_log_name: String,
}
