//! cellq consumer components for running analysis jobs
//!
//! The Dispatcher takes jobs off the job queue and hands them to a Handler,
//! which stages the inputs, runs the Analyzer and uploads its outputs.

mod analyzer;
mod command;
pub mod dataset;
mod dispatch_config;
mod dispatcher;
mod handler;
mod method;
mod plot;

pub use analyzer::{Analyzer, DotPlotRun, HeatmapsPlotRun, MethodOutput, MethodRun};
pub use command::{CommandAnalyzer, classify_failure};
pub use dispatch_config::DispatchConfig;
pub use dispatcher::{BatchSummary, Dispatcher};
pub use handler::{Handler, Progress};
pub use method::{MethodHandler, MethodParams, MethodRequest, Subsampling};
pub use plot::{DotPlotRequest, HeatmapsPlotRequest, PlotHandler, PlotRequest};

pub mod prelude {
    pub use crate::{
        Analyzer, BatchSummary, CommandAnalyzer, DispatchConfig, Dispatcher, Handler,
        MethodHandler, PlotHandler, Progress,
    };
}
