use cellq_consume::{
    DotPlotRequest, HeatmapsPlotRequest, MethodRequest, PlotRequest, Subsampling,
};
use cellq_core::{FailureKind, Job, JobKind, OutputKeys};
use serde_json::{Value, json};

fn job(kind: JobKind, payload: Value) -> Job {
    Job::decode(payload.to_string().as_bytes(), kind).unwrap()
}

fn method(payload: Value) -> Result<MethodRequest, FailureKind> {
    MethodRequest::from_job(&job(JobKind::Method, payload)).map_err(|failure| failure.kind())
}

#[test]
fn test_method_request() {
    let request = method(json!({
        "job_id": "1",
        "file_meta": "meta.tsv",
        "file_counts": "counts.tsv",
        "iterations": 1000,
        "threshold": 0.1,
        "result_precision": 3,
    }))
    .unwrap();

    assert_eq!(request.meta_key, "meta.tsv");
    assert_eq!(request.counts_key, "counts.tsv");
    assert_eq!(request.params.iterations, 1000);
    assert_eq!(request.params.pvalue, 0.05);
    assert_eq!(request.params.subsampling, None);
    assert!(request.params.is_statistical());
}

#[test]
fn test_method_subsampling() {
    let request = method(json!({
        "job_id": "2",
        "file_meta": "meta.tsv",
        "file_counts": "counts.tsv",
        "iterations": 0,
        "threshold": "0.2",
        "result_precision": "1",
        "pvalue": 0.01,
        "subsampling": true,
        "log": "true",
        "num_pc": 100,
        "num_cells": 0,
    }))
    .unwrap();

    assert!(!request.params.is_statistical());
    assert_eq!(request.params.pvalue, 0.01);
    assert_eq!(
        request.params.subsampling,
        Some(Subsampling {
            log: true,
            num_pc: 100,
            num_cells: None,
        })
    );
}

#[test]
fn test_method_rejects() {
    let valid = json!({
        "job_id": "3",
        "file_meta": "meta.tsv",
        "file_counts": "counts.tsv",
        "iterations": 10,
        "threshold": 0.1,
        "result_precision": 3,
    });
    let with = |field: &str, value: Value| {
        let mut payload = valid.clone();
        payload[field] = value;
        method(payload)
    };

    assert_eq!(with("threshold", json!(-0.1)), Err(FailureKind::ThresholdValue));
    assert_eq!(with("threshold", json!("high")), Err(FailureKind::InvalidParameter));
    assert_eq!(with("iterations", json!(1.5)), Err(FailureKind::InvalidParameter));
    assert_eq!(with("pvalue", json!(2)), Err(FailureKind::InvalidParameter));
    assert_eq!(with("file_meta", Value::Null), Err(FailureKind::MissingField));
    assert_eq!(with("subsampling", json!(true)), Err(FailureKind::MissingField));
}

#[test]
fn test_threshold_message() {
    let failure = MethodRequest::from_job(&job(
        JobKind::Method,
        json!({
            "job_id": "4",
            "file_meta": "meta.tsv",
            "file_counts": "counts.tsv",
            "iterations": 10,
            "threshold": 3,
            "result_precision": 3,
        }),
    ))
    .unwrap_err();
    assert_eq!(failure.kind().id(), "ThresholdValueError");
    assert_eq!(
        failure.message(),
        "Threshold value 3 is not valid. Threshold must be a number between 0 and 1."
    );
}

#[test]
fn test_plot_requests() {
    let dot = PlotRequest::from_job(&job(
        JobKind::Plot,
        json!({
            "job_id": "5",
            "type": "dot_plot",
            "file_means": "means.txt",
            "file_pvalues": "pvalues.txt",
            "file_columns": "columns.txt",
        }),
    ))
    .unwrap();
    assert_eq!(dot.plot_type(), "dot_plot");
    assert_eq!(
        dot,
        PlotRequest::DotPlot(DotPlotRequest {
            means_key: "means.txt".to_string(),
            pvalues_key: "pvalues.txt".to_string(),
            rows_key: None,
            columns_key: Some("columns.txt".to_string()),
        })
    );

    let heatmaps = PlotRequest::from_job(&job(
        JobKind::Plot,
        json!({
            "job_id": "6",
            "type": "heatmaps_plot",
            "file_meta": "meta.txt",
            "file_pvalues": "pvalues.txt",
        }),
    ))
    .unwrap();
    assert_eq!(
        heatmaps,
        PlotRequest::HeatmapsPlot(HeatmapsPlotRequest {
            meta_key: "meta.txt".to_string(),
            pvalues_key: "pvalues.txt".to_string(),
        })
    );
}

#[test]
fn test_plot_rejects() {
    let plot = |payload: Value| {
        PlotRequest::from_job(&job(JobKind::Plot, payload)).map_err(|failure| failure.kind())
    };
    assert_eq!(plot(json!({"job_id": "7"})), Err(FailureKind::MissingField));
    assert_eq!(
        plot(json!({"job_id": "8", "type": "pie_chart"})),
        Err(FailureKind::UnknownPlotType)
    );
    assert_eq!(
        plot(json!({"job_id": "9", "type": "dot_plot", "file_means": "means.txt"})),
        Err(FailureKind::MissingField)
    );
}

#[test]
fn test_output_keys() {
    let keys = OutputKeys::for_job("01J0XYZ");
    assert_eq!(keys.pvalues(), "pvalues_simple_01J0XYZ.txt");
    assert_eq!(keys.means(), "means_simple_01J0XYZ.txt");
    assert_eq!(keys.significant_means(true), "significant_means_simple_01J0XYZ.txt");
    assert_eq!(keys.significant_means(false), "significant_means_01J0XYZ.txt");
    assert_eq!(keys.deconvoluted(), "deconvoluted_simple_01J0XYZ.txt");
    assert_eq!(keys.dot_plot(), "plot__01J0XYZ.png");
    assert_eq!(keys.count_plot(), "plot_count__01J0XYZ.png");
    assert_eq!(keys.count_log_plot(), "plot_count_log__01J0XYZ.png");
}
