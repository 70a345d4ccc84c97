use cellq_consume::{
    Analyzer, CommandAnalyzer, DotPlotRun, HeatmapsPlotRun, MethodParams, MethodRun, Subsampling,
    classify_failure,
};
use cellq_core::{CellqError, FailureKind};
use std::ffi::OsString;
use std::path::PathBuf;

fn method_run(iterations: u32, subsampling: Option<Subsampling>) -> MethodRun {
    MethodRun {
        meta_path: PathBuf::from("/tmp/job/meta.tsv"),
        counts_path: PathBuf::from("/tmp/job/counts.tsv"),
        output_dir: PathBuf::from("/tmp/job/output"),
        params: MethodParams {
            iterations,
            threshold: 0.1,
            result_precision: 3,
            pvalue: 0.05,
            subsampling,
        },
    }
}

fn strings(args: Vec<OsString>) -> Vec<String> {
    args.into_iter()
        .map(|arg| arg.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_simple_analysis_args() {
    let analyzer = CommandAnalyzer::default();
    let args = strings(analyzer.method_args(&method_run(0, None)));
    assert_eq!(
        args,
        vec![
            "method",
            "analysis",
            "/tmp/job/meta.tsv",
            "/tmp/job/counts.tsv",
            "--output-path",
            "/tmp/job/output",
            "--threshold=0.1",
            "--result-precision=3",
        ]
    );
}

#[test]
fn test_statistical_analysis_args() {
    let analyzer = CommandAnalyzer::new("cellphonedb").threads(8).debug_seed(42);
    let subsampling = Subsampling {
        log: false,
        num_pc: 100,
        num_cells: Some(500),
    };
    let args = strings(analyzer.method_args(&method_run(1000, Some(subsampling))));

    assert_eq!(args[1], "statistical_analysis");
    assert_eq!(
        args[8..],
        [
            "--iterations=1000",
            "--pvalue=0.05",
            "--threads=8",
            "--debug-seed=42",
            "--subsampling",
            "--subsampling-log=false",
            "--subsampling-num-pc=100",
            "--subsampling-num-cells=500",
        ]
    );
}

#[test]
fn test_plot_args() {
    let analyzer = CommandAnalyzer::default();
    let dot = DotPlotRun {
        means_path: PathBuf::from("means.txt"),
        pvalues_path: PathBuf::from("pvalues.txt"),
        rows_path: Some(PathBuf::from("rows.txt")),
        columns_path: None,
        output_dir: PathBuf::from("out"),
        output_name: "plot.png".to_string(),
    };
    assert_eq!(
        strings(analyzer.dot_plot_args(&dot)),
        vec![
            "plot",
            "dot_plot",
            "--means-path",
            "means.txt",
            "--pvalues-path",
            "pvalues.txt",
            "--output-path",
            "out",
            "--output-name",
            "plot.png",
            "--rows",
            "rows.txt",
        ]
    );

    let heatmaps = HeatmapsPlotRun {
        meta_path: PathBuf::from("meta.txt"),
        pvalues_path: PathBuf::from("pvalues.txt"),
        output_dir: PathBuf::from("out"),
        count_name: "count.png".to_string(),
        count_log_name: "count_log.png".to_string(),
    };
    assert_eq!(
        strings(analyzer.heatmaps_plot_args(&heatmaps)),
        vec![
            "plot",
            "heatmap_plot",
            "meta.txt",
            "--pvalues-path",
            "pvalues.txt",
            "--output-path",
            "out",
            "--count-name",
            "count.png",
            "--log-name",
            "count_log.png",
        ]
    );
}

#[test]
fn test_classify_failure() {
    let failure = classify_failure("Traceback ...\ncellphonedb.AllCountsFilteredException: all gone").unwrap();
    assert_eq!(failure.kind(), FailureKind::AllCountsFiltered);

    let failure = classify_failure("raise EmptyResultException()").unwrap();
    assert_eq!(failure.kind(), FailureKind::EmptyResult);

    let failure = classify_failure("ThresholdValueException: 7").unwrap();
    assert_eq!(failure.kind(), FailureKind::ThresholdValue);

    assert!(classify_failure("MemoryError").is_none());
    assert!(classify_failure("").is_none());
}

#[tokio::test]
async fn test_missing_program() {
    let analyzer = CommandAnalyzer::new("/nonexistent/cellq-test/cellphonedb");
    let outcome = analyzer.run_method(&method_run(0, None)).await;
    assert!(matches!(outcome, Err(CellqError::Io(_))));
}

#[cfg(unix)]
#[tokio::test]
async fn test_failing_program() {
    let analyzer = CommandAnalyzer::new("false");
    let outcome = analyzer.run_method(&method_run(0, None)).await;
    assert!(matches!(outcome, Err(CellqError::Analysis(_))));
}
