#![allow(dead_code)]

use cellq::prelude::*;
use cellq_consume::{DotPlotRun, HeatmapsPlotRun, MethodHandler, MethodRun, PlotHandler};
use cellq_core::{CellqError, OutputRefs, Result};
use cellq_queue::{ConnectionManager, QueueConnection};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const JOB_QUEUE: &str = "method_jobs";
pub const PLOT_QUEUE: &str = "plot_jobs";
pub const RESULT_QUEUE: &str = "results";

pub const META_TSV: &str = "Cell\tcell_type\n\
cell_1\tNKcells\n\
cell_2\tTcells\n\
cell_3\tMyeloid\n";

pub const COUNTS_TSV: &str = "Gene\tcell_1\tcell_2\tcell_3\n\
ENSG00000000003\t0.0\t1.5\t0.2\n\
ENSG00000000005\t2.0\t0.0\t0.7\n";

/// An in-process broker; every connection belongs to a generation and
/// `drop_connections` closes all connections opened so far.
#[derive(Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<BrokerState>>,
}

#[derive(Default)]
struct BrokerState {
    queues: HashMap<String, VecDeque<Vec<u8>>>,
    generation: u64,
    connects: usize,
    refuse_connects: bool,
    failing_pushes: usize,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, queue: &str, message: Value) {
        self.push_raw(queue, message.to_string().as_bytes());
    }

    pub fn push_raw(&self, queue: &str, body: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(body.to_vec());
    }

    pub fn len(&self, queue: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.queues.get(queue).map_or(0, |queue| queue.len())
    }

    /// Everything published to the queue so far, oldest first, left in place
    pub fn results(&self, queue: &str) -> Vec<JobResult> {
        let state = self.state.lock().unwrap();
        state
            .queues
            .get(queue)
            .map(|queue| {
                queue
                    .iter()
                    .map(|body| JobResult::decode(body).unwrap())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    /// Close every open connection, like a broker restart would
    pub fn drop_connections(&self) {
        self.state.lock().unwrap().generation += 1;
    }

    pub fn refuse_connects(&self, refuse: bool) {
        self.state.lock().unwrap().refuse_connects = refuse;
    }

    /// Make the next `count` pushes fail with a broken connection
    pub fn fail_pushes(&self, count: usize) {
        self.state.lock().unwrap().failing_pushes = count;
    }
}

impl Connector for MemoryBroker {
    type Connection = MemoryConnection;

    async fn connect(&self) -> Result<MemoryConnection> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connects {
            return Err(CellqError::NotConnected);
        }
        state.connects += 1;
        Ok(MemoryConnection {
            state: self.state.clone(),
            generation: state.generation,
        })
    }
}

pub struct MemoryConnection {
    state: Arc<Mutex<BrokerState>>,
    generation: u64,
}

impl QueueConnection for MemoryConnection {
    fn is_open(&self) -> bool {
        self.state.lock().unwrap().generation == self.generation
    }

    async fn pop(&mut self, queue: &str) -> Result<Option<Vec<u8>>> {
        if !self.is_open() {
            return Err(CellqError::NotConnected);
        }
        let mut state = self.state.lock().unwrap();
        Ok(state.queues.get_mut(queue).and_then(|queue| queue.pop_front()))
    }

    async fn push(&mut self, queue: &str, body: &[u8]) -> Result<()> {
        if !self.is_open() {
            return Err(CellqError::NotConnected);
        }
        let mut state = self.state.lock().unwrap();
        if state.failing_pushes > 0 {
            state.failing_pushes -= 1;
            state.generation += 1;
            return Err(CellqError::NotConnected);
        }
        state
            .queues
            .entry(queue.to_string())
            .or_default()
            .push_back(body.to_vec());
        Ok(())
    }
}

/// An in-process object store shared by all of its clones
#[derive(Clone, Default)]
pub struct MemoryStorage {
    objects: Arc<Mutex<HashMap<String, (Vec<u8>, String)>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, body: &[u8]) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body.to_vec(), "text/plain".to_string()));
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().unwrap();
        objects.get(key).map(|(body, _)| body.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        let objects = self.objects.lock().unwrap();
        objects.get(key).map(|(_, content_type)| content_type.clone())
    }

    pub fn has(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// Storage with a valid meta and counts dataset under `meta.tsv` and `counts.tsv`
    pub fn with_datasets() -> Self {
        let storage = Self::new();
        storage.insert("meta.tsv", META_TSV.as_bytes());
        storage.insert("counts.tsv", COUNTS_TSV.as_bytes());
        storage
    }
}

impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.object(key)
            .ok_or_else(|| CellqError::ObjectNotFound(key.to_string()))
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }
}

/// What the fake analysis does when it runs
#[derive(Clone)]
pub enum Behaviour {
    /// Write every expected output
    Produce,
    /// Exit cleanly without writing anything
    Nothing,
    Panic,
    Fail(JobFailure),
    /// Fail with an error that carries internal details
    Unclassified,
}

type Hook = Arc<dyn Fn() + Send + Sync>;

/// Stands in for the analysis program
#[derive(Clone)]
pub struct FakeAnalyzer {
    behaviour: Behaviour,
    on_run: Option<Hook>,
    runs: Arc<Mutex<Vec<String>>>,
    dirs: Arc<Mutex<Vec<PathBuf>>>,
}

impl FakeAnalyzer {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            on_run: None,
            runs: Arc::default(),
            dirs: Arc::default(),
        }
    }

    pub fn producing() -> Self {
        Self::new(Behaviour::Produce)
    }

    /// Call `hook` at the start of every run
    pub fn on_run(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_run = Some(Arc::new(hook));
        self
    }

    /// Names of the runs so far, like `method:statistical` or `dot_plot`
    pub fn runs(&self) -> Vec<String> {
        self.runs.lock().unwrap().clone()
    }

    /// Output directories the runs were given
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        self.dirs.lock().unwrap().clone()
    }

    fn start(&self, name: String, dir: &Path, files: &[&str]) -> Result<()> {
        self.runs.lock().unwrap().push(name);
        self.dirs.lock().unwrap().push(dir.to_path_buf());
        if let Some(hook) = &self.on_run {
            hook();
        }
        match &self.behaviour {
            Behaviour::Produce => {
                for file in files {
                    std::fs::write(dir.join(file), format!("output {}", file))?;
                }
                Ok(())
            }
            Behaviour::Nothing => Ok(()),
            Behaviour::Panic => panic!("analysis blew up"),
            Behaviour::Fail(failure) => Err(CellqError::Job(failure.clone())),
            Behaviour::Unclassified => Err(CellqError::Analysis(
                "segfault in /opt/secret/internal.so".to_string(),
            )),
        }
    }
}

impl Analyzer for FakeAnalyzer {
    async fn run_method(&self, run: &MethodRun) -> Result<()> {
        let name = if run.params.is_statistical() {
            "method:statistical"
        } else {
            "method:simple"
        };
        let files: Vec<&str> = run
            .expected_outputs()
            .iter()
            .map(|output| output.file_name())
            .collect();
        self.start(name.to_string(), &run.output_dir, &files)
    }

    async fn run_dot_plot(&self, run: &DotPlotRun) -> Result<()> {
        self.start("dot_plot".to_string(), &run.output_dir, &[run.output_name.as_str()])
    }

    async fn run_heatmaps_plot(&self, run: &HeatmapsPlotRun) -> Result<()> {
        self.start(
            "heatmaps_plot".to_string(),
            &run.output_dir,
            &[run.count_name.as_str(), run.count_log_name.as_str()],
        )
    }
}

pub fn test_config() -> DispatchConfig {
    DispatchConfig::new()
        .poll_interval(Duration::ZERO)
        .max_idle_polls(Some(1))
}

pub async fn method_dispatcher(
    broker: &MemoryBroker,
    storage: MemoryStorage,
    analyzer: FakeAnalyzer,
) -> Dispatcher<MemoryBroker, MethodHandler<MemoryStorage, FakeAnalyzer>> {
    let link = ConnectionManager::connect(broker.clone()).await.unwrap();
    let context = Context::new(JOB_QUEUE, RESULT_QUEUE);
    Dispatcher::new(context, link, MethodHandler::new(storage, analyzer)).with_config(test_config())
}

pub async fn plot_dispatcher(
    broker: &MemoryBroker,
    storage: MemoryStorage,
    analyzer: FakeAnalyzer,
) -> Dispatcher<MemoryBroker, PlotHandler<MemoryStorage, FakeAnalyzer>> {
    let link = ConnectionManager::connect(broker.clone()).await.unwrap();
    let context = Context::new(PLOT_QUEUE, RESULT_QUEUE);
    Dispatcher::new(context, link, PlotHandler::new(storage, analyzer)).with_config(test_config())
}

/// The error id of a failed result
pub fn error_id(result: &JobResult) -> &str {
    match result {
        JobResult::Failure { error_id, .. } => error_id,
        JobResult::Success { .. } => panic!("Expected a failure but got {:?}", result),
    }
}

pub fn error_message(result: &JobResult) -> &str {
    match result {
        JobResult::Failure { message, .. } => message,
        JobResult::Success { .. } => panic!("Expected a failure but got {:?}", result),
    }
}

pub fn files(result: &JobResult) -> &OutputRefs {
    match result {
        JobResult::Success { files, .. } => files,
        JobResult::Failure { .. } => panic!("Expected a success but got {:?}", result),
    }
}
