use crate::Storage;
use cellq_core::{Result, key_extension};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// A temporary working directory for one job.
///
/// Inputs are copied in from storage, outputs are written by the computation
/// into `output_dir` and copied back out. The whole directory is removed when
/// the area is dropped, whichever way the job ends.
pub struct StagingArea {
    root: TempDir,
    output_dir: PathBuf,
}

impl StagingArea {
    pub fn new() -> Result<Self> {
        let root = tempfile::Builder::new().prefix("cellq-").tempdir()?;
        let output_dir = root.path().join("output");
        std::fs::create_dir(&output_dir)?;
        Ok(Self { root, output_dir })
    }

    /// Directory the computation writes its outputs into
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    /// Local path for an input named `stem`, keeping the extension of its storage key
    pub fn input_path(&self, stem: &str, key: &str) -> PathBuf {
        let name = match key_extension(key) {
            Some(extension) => format!("{}.{}", stem, extension),
            None => stem.to_string(),
        };
        self.root.path().join(name)
    }

    /// Write already downloaded bytes as the input named `stem`
    pub async fn write_input(&self, stem: &str, key: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.input_path(stem, key);
        tokio::fs::write(&path, bytes).await?;
        debug!(key = %key, path = %path.display(), bytes = bytes.len(), "Input staged");
        Ok(path)
    }

    /// Copy an object from storage into the area as the input named `stem`
    pub async fn stage_in<S: Storage>(&self, storage: &S, key: &str, stem: &str) -> Result<PathBuf> {
        let bytes = storage.get(key).await?;
        self.write_input(stem, key, &bytes).await
    }

    /// Copy a file the computation produced back to storage
    pub async fn stage_out<S: Storage>(
        &self,
        storage: &S,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<()> {
        let bytes = tokio::fs::read(path).await?;
        storage.put(key, bytes, content_type).await?;
        debug!(key = %key, path = %path.display(), "Output staged");
        Ok(())
    }
}
