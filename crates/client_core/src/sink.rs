//! Client-local "save as" for generated artifacts.

use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;

#[async_trait]
pub trait ArtifactSink: Send + Sync {
    async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes artifacts into one download directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn save(&self, filename: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty artifact filename"))?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

#[cfg(test)]
#[path = "tests/sink_tests.rs"]
mod tests;
