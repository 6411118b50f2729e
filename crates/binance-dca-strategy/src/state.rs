use crate::config::RuleBook;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Durable storage for the rule file.
///
/// The file is read fully at startup and rewritten in full after every
/// successful execution, so a crash loses at most the in-flight order's
/// timestamp update. A single process owns the file exclusively; running
/// two instances against one file is unsupported.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw rule document for validation.
    pub async fn load_document(&self) -> Result<Value> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read rule file {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parse rule file {}", self.path.display()))
    }

    /// Rewrite the whole rule file from the in-memory book.
    ///
    /// Atomic write: temp file in the same directory, then rename.
    pub async fn persist(&self, book: &RuleBook) -> Result<()> {
        let content = serde_json::to_string_pretty(book)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, content)
            .await
            .with_context(|| format!("write {}", temp_path.display()))?;
        fs::rename(&temp_path, &self.path)
            .await
            .with_context(|| format!("rename into {}", self.path.display()))?;
        Ok(())
    }
}
