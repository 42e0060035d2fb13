//! Run-wide manifest of persisted species.
//!
//! The manifest is an append-only list for the duration of a run and the
//! whole list is rewritten to disk after every append, so a crash loses at
//! most the species being processed. The rewrite goes through a temporary
//! sibling file and a rename, so readers never see a half-written manifest.

use crate::error::ScrapeError;
use crate::models::ManifestEntry;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument};

#[derive(Debug)]
pub struct ManifestStore {
    path: PathBuf,
    entries: Vec<ManifestEntry>,
    dir_names: HashSet<String>,
}

impl ManifestStore {
    /// An empty store that will persist to `path`. Nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
            dir_names: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First directory name derived from `base` that no persisted entry uses.
    ///
    /// `base` itself if free, otherwise `base_2`, `base_3`, ...
    pub fn unique_dir_name(&self, base: &str) -> String {
        if !self.dir_names.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.dir_names.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }

    /// Append one entry and rewrite the manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be serialized or written.
    /// The entry stays in memory either way.
    #[instrument(level = "info", skip_all, fields(species = %entry.species_name, dir = %dir_name))]
    pub async fn append(&mut self, entry: ManifestEntry, dir_name: String) -> Result<(), ScrapeError> {
        self.entries.push(entry);
        self.dir_names.insert(dir_name);
        self.persist().await?;
        info!(count = self.entries.len(), "Manifest updated");
        Ok(())
    }

    /// Write the full collection as pretty-printed JSON, replacing the file.
    pub async fn persist(&self) -> Result<(), ScrapeError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), "Wrote manifest");
        Ok(())
    }
}
