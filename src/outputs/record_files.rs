//! Per-species files on disk.
//!
//! Turns a finalized [`SpeciesRecord`] into its directory under the
//! collection root and the matching [`ManifestEntry`]:
//!
//! ```text
//! ducks/
//! ├── manifest.json
//! └── Wood_Duck/
//!     ├── basic_description.txt
//!     ├── cool_facts.txt        # one fact per line
//!     ├── find_this_bird.txt
//!     ├── image_0.jpg
//!     └── video1.mp4
//! ```
//!
//! Only fields that are set produce a file and a manifest key.

use crate::error::ScrapeError;
use crate::models::{ManifestEntry, SpeciesRecord};
use crate::net::{DocumentFetcher, RequestDelay};
use itertools::Itertools;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

pub const DESCRIPTION_FILE: &str = "basic_description.txt";
pub const FACTS_FILE: &str = "cool_facts.txt";
pub const LOCATION_FILE: &str = "find_this_bird.txt";

pub fn image_file_name(index: usize) -> String {
    format!("image_{index}.jpg")
}

/// Writes species directories and downloads their images.
#[derive(Debug)]
pub struct RecordSerializer<'a, F, D> {
    root: &'a Path,
    fetcher: &'a F,
    delay: &'a D,
}

impl<'a, F: DocumentFetcher, D: RequestDelay> RecordSerializer<'a, F, D> {
    pub fn new(root: &'a Path, fetcher: &'a F, delay: &'a D) -> Self {
        Self {
            root,
            fetcher,
            delay,
        }
    }

    /// Persist `record` under the root and return its manifest entry.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::MissingIdentity`] if any identity field is empty (no
    /// files are written in that case), or an I/O error writing the text
    /// files. Image download failures only drop the `images` key.
    #[instrument(level = "info", skip_all, fields(species = %record.species_name))]
    pub async fn serialize(&self, record: SpeciesRecord) -> Result<ManifestEntry, ScrapeError> {
        record.validate_identity()?;

        let dir_name = record.dir_name.as_str();
        let dir = self.root.join(dir_name);
        fs::create_dir_all(&dir).await?;

        let mut entry = ManifestEntry::identity_of(&record);

        if let Some(description) = &record.basic_description {
            fs::write(dir.join(DESCRIPTION_FILE), description).await?;
            entry.basic_description = Some(format!("{dir_name}/{DESCRIPTION_FILE}"));
        }

        if let Some(facts) = &record.cool_facts {
            let body: String = facts.iter().map(|fact| format!("{fact}\n")).collect();
            fs::write(dir.join(FACTS_FILE), body).await?;
            entry.cool_facts = Some(format!("{dir_name}/{FACTS_FILE}"));
        }

        if let Some(location) = &record.find_this_bird {
            fs::write(dir.join(LOCATION_FILE), location).await?;
            entry.find_this_bird = Some(format!("{dir_name}/{LOCATION_FILE}"));
        }

        if let Some(urls) = &record.image_urls {
            entry.images = self.download_images(urls, &dir, dir_name).await?;
        }

        if let Some(videos) = &record.video_files {
            entry.videos = Some(
                videos
                    .iter()
                    .map(|path| self.relative_ref(path, dir_name))
                    .collect(),
            );
        }

        info!(dir = %dir.display(), "Wrote species files");
        Ok(entry)
    }

    /// Download every image in order as `image_<n>.jpg`.
    ///
    /// All or nothing: if one download fails the files already written for
    /// this species are removed and `None` is returned.
    async fn download_images(
        &self,
        urls: &[String],
        dir: &Path,
        dir_name: &str,
    ) -> Result<Option<Vec<String>>, ScrapeError> {
        let mut written: Vec<PathBuf> = Vec::with_capacity(urls.len());
        let mut refs = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            self.delay.wait_before_request().await;
            let bytes = match self.fetcher.fetch_bytes(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(%url, error = %e, "Image download failed; dropping images for species");
                    for path in &written {
                        if let Err(e) = fs::remove_file(path).await {
                            warn!(path = %path.display(), error = %e, "Could not remove partial image");
                        }
                    }
                    return Ok(None);
                }
            };
            let name = image_file_name(index);
            let path = dir.join(&name);
            fs::write(&path, bytes).await?;
            written.push(path);
            refs.push(format!("{dir_name}/{name}"));
        }

        Ok((!refs.is_empty()).then_some(refs))
    }

    /// Manifest path for a local file: relative to the root, `/`-separated.
    ///
    /// Files outside the root fall back to `<dir_name>/<file name>`.
    fn relative_ref(&self, path: &Path, dir_name: &str) -> String {
        match path.strip_prefix(self.root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .join("/"),
            Err(_) => {
                let file = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("{dir_name}/{file}")
            }
        }
    }
}
