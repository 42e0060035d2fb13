//! Photo-gallery video retrieval.
//!
//! Videos are pulled by an external downloader (`yt-dlp` by default) pointed
//! at the species' photo-gallery page. The downloader drops numbered `.mp4`
//! files straight into the species directory; this module then lists them.
//!
//! The pipeline only sees the [`VideoResolver`] trait, so tests run against
//! fakes and `--no-videos` plugs in [`NoVideos`].

use crate::error::ScrapeError;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

pub const GALLERY_SEGMENT: &str = "photo-gallery";
pub const VIDEO_EXTENSION: &str = "mp4";

/// Trait for resolving a species' gallery videos to local files.
pub trait VideoResolver {
    /// Download (or look up) the videos behind `gallery_url` into `target_dir`
    /// and return the local paths in name order.
    async fn resolve(&self, gallery_url: &str, target_dir: &Path)
    -> Result<Vec<PathBuf>, ScrapeError>;
}

/// Derive the photo-gallery URL from a species overview URL.
///
/// Trailing slashes and a trailing `overview` segment are stripped before
/// `/photo-gallery` is appended:
///
/// ```ignore
/// assert_eq!(
///     gallery_url("https://site.test/guide/Wood_Duck/overview/"),
///     "https://site.test/guide/Wood_Duck/photo-gallery"
/// );
/// ```
pub fn gallery_url(item_url: &str) -> String {
    let base = item_url.trim_end_matches('/');
    let base = base.strip_suffix("overview").unwrap_or(base);
    let base = base.trim_end_matches('/');
    format!("{base}/{GALLERY_SEGMENT}")
}

/// Runs an external downloader as a subprocess.
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    program: String,
}

impl YtDlpResolver {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Output template handed to the downloader: one file per playlist entry.
    fn output_template(target_dir: &Path) -> String {
        format!(
            "{}/video%(playlist_index)d.{VIDEO_EXTENSION}",
            target_dir.display()
        )
    }
}

impl VideoResolver for YtDlpResolver {
    #[instrument(level = "info", skip_all, fields(%gallery_url, program = %self.program))]
    async fn resolve(
        &self,
        gallery_url: &str,
        target_dir: &Path,
    ) -> Result<Vec<PathBuf>, ScrapeError> {
        let output = Command::new(&self.program)
            .arg("-o")
            .arg(Self::output_template(target_dir))
            .arg(gallery_url)
            .output()
            .await
            .map_err(|e| ScrapeError::VideoDownloader(format!("could not run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScrapeError::VideoDownloader(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                crate::utils::truncate_for_log(stderr.trim(), 300)
            )));
        }

        let videos = list_videos(target_dir).await?;
        info!(count = videos.len(), "Downloaded gallery videos");
        Ok(videos)
    }
}

/// Video capability used when downloads are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVideos;

impl VideoResolver for NoVideos {
    async fn resolve(&self, gallery_url: &str, _: &Path) -> Result<Vec<PathBuf>, ScrapeError> {
        debug!(%gallery_url, "Video downloads disabled");
        Ok(Vec::new())
    }
}

/// The resolver selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredVideos {
    Downloader(YtDlpResolver),
    Disabled(NoVideos),
}

impl ConfiguredVideos {
    pub fn from_program(program: Option<&str>) -> Self {
        match program {
            Some(p) => Self::Downloader(YtDlpResolver::new(p)),
            None => Self::Disabled(NoVideos),
        }
    }
}

impl VideoResolver for ConfiguredVideos {
    async fn resolve(
        &self,
        gallery_url: &str,
        target_dir: &Path,
    ) -> Result<Vec<PathBuf>, ScrapeError> {
        match self {
            Self::Downloader(r) => r.resolve(gallery_url, target_dir).await,
            Self::Disabled(r) => r.resolve(gallery_url, target_dir).await,
        }
    }
}

/// Every `*.mp4` directly inside `dir`, sorted by file name.
///
/// A missing directory means the downloader produced nothing.
pub async fn list_videos(dir: &Path) -> Result<Vec<PathBuf>, ScrapeError> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "Video directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut videos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == VIDEO_EXTENSION) {
            videos.push(path);
        }
    }
    videos.sort();
    Ok(videos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_gallery_url_strips_overview_and_slashes() {
        assert_eq!(
            gallery_url("https://site.test/guide/Wood_Duck/overview"),
            "https://site.test/guide/Wood_Duck/photo-gallery"
        );
        assert_eq!(
            gallery_url("https://site.test/guide/Wood_Duck/overview/"),
            "https://site.test/guide/Wood_Duck/photo-gallery"
        );
        assert_eq!(
            gallery_url("https://site.test/guide/Mallard/"),
            "https://site.test/guide/Mallard/photo-gallery"
        );
        assert_eq!(
            gallery_url("https://site.test/guide/Mallard"),
            "https://site.test/guide/Mallard/photo-gallery"
        );
    }

    #[test]
    fn test_output_template_encodes_playlist_index() {
        let template = YtDlpResolver::output_template(Path::new("ducks/Wood_Duck"));
        assert_eq!(template, "ducks/Wood_Duck/video%(playlist_index)d.mp4");
    }

    #[tokio::test]
    async fn test_list_videos_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["video2.mp4", "video1.mp4", "cool_facts.txt", "image_0.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        let videos = list_videos(dir.path()).await.unwrap();
        let names: Vec<_> = videos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["video1.mp4", "video2.mp4"]);
    }

    #[tokio::test]
    async fn test_list_videos_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let videos = list_videos(&dir.path().join("absent")).await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_missing_program_is_a_downloader_error() {
        let dir = TempDir::new().unwrap();
        let resolver = YtDlpResolver::new("definitely-not-a-real-downloader-binary");
        let err = resolver
            .resolve("https://site.test/guide/Mallard/photo-gallery", dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::VideoDownloader(_)));
    }

    #[tokio::test]
    async fn test_disabled_videos_resolve_to_nothing() {
        let dir = TempDir::new().unwrap();
        let videos = ConfiguredVideos::from_program(None)
            .resolve("https://site.test/x/photo-gallery", dir.path())
            .await
            .unwrap();
        assert!(videos.is_empty());
    }
}
