//! Runtime configuration and site constants.
//!
//! [`ScrapeConfig`] is the validated form of the command-line arguments and
//! is what the rest of the pipeline reads.

use crate::cli::Cli;
use crate::error::ScrapeError;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.allaboutbirds.org";
pub const DEFAULT_LISTING_PATH: &str = "/guide/browse/shape/Ducks";
pub const DEFAULT_OUTPUT_DIR: &str = "ducks";
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";
pub const DEFAULT_VIDEO_DOWNLOADER: &str = "yt-dlp";
pub const DEFAULT_IMAGE_WIDTH: u32 = 720;

/// The site rejects requests that don't look like a browser.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:144.0) Gecko/20100101 Firefox/144.0";

/// Validated settings for one scraping run.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: Url,
    pub listing_path: String,
    /// Root of the collection; one subdirectory per species plus the manifest.
    pub output_dir: PathBuf,
    pub manifest_name: String,
    pub user_agent: String,
    /// Canonical `-<width>px` token requested for every hero image.
    pub image_width: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// `None` disables video downloads entirely.
    pub video_downloader: Option<String>,
    pub limit: Option<usize>,
}

impl ScrapeConfig {
    /// Validate CLI arguments into a config.
    ///
    /// # Errors
    ///
    /// [`ScrapeError::Config`] if the base URL does not parse, the delay
    /// window is negative, infinite or inverted, or the image width is zero.
    pub fn from_cli(cli: &Cli) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&cli.base_url)
            .map_err(|e| ScrapeError::Config(format!("base URL {:?}: {e}", cli.base_url)))?;

        if !(cli.min_delay_secs >= 0.0 && cli.max_delay_secs >= 0.0) {
            return Err(ScrapeError::Config("request delays must be non-negative".to_string()));
        }
        if !(cli.min_delay_secs.is_finite() && cli.max_delay_secs.is_finite()) {
            return Err(ScrapeError::Config("request delays must be finite".to_string()));
        }
        if cli.min_delay_secs > cli.max_delay_secs {
            return Err(ScrapeError::Config(format!(
                "min delay {}s exceeds max delay {}s",
                cli.min_delay_secs, cli.max_delay_secs
            )));
        }
        if cli.image_width == 0 {
            return Err(ScrapeError::Config("image width must be positive".to_string()));
        }

        Ok(Self {
            base_url,
            listing_path: cli.listing_path.clone(),
            output_dir: PathBuf::from(&cli.output_dir),
            manifest_name: cli.manifest_name.clone(),
            user_agent: cli.user_agent.clone(),
            image_width: cli.image_width,
            min_delay: Duration::from_secs_f64(cli.min_delay_secs),
            max_delay: Duration::from_secs_f64(cli.max_delay_secs),
            video_downloader: (!cli.no_videos).then(|| cli.video_downloader.clone()),
            limit: cli.limit,
        })
    }

    /// Absolute URL of the catalog page.
    pub fn listing_url(&self) -> Result<Url, ScrapeError> {
        Ok(self.base_url.join(&self.listing_path)?)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest_name)
    }
}
