//! Command-line interface definitions for Duck Scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The most commonly overridden options can also come from environment variables.

use crate::config::{
    DEFAULT_BASE_URL, DEFAULT_LISTING_PATH, DEFAULT_MANIFEST_NAME, DEFAULT_OUTPUT_DIR,
    DEFAULT_USER_AGENT, DEFAULT_VIDEO_DOWNLOADER,
};
use clap::Parser;

/// Command-line arguments for the Duck Scraper application.
///
/// # Examples
///
/// ```sh
/// # Scrape everything into ./ducks
/// duck_scraper
///
/// # Quick smoke run: first two species, no videos, short delays
/// duck_scraper --limit 2 --no-videos --min-delay-secs 0.5 --max-delay-secs 1
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory for species folders and the manifest
    #[arg(short, long, env = "DUCK_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: String,

    /// Site root that listing and detail links are resolved against
    #[arg(long, env = "DUCK_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Path of the catalog page listing every species card
    #[arg(long, env = "DUCK_LISTING_PATH", default_value = DEFAULT_LISTING_PATH)]
    pub listing_path: String,

    /// File name of the manifest written under the output directory
    #[arg(long, default_value = DEFAULT_MANIFEST_NAME)]
    pub manifest_name: String,

    /// Pixel width requested for every hero image
    #[arg(long, default_value_t = crate::config::DEFAULT_IMAGE_WIDTH)]
    pub image_width: u32,

    /// Lower bound of the random pause before each request, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub min_delay_secs: f64,

    /// Upper bound of the random pause before each request, in seconds
    #[arg(long, default_value_t = 10.0)]
    pub max_delay_secs: f64,

    /// Browser user-agent sent with every request
    #[arg(long, env = "DUCK_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// External program used to pull photo-gallery videos
    #[arg(long, env = "DUCK_VIDEO_DOWNLOADER", default_value = DEFAULT_VIDEO_DOWNLOADER)]
    pub video_downloader: String,

    /// Skip video downloads
    #[arg(long)]
    pub no_videos: bool,

    /// Stop after this many listing entries
    #[arg(long)]
    pub limit: Option<usize>,
}
