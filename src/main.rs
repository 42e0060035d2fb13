//! # Duck Scraper
//!
//! Walks a field-guide catalog of duck species and saves each species'
//! identity, description, facts, location notes, hero images and gallery
//! videos to a local directory tree, plus a `manifest.json` describing
//! everything that was saved.
//!
//! ## Usage
//!
//! ```sh
//! duck_scraper -o ./ducks
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Indexing**: Collect species detail links from the catalog page
//! 2. **Building**: Run the extraction rules over each detail page
//! 3. **Serializing**: Write text files, download images, build the manifest entry
//! 4. **Manifest**: Rewrite `manifest.json` after every species
//!
//! Species are handled one at a time with a randomized pause before every
//! request. A species that fails any step is skipped; the run carries on.

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod models;
mod net;
mod outputs;
mod scrapers;
mod utils;
mod video;

use cli::Cli;
use config::ScrapeConfig;
use net::{HttpFetcher, RandomDelay};
use scrapers::listing::ListingWalker;
use video::ConfiguredVideos;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("duck_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let config = ScrapeConfig::from_cli(&args).map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e
    })?;
    info!(
        output_dir = %config.output_dir.display(),
        listing = %config.listing_path,
        videos = config.video_downloader.is_some(),
        "Configuration loaded"
    );

    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let delay = RandomDelay::new(config.min_delay, config.max_delay);
    let videos = ConfiguredVideos::from_program(config.video_downloader.as_deref());

    let mut walker = ListingWalker::new(&config, &fetcher, &delay, videos);
    let summary = match walker.run().await {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, "Scrape aborted");
            return Err(e.into());
        }
    };

    if walker.manifest().is_empty() {
        warn!("No species were persisted; check the listing markup and logs above");
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        listed = summary.listed,
        persisted = summary.persisted,
        skipped = summary.skipped,
        entries = walker.manifest().len(),
        manifest = %walker.manifest().path().display(),
        "Execution complete"
    );

    Ok(())
}
