//! Catalog walker.
//!
//! Fetches the listing page, collects the detail link of every species card
//! and processes the species one at a time: fetch, build, serialize, append
//! to the manifest. A failure on one species is logged and the walk moves on.

use crate::config::ScrapeConfig;
use crate::error::ScrapeError;
use crate::extract::fragments;
use crate::net::{DocumentFetcher, RequestDelay};
use crate::outputs::manifest::ManifestStore;
use crate::outputs::record_files::RecordSerializer;
use crate::scrapers::species::RecordBuilder;
use crate::utils::truncate_for_log;
use crate::video::VideoResolver;
use scraper::Html;
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// Counts for one run over the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub persisted: usize,
    pub skipped: usize,
}

/// Absolute detail URLs of every species card, in page order, without repeats.
///
/// Cards without an anchor are logged and skipped.
pub fn item_links(document: &Html, base: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for card in fragments::species_cards(document) {
        let Some(href) = fragments::card_anchor(card).and_then(|a| a.value().attr("href")) else {
            warn!("No link found for species card");
            continue;
        };
        match base.join(href) {
            Ok(url) => {
                let url = url.to_string();
                if seen.insert(url.clone()) {
                    links.push(url);
                } else {
                    debug!(%url, "Duplicate species link");
                }
            }
            Err(e) => warn!(%href, error = %e, "Unresolvable species link"),
        }
    }
    links
}

pub struct ListingWalker<'a, F, D, V> {
    config: &'a ScrapeConfig,
    fetcher: &'a F,
    delay: &'a D,
    builder: RecordBuilder<V>,
    store: ManifestStore,
}

impl<'a, F, D, V> ListingWalker<'a, F, D, V>
where
    F: DocumentFetcher,
    D: RequestDelay,
    V: VideoResolver,
{
    pub fn new(config: &'a ScrapeConfig, fetcher: &'a F, delay: &'a D, videos: V) -> Self {
        Self {
            config,
            fetcher,
            delay,
            builder: RecordBuilder::new(videos, &config.output_dir, config.image_width),
            store: ManifestStore::new(config.manifest_path()),
        }
    }

    pub fn manifest(&self) -> &ManifestStore {
        &self.store
    }

    /// Walk the whole catalog.
    ///
    /// # Errors
    ///
    /// Only a failed listing fetch or a failed manifest write ends the run.
    #[instrument(level = "info", skip_all)]
    pub async fn run(&mut self) -> Result<RunSummary, ScrapeError> {
        let listing_url = self.config.listing_url()?;
        let body = self.fetcher.fetch_text(listing_url.as_str()).await.map_err(|e| {
            error!(url = %listing_url, error = %e, "Failed to retrieve listing page");
            e
        })?;
        let links = item_links(&Html::parse_document(&body), &self.config.base_url);
        info!(count = links.len(), url = %listing_url, "Indexed species links");

        let limit = self.config.limit.unwrap_or(usize::MAX);
        let mut summary = RunSummary::default();
        for url in links.into_iter().take(limit) {
            summary.listed += 1;
            if self.process_item(&url).await? {
                summary.persisted += 1;
            } else {
                summary.skipped += 1;
            }
        }

        info!(
            listed = summary.listed,
            persisted = summary.persisted,
            skipped = summary.skipped,
            "Catalog walk complete"
        );
        Ok(summary)
    }

    /// Returns whether the species made it into the manifest.
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn process_item(&mut self, url: &str) -> Result<bool, ScrapeError> {
        self.delay.wait_before_request().await;
        let body = match self.fetcher.fetch_text(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%url, error = %e, "Failed to retrieve species page");
                return Ok(false);
            }
        };
        let document = Html::parse_document(&body);

        let store = &self.store;
        let Some(finalized) = self
            .builder
            .build(&document, url, |base| store.unique_dir_name(base))
            .await
        else {
            debug!(page = %truncate_for_log(&body, 200), "Page without species info");
            return Ok(false);
        };

        debug!(stages = ?finalized.resolved, "Resolved build stages");

        let dir_name = finalized.record.dir_name.clone();
        let serializer = RecordSerializer::new(&self.config.output_dir, self.fetcher, self.delay);
        match serializer.serialize(finalized.record).await {
            Ok(entry) => {
                self.store.append(entry, dir_name).await?;
                Ok(true)
            }
            Err(e) => {
                error!(%url, error = %e, "Failed to persist species");
                Ok(false)
            }
        }
    }
}
