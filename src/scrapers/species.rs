//! Species record builder.
//!
//! Runs the extraction rules for one detail page in a fixed order:
//!
//! ```text
//! Empty -> Identity -> Media -> Video -> Description -> Facts -> Location -> Finalized
//! ```
//!
//! Identity is the only stage that can abort the item. Every later stage is
//! optional: on failure it logs why and the builder moves on.

use crate::extract::{media, rules};
use crate::extract::rules::{Applied, RuleOutcome};
use crate::models::SpeciesRecord;
use crate::utils::simplified_name;
use crate::video::{VideoResolver, gallery_url};
use scraper::Html;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, instrument, warn};

/// Build stages in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Identity,
    Media,
    Video,
    Description,
    Facts,
    Location,
}

impl Stage {
    /// Every stage, in the order they run. Only identity can abort the item.
    pub const SEQUENCE: [Stage; 6] = [
        Stage::Identity,
        Stage::Media,
        Stage::Video,
        Stage::Description,
        Stage::Facts,
        Stage::Location,
    ];
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Identity => "identity",
            Stage::Media => "media",
            Stage::Video => "video",
            Stage::Description => "description",
            Stage::Facts => "facts",
            Stage::Location => "location",
        };
        f.write_str(name)
    }
}

/// A record that went through every stage, ready for serialization.
#[derive(Debug, Clone)]
pub struct FinalizedRecord {
    pub record: SpeciesRecord,
    /// Stages whose rule succeeded, in execution order.
    pub resolved: Vec<Stage>,
}

/// Drives the extraction rules for one species at a time.
#[derive(Debug)]
pub struct RecordBuilder<V> {
    videos: V,
    output_dir: PathBuf,
    image_width: u32,
}

impl<V: VideoResolver> RecordBuilder<V> {
    pub fn new(videos: V, output_dir: impl Into<PathBuf>, image_width: u32) -> Self {
        Self {
            videos,
            output_dir: output_dir.into(),
            image_width,
        }
    }

    /// Build a record from a parsed detail page.
    ///
    /// `allocate_dir` maps the species' simplified name to the directory it
    /// will live in; it is called once, right after identity resolves, so the
    /// video stage and the serializer agree on the location.
    ///
    /// Returns `None` if the page has no species-info fragment or any of the
    /// four names is empty. Nothing is downloaded for such a page.
    #[instrument(level = "info", skip_all, fields(%item_url))]
    pub async fn build<F>(
        &self,
        document: &Html,
        item_url: &str,
        mut allocate_dir: F,
    ) -> Option<FinalizedRecord>
    where
        F: FnMut(&str) -> String,
    {
        let mut record = SpeciesRecord::default();
        let mut resolved = Vec::with_capacity(Stage::SEQUENCE.len());
        for stage in Stage::SEQUENCE {
            let step = self.run_stage(stage, document, item_url, record).await;
            record = step.record;
            if stage == Stage::Identity && !step.outcome.is_applied() {
                warn!(%item_url, outcome = ?step.outcome, "Failed to extract species info; skipping item");
                return None;
            }
            match step.outcome {
                RuleOutcome::Applied => resolved.push(stage),
                RuleOutcome::NotFound(fragment) => {
                    warn!(%stage, %fragment, species = %record.species_name, "Fragment not found")
                }
                RuleOutcome::FormatViolation(reason) => {
                    warn!(%stage, %reason, species = %record.species_name, "Unexpected fragment format")
                }
            }

            if stage == Stage::Identity {
                if let Err(e) = record.validate_names() {
                    warn!(%item_url, error = %e, "Incomplete species identity; skipping item");
                    return None;
                }
                record.dir_name = allocate_dir(&simplified_name(&record.species_name));
                debug!(species = %record.species_name, dir = %record.dir_name, "Identity resolved");
            }
        }

        info!(
            species = %record.species_name,
            resolved = resolved.len(),
            "Finalized species record"
        );
        Some(FinalizedRecord { record, resolved })
    }

    async fn run_stage(
        &self,
        stage: Stage,
        document: &Html,
        item_url: &str,
        record: SpeciesRecord,
    ) -> Applied {
        match stage {
            Stage::Identity => rules::identity(document, record),
            Stage::Media => media::resolve_images(document, record, self.image_width),
            Stage::Video => self.resolve_videos(item_url, record).await,
            Stage::Description => rules::overview(document, record),
            Stage::Facts => rules::facts(document, record),
            Stage::Location => rules::location(document, record),
        }
    }

    /// Downloader failures are treated as "no videos".
    async fn resolve_videos(&self, item_url: &str, mut record: SpeciesRecord) -> Applied {
        let gallery = gallery_url(item_url);
        let target = self.output_dir.join(&record.dir_name);
        match self.videos.resolve(&gallery, &target).await {
            Ok(files) if !files.is_empty() => {
                record.video_files = Some(files);
                Applied::ok(record)
            }
            Ok(_) => Applied::missing(record, "gallery videos"),
            Err(e) => {
                warn!(%gallery, error = %e, "Failed to download video media");
                Applied::missing(record, "gallery videos")
            }
        }
    }
}
