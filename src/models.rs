//! Data models for species records and their persisted manifest form.
//!
//! - [`SpeciesRecord`]: the in-memory record filled in by the extraction rules
//! - [`ManifestEntry`]: what ends up in `manifest.json` for one species
//!
//! The manifest keys are snake_case because the companion app reads them
//! verbatim.

use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};

/// One species as extracted from its detail page.
///
/// The identity fields start out empty and are filled by the identity rule.
/// Every other field stays `None` unless its rule succeeded, and list
/// fields are never partially populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesRecord {
    /// Display name, e.g. "Wood Duck". Key for the on-disk directory.
    pub species_name: String,
    pub scientific_name: String,
    pub order: String,
    pub family: String,
    /// Directory name under the manifest root, allocated right after identity.
    pub dir_name: String,
    pub basic_description: Option<String>,
    pub cool_facts: Option<Vec<String>>,
    pub find_this_bird: Option<String>,
    /// Resolved high-resolution image URLs. Downloaded during serialization.
    pub image_urls: Option<Vec<String>>,
    /// Local video files already dropped by the video downloader.
    pub video_files: Option<Vec<std::path::PathBuf>>,
}

impl SpeciesRecord {
    /// Check that every required identity field is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::MissingIdentity`] naming the first empty field.
    pub fn validate_identity(&self) -> Result<(), ScrapeError> {
        self.validate_names()?;
        if self.dir_name.trim().is_empty() {
            return Err(ScrapeError::MissingIdentity { field: "dir_name" });
        }
        Ok(())
    }

    /// Like [`Self::validate_identity`] but ignores `dir_name`, which is only
    /// allocated once the names are known.
    pub fn validate_names(&self) -> Result<(), ScrapeError> {
        let required = [
            ("species_name", &self.species_name),
            ("scientific_name", &self.scientific_name),
            ("order", &self.order),
            ("family", &self.family),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ScrapeError::MissingIdentity { field });
            }
        }
        Ok(())
    }
}

/// The persisted form of one species.
///
/// Optional keys are omitted entirely when the source field is unset.
/// File-valued keys hold paths relative to the manifest root.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ManifestEntry {
    pub species_name: String,
    pub scientific_name: String,
    pub order: String,
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cool_facts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_this_bird: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<String>>,
}

impl ManifestEntry {
    /// Entry carrying only the identity fields of `record`.
    pub fn identity_of(record: &SpeciesRecord) -> Self {
        Self {
            species_name: record.species_name.clone(),
            scientific_name: record.scientific_name.clone(),
            order: record.order.clone(),
            family: record.family.clone(),
            basic_description: None,
            cool_facts: None,
            find_this_bird: None,
            images: None,
            videos: None,
        }
    }
}
