//! Field extraction rules for species detail pages.
//!
//! Every rule has the same shape: it takes a read-only document and a
//! partially built [`SpeciesRecord`], and hands back the record (with its
//! one field set on success) together with a [`RuleOutcome`]. Rules never
//! touch fields they don't own, so apart from identity going first they can
//! run in any order.

use crate::extract::fragments;
use crate::models::SpeciesRecord;
use crate::utils::element_text;
use scraper::Html;

/// How a single rule fared against a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Applied,
    /// The fragment the rule looks for is absent. Field left unset.
    NotFound(&'static str),
    /// The fragment is present but its content breaks an expected pattern.
    FormatViolation(String),
}

impl RuleOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, RuleOutcome::Applied)
    }
}

/// A record returned from a rule along with the rule's outcome.
#[derive(Debug, Clone)]
pub struct Applied {
    pub record: SpeciesRecord,
    pub outcome: RuleOutcome,
}

impl Applied {
    pub fn ok(record: SpeciesRecord) -> Self {
        Self {
            record,
            outcome: RuleOutcome::Applied,
        }
    }

    pub fn missing(record: SpeciesRecord, fragment: &'static str) -> Self {
        Self {
            record,
            outcome: RuleOutcome::NotFound(fragment),
        }
    }
}

/// Fill in display name, scientific name, order and family.
///
/// Only a missing species-info block counts as failure. Order and family
/// come from the additional-info list, matched on the lower-cased label;
/// if either is absent the field stays empty and the builder drops the
/// record before anything is downloaded.
pub fn identity(document: &Html, mut record: SpeciesRecord) -> Applied {
    let Some(info) = fragments::species_info(document) else {
        return Applied::missing(record, "species-info");
    };

    if let Some(name) = fragments::species_name(info) {
        record.species_name = element_text(name);
    }
    if let Some(sci) = fragments::scientific_name(info) {
        record.scientific_name = element_text(sci);
    }

    for item in fragments::additional_info_items(info) {
        let Some(label) = fragments::item_label(item) else {
            continue;
        };
        let label = element_text(label).to_lowercase();
        let value = labelled_value(&element_text(item));
        if label.starts_with("order:") {
            record.order = value;
        } else if label.starts_with("family:") {
            record.family = value;
        }
    }

    Applied::ok(record)
}

/// Text between the first colon and the next one, trimmed.
///
/// `"Order: Anseriformes"` yields `"Anseriformes"`.
fn labelled_value(text: &str) -> String {
    text.split(':').nth(1).unwrap_or_default().trim().to_string()
}

/// First paragraph of the Overview section becomes the description.
pub fn overview(document: &Html, mut record: SpeciesRecord) -> Applied {
    let Some(paragraph) = fragments::overview_section(document).and_then(fragments::first_paragraph)
    else {
        return Applied::missing(record, "overview");
    };
    record.basic_description = Some(element_text(paragraph));
    Applied::ok(record)
}

/// Each item of the list nested in the accordion becomes one fact, in order.
pub fn facts(document: &Html, mut record: SpeciesRecord) -> Applied {
    let Some(accordion) = fragments::accordion(document) else {
        return Applied::missing(record, "accordion");
    };
    let Some(list) = fragments::accordion_list(accordion) else {
        return Applied::missing(record, "accordion list");
    };
    record.cool_facts = Some(fragments::list_items(list).into_iter().map(element_text).collect());
    Applied::ok(record)
}

/// First paragraph under the "Find This Bird" header.
pub fn location(document: &Html, mut record: SpeciesRecord) -> Applied {
    let Some(paragraph) =
        fragments::find_this_bird_section(document).and_then(fragments::first_paragraph)
    else {
        return Applied::missing(record, "find-this-bird");
    };
    record.find_this_bird = Some(element_text(paragraph));
    Applied::ok(record)
}
