//! Catalog scraping.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing**: [`listing`] reads the catalog page and collects the
//!    detail URL of every species card
//! 2. **Building**: [`species`] turns one detail page into a finalized
//!    record, which the walker then serializes and appends to the manifest
//!
//! Species are processed strictly one after another, with a randomized
//! pause before every request.

pub mod listing;
pub mod species;
