//! Detail-page extraction.
//!
//! - [`fragments`]: named DOM predicates, the only place that knows CSS selectors
//! - [`rules`]: identity, overview, facts and location rules
//! - [`media`]: hero image URL resolution
//!
//! All rules share the `(document, record) -> Applied` shape so the
//! builder can chain them without caring which field each one owns.

pub mod fragments;
pub mod media;
pub mod rules;
