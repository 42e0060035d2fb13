//! Error types for the scraping pipeline.
//!
//! Only a handful of these ever end a run (listing fetch, configuration,
//! manifest writes). Everything else is caught at the item boundary, logged
//! and turned into an absent field or a skipped item.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Transport-level failure (connect, TLS, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize manifest: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A required identity field was still empty when the record reached serialization.
    #[error("Record is missing required field `{field}`")]
    MissingIdentity { field: &'static str },

    /// A hero image URL did not carry a `-<digits>px` width token.
    #[error("Unexpected image URL format: {url}")]
    ImageFormat { url: String },

    #[error("Video downloader failed: {0}")]
    VideoDownloader(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
