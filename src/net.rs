//! Network capabilities: document fetching and request pacing.
//!
//! The pipeline only ever talks to the network through two traits:
//! - [`DocumentFetcher`]: GET a URL as text or bytes
//! - [`RequestDelay`]: pause before every remote fetch
//!
//! Production code uses [`HttpFetcher`] and [`RandomDelay`]; tests swap in
//! in-memory fetchers and [`NoDelay`].

use crate::error::ScrapeError;
use rand::{Rng, rng};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Trait for retrieving remote documents.
pub trait DocumentFetcher {
    /// Fetch `url` and return the body as text.
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError>;

    /// Fetch `url` and return the raw body.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError>;
}

/// Trait for the politeness pause inserted before each request.
pub trait RequestDelay {
    async fn wait_before_request(&self);
}

/// `reqwest`-backed fetcher that sends a browser user-agent on every request.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher whose client always sends `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the TLS backend cannot be initialised.
    pub fn new(user_agent: &str) -> Result<Self, ScrapeError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response, ScrapeError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "Non-success response");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl DocumentFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
        let body = self.get(url).await?.text().await?;
        debug!(bytes = body.len(), "Fetched document");
        Ok(body)
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
        let body = self.get(url).await?.bytes().await?;
        debug!(bytes = body.len(), "Fetched binary");
        Ok(body.to_vec())
    }
}

/// Sleeps for a uniformly random duration in `[min, max]`.
#[derive(Debug, Clone)]
pub struct RandomDelay {
    min: Duration,
    max: Duration,
}

impl RandomDelay {
    /// Bounds are swapped if given in the wrong order.
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    fn pick(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let secs = rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

impl RequestDelay for RandomDelay {
    async fn wait_before_request(&self) {
        let delay = self.pick();
        debug!(?delay, "Pausing before request");
        sleep(delay).await;
    }
}

/// Zero-delay pacing for tests.
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[cfg(test)]
impl RequestDelay for NoDelay {
    async fn wait_before_request(&self) {}
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory fetcher keyed by URL; unknown URLs answer 404.
    #[derive(Debug, Default)]
    pub(crate) struct FakeFetcher {
        pages: HashMap<String, Vec<u8>>,
        pub(crate) requested: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        pub(crate) fn with(mut self, url: &str, body: impl Into<Vec<u8>>) -> Self {
            self.pages.insert(url.to_string(), body.into());
            self
        }

        fn lookup(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
            self.requested.borrow_mut().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| ScrapeError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    impl DocumentFetcher for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String, ScrapeError> {
            Ok(String::from_utf8_lossy(&self.lookup(url)?).into_owned())
        }

        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScrapeError> {
            self.lookup(url)
        }
    }

    #[test]
    fn test_random_delay_stays_in_window() {
        let delay = RandomDelay::new(Duration::from_millis(10), Duration::from_millis(20));
        for _ in 0..100 {
            let d = delay.pick();
            assert!(d >= Duration::from_millis(10) && d <= Duration::from_millis(20));
        }
    }

    #[test]
    fn test_random_delay_swaps_inverted_bounds() {
        let delay = RandomDelay::new(Duration::from_secs(5), Duration::from_secs(1));
        let d = delay.pick();
        assert!(d >= Duration::from_secs(1) && d <= Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_zero_width_delay_returns_immediately() {
        let delay = RandomDelay::new(Duration::ZERO, Duration::ZERO);
        let t0 = std::time::Instant::now();
        delay.wait_before_request().await;
        NoDelay.wait_before_request().await;
        assert!(t0.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_fake_fetcher_reports_missing_pages_as_404() {
        let fetcher = FakeFetcher::default().with("https://a.test/x", "hello");
        assert_eq!(fetcher.fetch_text("https://a.test/x").await.unwrap(), "hello");
        match fetcher.fetch_text("https://a.test/y").await {
            Err(ScrapeError::Status { status, .. }) => assert_eq!(status, 404),
            other => panic!("expected 404, got {other:?}"),
        }
        assert_eq!(fetcher.requested.borrow().len(), 2);
    }
}
