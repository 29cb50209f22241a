//! Where menu trees come from.
//!
//! [`FixtureMenuSource`] answers with the built-in tree and never fails.
//! [`RemoteMenuSource`] asks another HTTP service for `GET {base_url}/menus`,
//! which is the same shape this service exposes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::FetchError;
use crate::menu::fixture::fixture_menus;
use crate::models::MenuEntry;

/// Base delay before the first retry of an unreachable remote source.
const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

/// Backoff stops growing after this many doublings (200ms * 2^6 = 12.8s).
const MAX_BACKOFF_EXPONENT: u32 = 6;

/// Delay before retry number `attempt` (zero-based).
fn backoff_delay(attempt: u32) -> Duration {
    RETRY_BASE_DELAY * 2u32.pow(attempt.min(MAX_BACKOFF_EXPONENT))
}

/// Something that can produce the current menu tree.
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menus(&self) -> Result<Vec<MenuEntry>, FetchError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Serves the built-in menu tree after an optional artificial delay.
#[derive(Debug, Clone, Default)]
pub struct FixtureMenuSource {
    delay: Option<Duration>,
}

impl FixtureMenuSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }
}

#[async_trait]
impl MenuSource for FixtureMenuSource {
    async fn fetch_menus(&self) -> Result<Vec<MenuEntry>, FetchError> {
        match self.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        Ok(fixture_menus())
    }

    fn describe(&self) -> String {
        "fixture".to_string()
    }
}

/// Fetches the menu tree from a remote job-admin compatible API.
#[derive(Debug, Clone)]
pub struct RemoteMenuSource {
    base_url: String,
    retries: u32,
    client: Client,
}

impl RemoteMenuSource {
    pub fn new(base_url: impl Into<String>, retries: u32) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retries,
            client: Client::new(),
        }
    }

    async fn fetch_once(&self) -> Result<Vec<MenuEntry>, FetchError> {
        let url = format!("{}/menus", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Vec<MenuEntry>>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MenuSource for RemoteMenuSource {
    /// Connection failures are retried with exponential backoff; any answer
    /// from the server, good or bad, is final.
    async fn fetch_menus(&self) -> Result<Vec<MenuEntry>, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Err(FetchError::Unreachable(reason)) if attempt < self.retries => {
                    let delay = backoff_delay(attempt);
                    tracing::warn!(
                        "Menu source {} unreachable ({}), retrying in {:?}",
                        self.base_url,
                        reason,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    fn describe(&self) -> String {
        format!("remote {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_source_returns_fixture() {
        let menus = FixtureMenuSource::new().fetch_menus().await.unwrap();
        assert_eq!(menus, fixture_menus());
    }

    #[test]
    fn remote_source_trims_trailing_slash() {
        let source = RemoteMenuSource::new("http://localhost:9/api/v1/", 0);
        assert_eq!(source.describe(), "remote http://localhost:9/api/v1");
    }

    #[test]
    fn backoff_doubles_then_levels_off() {
        assert_eq!(backoff_delay(0), Duration::from_millis(200));
        assert_eq!(backoff_delay(1), Duration::from_millis(400));
        assert_eq!(backoff_delay(6), Duration::from_millis(12_800));
        assert_eq!(backoff_delay(40), Duration::from_millis(12_800));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_millis(12_800));
    }

    #[tokio::test]
    async fn remote_source_reports_unreachable_without_retries() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = RemoteMenuSource::new(format!("http://{}/api/v1", addr), 0);
        let err = source.fetch_menus().await.unwrap_err();
        assert!(matches!(err, FetchError::Unreachable(_)));
    }
}
