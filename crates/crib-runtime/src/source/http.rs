//! HTTP access to the metrics service.

use std::time::Duration;

use async_trait::async_trait;
use crib_common::config::DashboardConfig;
use crib_common::error::{CribError, Result};
use crib_common::types::{Sample, TimeSeries};
use reqwest::{Client, Url};

use super::DataSource;
use super::csv::parse_samples;

/// Fetches widget data over HTTP, resolving endpoints against a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    /// Creates a source for `base_url` with an optional per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`CribError::Config`] if the URL is invalid or the client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        // Without a trailing slash `join` would drop the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized).map_err(|e| CribError::Config {
            message: format!("invalid base URL {base_url:?}: {e}"),
        })?;

        let mut builder = Client::builder().user_agent(concat!("crib/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| CribError::Config {
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { client, base_url })
    }

    /// Creates a source from the dashboard's base URL and fetch timeout.
    ///
    /// # Errors
    ///
    /// See [`HttpSource::new`].
    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(&config.base_url, config.fetch_timeout_ms.map(Duration::from_millis))
    }

    /// Base URL endpoints are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL of `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`CribError::Fetch`] if the endpoint does not form a valid URL.
    pub fn resolve(&self, endpoint: &str) -> Result<Url> {
        self.base_url.join(endpoint).map_err(|e| CribError::Fetch {
            url: endpoint.to_string(),
            message: format!("invalid endpoint: {e}"),
        })
    }

    async fn get(&self, endpoint: &str) -> Result<(Url, reqwest::Response)> {
        let url = self.resolve(endpoint)?;
        tracing::trace!(%url, "fetching");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| fetch_error(&url, e))?;
        Ok((url, response))
    }
}

fn fetch_error(url: &Url, err: impl std::fmt::Display) -> CribError {
    CribError::Fetch {
        url: url.to_string(),
        message: err.to_string(),
    }
}

#[async_trait]
impl DataSource for HttpSource {
    async fn fetch_samples(&self, endpoint: &str) -> Result<Vec<Sample>> {
        let (url, response) = self.get(endpoint).await?;
        let body = response.text().await.map_err(|e| fetch_error(&url, e))?;
        let samples = parse_samples(&body).map_err(|e| fetch_error(&url, e))?;
        tracing::debug!(%url, rows = samples.len(), "fetched samples");
        Ok(samples)
    }

    async fn fetch_series(&self, endpoint: &str) -> Result<TimeSeries> {
        let (url, response) = self.get(endpoint).await?;
        let series: TimeSeries = response.json().await.map_err(|e| fetch_error(&url, e))?;
        tracing::debug!(%url, points = series.values.len(), "fetched series");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_resolve_against_base() {
        let source = HttpSource::new("http://localhost:8000/", None).expect("source");
        let url = source
            .resolve("heatmap_data?metric=cpu&entity=web")
            .expect("url");
        assert_eq!(url.as_str(), "http://localhost:8000/heatmap_data?metric=cpu&entity=web");
    }

    #[test]
    fn base_without_trailing_slash_keeps_its_path() {
        let source = HttpSource::new("http://metrics.local/api", None).expect("source");
        let url = source.resolve("ts_sum?entity=web&metric=rps").expect("url");
        assert_eq!(url.as_str(), "http://metrics.local/api/ts_sum?entity=web&metric=rps");
    }

    #[test]
    fn invalid_base_is_a_config_error() {
        let err = HttpSource::new("not a url", None).unwrap_err();
        assert!(matches!(err, CribError::Config { .. }));
    }

    #[test]
    fn from_config_uses_base_url() {
        let config = DashboardConfig {
            fetch_timeout_ms: Some(1500),
            ..DashboardConfig::default()
        };
        let source = HttpSource::from_config(&config).expect("source");
        assert_eq!(source.base_url().as_str(), "http://localhost:8000/");
    }

    #[tokio::test]
    async fn unreachable_service_is_a_fetch_error() {
        // Port 9 (discard) is closed on test hosts.
        let source = HttpSource::new("http://127.0.0.1:9/", Some(Duration::from_millis(500)))
            .expect("source");
        let err = source.fetch_series("ts_sum").await.unwrap_err();
        assert!(err.is_fetch());
        assert!(err.to_string().contains("127.0.0.1:9"));
    }
}
