//! Data sources widgets fetch from.
//!
//! A source resolves a widget's endpoint (a path relative to the metrics
//! service) into either a categorical dataset or a numeric series.

pub mod csv;
pub mod demo;
pub mod http;

use async_trait::async_trait;
use crib_common::error::Result;
use crib_common::types::{Sample, TimeSeries};

pub use demo::DemoSource;
pub use http::HttpSource;

/// Asynchronous provider of widget data.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetches a categorical dataset (`group,variable,value` rows).
    ///
    /// # Errors
    ///
    /// Returns [`crib_common::error::CribError::Fetch`] if the request or
    /// decoding fails.
    async fn fetch_samples(&self, endpoint: &str) -> Result<Vec<Sample>>;

    /// Fetches a numeric series.
    ///
    /// # Errors
    ///
    /// Returns [`crib_common::error::CribError::Fetch`] if the request or
    /// decoding fails.
    async fn fetch_series(&self, endpoint: &str) -> Result<TimeSeries>;
}
