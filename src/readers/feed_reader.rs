use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{PipelineError, Result};
use crate::models::{CityDocument, FeedEnvelope, RawDocument};
use crate::utils::constants::{DEFAULT_FETCH_TIMEOUT_SECS, FEED_USER_AGENT};

/// Source of raw per-city readings.
#[async_trait]
pub trait ReadingFetcher: Send + Sync {
    /// Fetch one document per city. Cities the provider does not
    /// recognize are skipped and reported in the batch, never fatal;
    /// transport failures abort the whole fetch.
    async fn fetch(&self, cities: &[String]) -> Result<FetchBatch>;
}

/// Result of one fetch pass.
#[derive(Debug, Default)]
pub struct FetchBatch {
    /// Documents for cities the provider answered with `status == "ok"`.
    pub documents: Vec<CityDocument>,
    /// Cities excluded from this run, in request order.
    pub skipped: Vec<String>,
}

impl FetchBatch {
    /// Fold one city's fetch outcome into the batch. Provider-level
    /// rejection becomes a recorded skip; any other failure aborts the
    /// pass.
    fn absorb(&mut self, city: &str, outcome: Result<RawDocument>) -> Result<()> {
        match outcome {
            Ok(document) => {
                self.documents.push(CityDocument { city: city.to_string(), document });
                Ok(())
            }
            Err(PipelineError::UnknownCity { city }) => {
                warn!(stage = "fetch", city = %city, "city not recognized by the feed, skipping");
                self.skipped.push(city);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// HTTP client for the air-quality feed. One GET per city against
/// `{feed_url}/{city}/?token={api_token}`.
pub struct FeedReader {
    client: reqwest::Client,
    feed_url: String,
    api_token: String,
}

impl FeedReader {
    pub fn new(feed_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self> {
        Self::with_timeout(
            feed_url,
            api_token,
            Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        )
    }

    pub fn with_timeout(
        feed_url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(FEED_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            feed_url: feed_url.into().trim_end_matches('/').to_string(),
            api_token: api_token.into(),
        })
    }

    fn city_url(&self, city: &str) -> String {
        format!("{}/{}/", self.feed_url, city)
    }

    /// GET one city. A reachable provider that answers anything other
    /// than a decodable ok-document yields `UnknownCity`.
    async fn fetch_city(&self, city: &str) -> Result<RawDocument> {
        let envelope: FeedEnvelope = self
            .client
            .get(self.city_url(city))
            .query(&[("token", self.api_token.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        decode_envelope(city, envelope)
    }
}

/// An ok envelope must carry a decodable station document; every other
/// answer from a reachable provider is treated as rejection of the
/// city.
fn decode_envelope(city: &str, envelope: FeedEnvelope) -> Result<RawDocument> {
    if !envelope.is_ok() {
        debug!(city = %city, status = %envelope.status, "feed rejected city");
        return Err(PipelineError::UnknownCity { city: city.to_string() });
    }

    let data = envelope.data.ok_or_else(|| {
        debug!(city = %city, "ok envelope carried no data");
        PipelineError::UnknownCity { city: city.to_string() }
    })?;

    serde_json::from_value(data).map_err(|err| {
        debug!(city = %city, error = %err, "undecodable feed document");
        PipelineError::UnknownCity { city: city.to_string() }
    })
}

#[async_trait]
impl ReadingFetcher for FeedReader {
    async fn fetch(&self, cities: &[String]) -> Result<FetchBatch> {
        let mut batch = FetchBatch::default();
        for city in cities {
            batch.absorb(city, self.fetch_city(city).await)?;
        }
        debug!(
            stage = "fetch",
            fetched = batch.documents.len(),
            skipped = batch.skipped.len(),
            "fetch pass complete"
        );
        Ok(batch)
    }
}
