/// TMDB movie metadata provider
///
/// Looks up `/movie/{id}` with a per-attempt timeout and retries transient
/// server failures with exponential backoff.
use std::time::Duration;

use reqwest::Client as HttpClient;
use tracing::instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{MetadataRecord, TmdbMovieDetails},
    services::providers::MetadataProvider,
    services::retry::{with_retry, AttemptError, RetryPolicy},
};

/// Connection settings for the TMDB API
#[derive(Debug, Clone)]
pub struct TmdbSettings {
    pub api_key: String,
    pub api_url: String,
    pub language: String,
    pub image_base_url: String,
    pub fallback_poster_url: String,
    pub request_timeout: Duration,
    pub retry: RetryPolicy,
}

impl From<&Config> for TmdbSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_key: config.tmdb_api_key.clone(),
            api_url: config.tmdb_api_url.trim_end_matches('/').to_string(),
            language: config.tmdb_language.clone(),
            image_base_url: config.image_base_url.clone(),
            fallback_poster_url: config.fallback_poster_url.clone(),
            request_timeout: config.request_timeout(),
            retry: RetryPolicy::new(config.max_attempts, config.initial_backoff()),
        }
    }
}

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    settings: TmdbSettings,
}

impl TmdbProvider {
    pub fn new(settings: TmdbSettings) -> Self {
        Self {
            http_client: HttpClient::new(),
            settings,
        }
    }

    /// One request/response round-trip, classified for the retry loop
    async fn attempt(&self, url: &str, item_id: i64, attempt: u32) -> Result<TmdbMovieDetails, AttemptError> {
        tracing::debug!(item_id, attempt, provider = "tmdb", "Requesting movie details");

        let response = self
            .http_client
            .get(url)
            .query(&[
                ("api_key", self.settings.api_key.as_str()),
                ("language", self.settings.language.as_str()),
            ])
            .timeout(self.settings.request_timeout)
            .send()
            .await
            .map_err(AttemptError::from_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = AppError::ExternalApi(format!("TMDB returned status {}: {}", status, body));
            return Err(if RetryPolicy::is_retryable_status(status) {
                AttemptError::Transient(error)
            } else {
                AttemptError::Fatal(error)
            });
        }

        let body = response.text().await.map_err(AttemptError::from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(item_id, error = %e, "Failed to deserialize TMDB response");
            AttemptError::Fatal(AppError::ExternalApi(format!(
                "Failed to parse TMDB response: {}",
                e
            )))
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    #[instrument(skip(self), fields(provider = "tmdb"))]
    async fn fetch_details(&self, item_id: i64) -> AppResult<MetadataRecord> {
        let url = format!("{}/movie/{}", self.settings.api_url, item_id);

        let details = with_retry(&self.settings.retry, |attempt| self.attempt(&url, item_id, attempt)).await?;

        let record = details.into_record(
            &self.settings.image_base_url,
            &self.settings.fallback_poster_url,
        );

        tracing::info!(
            item_id,
            rating = %record.rating,
            release_year = %record.release_year,
            "Movie details fetched"
        );

        Ok(record)
    }

    fn fallback_poster_url(&self) -> String {
        self.settings.fallback_poster_url.clone()
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
