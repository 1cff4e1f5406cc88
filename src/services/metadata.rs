use std::sync::Arc;

use crate::{cache::MetadataCache, models::MetadataRecord, services::providers::MetadataProvider};

/// Metadata lookups that never fail outward
///
/// Any provider error is absorbed into the unavailable record. Successful lookups
/// are cached by item id for the lifetime of the process; unavailable records are
/// not, so a later request can recover from a transient outage.
#[derive(Clone)]
pub struct MetadataClient {
    provider: Arc<dyn MetadataProvider>,
    cache: MetadataCache,
}

impl MetadataClient {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            cache: MetadataCache::new(),
        }
    }

    /// Fetches metadata for one item, degrading to sentinel values on any failure
    pub async fn fetch(&self, item_id: i64) -> MetadataRecord {
        if let Some(cached) = self.cache.get_from_cache(item_id).await {
            tracing::debug!(item_id, "Metadata cache hit");
            return cached;
        }

        match self.provider.fetch_details(item_id).await {
            Ok(record) => {
                self.cache.set(item_id, record.clone()).await;
                record
            }
            Err(e) => {
                tracing::warn!(
                    item_id,
                    provider = self.provider.name(),
                    error = %e,
                    "Metadata lookup failed, returning unavailable record"
                );
                self.unavailable()
            }
        }
    }

    /// Fetches metadata for several items in parallel, preserving input order
    pub async fn fetch_many(&self, item_ids: &[i64]) -> Vec<MetadataRecord> {
        let mut tasks = Vec::with_capacity(item_ids.len());

        for &item_id in item_ids {
            let client = self.clone();
            let task = tokio::spawn(async move { client.fetch(item_id).await });
            tasks.push((item_id, task));
        }

        let mut records = Vec::with_capacity(tasks.len());
        for (item_id, task) in tasks {
            match task.await {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::error!(item_id, error = %e, "Metadata task join error");
                    records.push(self.unavailable());
                }
            }
        }

        records
    }

    fn unavailable(&self) -> MetadataRecord {
        MetadataRecord::unavailable(self.provider.fallback_poster_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::Rating;
    use crate::services::providers::MockMetadataProvider;
    use mockall::predicate::eq;

    const FALLBACK: &str = "https://via.placeholder.com/500x750?text=No+Image";

    fn record(year: &str) -> MetadataRecord {
        MetadataRecord {
            poster_url: format!("https://image.tmdb.org/t/p/w500/{}.jpg", year),
            overview: format!("Released in {}", year),
            rating: Rating::Score(7.0),
            release_year: year.to_string(),
        }
    }

    fn mock_provider() -> MockMetadataProvider {
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fallback_poster_url()
            .return_const(FALLBACK.to_string());
        provider.expect_name().return_const("mock");
        provider
    }

    #[tokio::test]
    async fn test_fetch_success_is_cached() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_details()
            .with(eq(597))
            .times(1)
            .returning(|_| Ok(record("1997")));

        let client = MetadataClient::new(Arc::new(provider));

        assert_eq!(client.fetch(597).await, record("1997"));
        assert_eq!(client.fetch(597).await, record("1997"));
    }

    #[tokio::test]
    async fn test_failure_degrades_and_is_not_cached() {
        let mut provider = mock_provider();
        provider
            .expect_fetch_details()
            .with(eq(1))
            .times(2)
            .returning(|_| Err(AppError::ExternalApi("TMDB returned status 503".to_string())));

        let client = MetadataClient::new(Arc::new(provider));

        let first = client.fetch(1).await;
        assert_eq!(first, MetadataRecord::unavailable(FALLBACK));
        assert_eq!(first.overview, "Details unavailable.");
        assert_eq!(first.rating, Rating::Unavailable);
        assert_eq!(first.release_year, "N/A");

        assert!(client.fetch(1).await.is_unavailable());
    }

    #[tokio::test]
    async fn test_fetch_many_preserves_order() {
        let mut provider = mock_provider();
        provider.expect_fetch_details().returning(|id| match id {
            2 => Err(AppError::ExternalApi("boom".to_string())),
            other => Ok(record(&other.to_string())),
        });

        let client = MetadataClient::new(Arc::new(provider));
        let records = client.fetch_many(&[3, 2, 1]).await;

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], record("3"));
        assert!(records[1].is_unavailable());
        assert_eq!(records[2], record("1"));
    }

    #[tokio::test]
    async fn test_persistent_outage_degrades_after_retries() {
        use crate::services::providers::{tmdb::TmdbSettings, TmdbProvider};
        use crate::services::retry::RetryPolicy;
        use std::time::{Duration, Instant};
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movie/1"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let provider = TmdbProvider::new(TmdbSettings {
            api_key: "test_key".to_string(),
            api_url: server.uri(),
            language: "en-US".to_string(),
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
            fallback_poster_url: FALLBACK.to_string(),
            request_timeout: Duration::from_millis(200),
            retry: RetryPolicy::new(3, Duration::from_millis(10)),
        });
        let client = MetadataClient::new(Arc::new(provider));

        let started = Instant::now();
        let record = client.fetch(1).await;
        let elapsed = started.elapsed();

        assert_eq!(record, MetadataRecord::unavailable(FALLBACK));
        // Two backoffs of 10ms and 20ms sit between the three attempts
        assert!(elapsed >= Duration::from_millis(30));
        assert!(elapsed < Duration::from_secs(2));
    }
}
