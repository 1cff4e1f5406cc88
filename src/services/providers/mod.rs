/// Movie metadata provider abstraction
///
/// A provider performs the raw lookup for one item and reports failures as errors.
/// Degradation to sentinel values and caching live one layer up, in the metadata client.
use crate::{error::AppResult, models::MetadataRecord};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch descriptive fields for a movie id
    ///
    /// Fields missing from an otherwise successful response are filled with typed
    /// defaults; only a failed lookup returns an error.
    async fn fetch_details(&self, item_id: i64) -> AppResult<MetadataRecord>;

    /// Placeholder image used when no poster can be shown
    fn fallback_poster_url(&self) -> String;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
