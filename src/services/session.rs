use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::EnrichedResult,
    services::{MetadataClient, Recommender},
};

/// Where a session sits in the browse flow
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No query submitted yet
    Idle,
    /// A result list is held
    ResultsShown,
    /// A result list is held and one entry is expanded
    DetailShown,
}

/// Per-session interaction state
///
/// The expanded selection is stored as a rank into the current result list, so it
/// can never point at a record outside that list. `generation` counts accepted
/// queries; only the most recently accepted one may install its results.
#[derive(Debug, Clone)]
pub struct SessionState {
    query: Option<String>,
    results: Option<Vec<EnrichedResult>>,
    expanded: Option<usize>,
    generation: u64,
    updated_at: DateTime<Utc>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            query: None,
            results: None,
            expanded: None,
            generation: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        match (&self.results, self.expanded) {
            (None, _) => SessionPhase::Idle,
            (Some(_), None) => SessionPhase::ResultsShown,
            (Some(_), Some(_)) => SessionPhase::DetailShown,
        }
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn results(&self) -> Option<&[EnrichedResult]> {
        self.results.as_deref()
    }

    pub fn expanded(&self) -> Option<&EnrichedResult> {
        let rank = self.expanded?;
        self.results.as_ref()?.get(rank)
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// True when the session has not changed for longer than `ttl`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        match (now - self.updated_at).to_std() {
            Ok(idle) => idle > ttl,
            Err(_) => false,
        }
    }

    /// Accepts a new query and returns its generation
    ///
    /// Results resolved for any earlier generation are discarded on completion.
    pub fn begin_query(&mut self) -> u64 {
        self.generation += 1;
        self.touch();
        self.generation
    }

    /// Installs results for `generation` if no newer query was accepted since
    ///
    /// Returns false, leaving the state untouched, when the results are stale.
    pub fn complete_query(
        &mut self,
        generation: u64,
        query: impl Into<String>,
        results: Vec<EnrichedResult>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.replace_results(query, results);
        true
    }

    /// Replaces the result list wholesale and clears any expanded selection
    pub fn replace_results(&mut self, query: impl Into<String>, results: Vec<EnrichedResult>) {
        self.query = Some(query.into());
        self.results = Some(results);
        self.expanded = None;
        self.touch();
    }

    /// Expands the result at `rank` (0-based); the result list is untouched
    pub fn show_detail(&mut self, rank: usize) -> AppResult<&EnrichedResult> {
        let len = match &self.results {
            Some(results) => results.len(),
            None => {
                return Err(AppError::InvalidInput(
                    "No results to expand; submit a query first".to_string(),
                ))
            }
        };

        if rank >= len {
            return Err(AppError::InvalidInput(format!(
                "Result rank {} out of range (have {} results)",
                rank, len
            )));
        }

        self.expanded = Some(rank);
        self.touch();

        self.expanded()
            .ok_or_else(|| AppError::Internal("expanded result vanished".to_string()))
    }

    /// Collapses the detail view; a no-op when nothing is expanded
    pub fn close_detail(&mut self) {
        if self.expanded.take().is_some() {
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Drives one query from title to enriched results
#[derive(Clone)]
pub struct SessionController {
    recommender: Arc<Recommender>,
    metadata: MetadataClient,
    recommendation_count: usize,
}

impl SessionController {
    pub fn new(recommender: Arc<Recommender>, metadata: MetadataClient, recommendation_count: usize) -> Self {
        Self {
            recommender,
            metadata,
            recommendation_count,
        }
    }

    pub fn recommender(&self) -> &Recommender {
        &self.recommender
    }

    /// Ranks similar items and enriches each with metadata, in rank order
    #[instrument(skip(self))]
    pub async fn resolve(&self, query_title: &str) -> Vec<EnrichedResult> {
        let recommendations = self
            .recommender
            .recommend(query_title, self.recommendation_count);

        if recommendations.is_empty() {
            tracing::info!(query = %query_title, "No recommendations for query");
            return Vec::new();
        }

        let ids: Vec<i64> = recommendations.iter().map(|r| r.id).collect();
        let records = self.metadata.fetch_many(&ids).await;

        let results: Vec<EnrichedResult> = recommendations
            .into_iter()
            .zip(records)
            .map(|(recommendation, metadata)| EnrichedResult::new(recommendation, metadata))
            .collect();

        tracing::info!(
            query = %query_title,
            results = results.len(),
            degraded = results.iter().filter(|r| r.metadata.is_unavailable()).count(),
            "Recommendations resolved"
        );

        results
    }

    /// Submits a query title: resolves it and replaces the session's results
    pub async fn submit_query(&self, state: &mut SessionState, query_title: &str) {
        let generation = state.begin_query();
        let results = self.resolve(query_title).await;
        state.complete_query(generation, query_title, results);
    }
}
