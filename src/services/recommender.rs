use std::sync::Arc;

use tracing::instrument;

use crate::data::DataContext;
use crate::models::Recommendation;

/// Ranks catalog items by precomputed similarity to a query title
pub struct Recommender {
    data: Arc<DataContext>,
}

impl Recommender {
    pub fn new(data: Arc<DataContext>) -> Self {
        Self { data }
    }

    pub fn data(&self) -> &DataContext {
        &self.data
    }

    /// Returns up to `k` items most similar to `query_title`, highest first
    ///
    /// The query item itself is excluded by position, not by assuming it ranks first.
    /// Equal scores keep catalog order. A title missing from the catalog yields an
    /// empty list rather than an error.
    #[instrument(skip(self))]
    pub fn recommend(&self, query_title: &str, k: usize) -> Vec<Recommendation> {
        let catalog = &self.data.catalog;

        let Some(position) = catalog.position_of(query_title) else {
            tracing::debug!(query = %query_title, "Query title not in catalog");
            return Vec::new();
        };

        let Some(row) = self.data.similarity.row(position) else {
            tracing::warn!(position, "No similarity row for catalog position");
            return Vec::new();
        };

        let mut ranked: Vec<(usize, f64)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|(candidate, _)| *candidate != position)
            .map(|(candidate, score)| (candidate, if score.is_nan() { f64::NEG_INFINITY } else { score }))
            .collect();

        // sort_by is stable, so ties stay in catalog order
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        ranked
            .into_iter()
            .filter_map(|(candidate, score)| {
                catalog
                    .get(candidate)
                    .map(|item| Recommendation::new(item, score))
            })
            .take(k)
            .collect()
    }
}
