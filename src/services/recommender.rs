use std::{cmp::Ordering, sync::Arc};

use tracing::instrument;

use crate::{
    catalog::{self, Catalog, SimilarityMatrix},
    error::AppResult,
    models::Recommendation,
};

/// Nearest-neighbour lookup over the precomputed similarity matrix
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    similarity: Arc<SimilarityMatrix>,
}

impl Recommender {
    /// Pairs a catalog with its similarity matrix, rejecting mismatched dimensions
    pub fn new(catalog: Arc<Catalog>, similarity: Arc<SimilarityMatrix>) -> AppResult<Self> {
        catalog::ensure_aligned(&catalog, &similarity)?;
        Ok(Self {
            catalog,
            similarity,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Returns the `k` catalog movies most similar to `title`.
    ///
    /// The queried movie is excluded by index, never by score. Scores are ranked
    /// descending and equal scores keep ascending catalog order. When the catalog
    /// holds fewer than `k + 1` movies the result is truncated to `N - 1` entries.
    ///
    /// Fails with `AppError::NotFound` if `title` is not in the catalog.
    #[instrument(skip(self), fields(catalog_size = self.catalog.len()))]
    pub fn recommend(&self, title: &str, k: usize) -> AppResult<Vec<Recommendation>> {
        let query_index = self.catalog.resolve_index(title)?;

        let mut candidates: Vec<(usize, f32)> = self
            .similarity
            .row(query_index)
            .iter()
            .copied()
            .enumerate()
            .filter(|(index, _)| *index != query_index)
            .collect();

        // stable: ties (including 0.0 vs -0.0) stay in ascending index order.
        // Scores are finite, checked at load.
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        candidates.truncate(k);

        let recommendations: Vec<Recommendation> = candidates
            .into_iter()
            .map(|(index, score)| {
                let record = self.catalog.record_at(index);
                Recommendation {
                    title: record.title.clone(),
                    movie_id: record.id,
                    score,
                }
            })
            .collect();

        tracing::debug!(
            query_index,
            requested = k,
            returned = recommendations.len(),
            "Recommendations computed"
        );

        Ok(recommendations)
    }
}
