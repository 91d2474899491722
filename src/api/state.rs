use std::sync::Arc;

use crate::{
    catalog::Catalog,
    services::{MetadataProvider, PlaylistService, Recommender},
};

/// Shared application state
///
/// Catalog and similarity data are immutable after startup; the playlist is the
/// only mutable state and guards itself.
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub metadata: Arc<dyn MetadataProvider>,
    pub playlist: Arc<PlaylistService>,
    /// Recommendations returned when a request gives no `k`
    pub default_recommendations: usize,
}

impl AppState {
    pub fn new(
        recommender: Recommender,
        metadata: Arc<dyn MetadataProvider>,
        playlist: Arc<PlaylistService>,
        default_recommendations: usize,
    ) -> Self {
        Self {
            recommender,
            metadata,
            playlist,
            default_recommendations,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        self.recommender.catalog()
    }
}
