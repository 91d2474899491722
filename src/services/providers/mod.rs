/// Movie metadata provider abstraction
///
/// Enrichment is best effort: every call returns a usable value, degrading to the
/// sentinel documented on each method when the remote API cannot answer. A provider
/// never makes a recommendation or playlist request fail.
use chrono::Utc;

use crate::models::{CastAndCrew, MovieDetails, MovieId, NowPlaying};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Poster shown when no real poster can be found
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Image";
/// Summary used when the movie has no overview
pub const NO_SUMMARY: &str = "No summary available.";
/// Summary used when the overview could not be fetched at all
pub const SUMMARY_ERROR: &str = "Error fetching summary.";
/// How many now-playing movies are returned
pub const NOW_PLAYING_LIMIT: usize = 5;
/// How many cast members are listed per movie
pub const TOP_CAST_LIMIT: usize = 3;

#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Poster URL, or `PLACEHOLDER_POSTER_URL`
    async fn fetch_poster(&self, id: MovieId) -> String;

    /// Overview text; `NO_SUMMARY` when the movie has none, `SUMMARY_ERROR` on failure
    async fn fetch_summary(&self, id: MovieId) -> String;

    /// Top cast and directors; both lists empty on failure
    async fn fetch_cast_and_crew(&self, id: MovieId) -> CastAndCrew;

    /// Average vote; `None` when unknown
    async fn fetch_rating(&self, id: MovieId) -> Option<f64>;

    /// YouTube trailer URL; `None` when there is no trailer or on failure
    async fn fetch_trailer_url(&self, id: MovieId) -> Option<String>;

    /// Movies currently in theaters, at most `NOW_PLAYING_LIMIT`; empty on failure
    async fn fetch_now_playing(&self) -> Vec<NowPlaying>;

    /// Full detail view of a catalog movie
    async fn fetch_details(&self, id: MovieId, title: &str) -> MovieDetails {
        let CastAndCrew { cast, directors } = self.fetch_cast_and_crew(id).await;

        MovieDetails {
            movie_id: id,
            title: title.to_string(),
            poster_url: self.fetch_poster(id).await,
            summary: self.fetch_summary(id).await,
            rating: self.fetch_rating(id).await,
            cast,
            directors,
            trailer_url: self.fetch_trailer_url(id).await,
            fetched_at: Utc::now(),
        }
    }

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
