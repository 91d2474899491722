use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// TMDb identifier of a catalog movie
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub u64);

impl Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the precomputed catalog
///
/// Only `id` and `title` are read by the recommender; every other column of the
/// catalog artifact is carried along untouched in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    pub id: MovieId,
    pub title: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MovieRecord {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id: MovieId(id),
            title: title.into(),
            extra: serde_json::Map::new(),
        }
    }
}

/// A similar movie returned by the recommender
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub title: String,
    pub movie_id: MovieId,
    pub score: f32,
}

/// A recommendation with its poster attached, as served to clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendedMovie {
    pub title: String,
    pub movie_id: MovieId,
    pub score: f32,
    pub poster_url: String,
}

/// Top-billed cast and directors of a movie
///
/// Both lists are empty when the credits could not be fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CastAndCrew {
    pub cast: Vec<String>,
    pub directors: Vec<String>,
}

/// Everything shown for the currently selected movie
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub movie_id: MovieId,
    pub title: String,
    pub poster_url: String,
    pub summary: String,
    /// `None` when the rating is unknown
    pub rating: Option<f64>,
    pub cast: Vec<String>,
    pub directors: Vec<String>,
    pub trailer_url: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

/// A movie currently in theaters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NowPlaying {
    pub title: String,
    pub poster_url: String,
}

// ============================================================================
// TMDb API Types
// ============================================================================

/// Subset of `GET /movie/{id}` used for poster, summary and rating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

/// `GET /movie/{id}/credits`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCredits {
    pub cast: Vec<TmdbCastMember>,
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCastMember {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    pub job: String,
}

/// `GET /movie/{id}/videos`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbVideos {
    pub results: Vec<TmdbVideo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbVideo {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

/// `GET /movie/now_playing`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbMovieList {
    pub results: Vec<TmdbMovie>,
}
