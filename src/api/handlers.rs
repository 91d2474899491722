use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::{MovieDetails, NowPlaying, RecommendedMovie},
    services::AddOutcome,
};

use super::AppState;

/// Larger `k` values are clamped to this, since every recommendation costs a poster lookup
pub const MAX_RECOMMENDATIONS: usize = 50;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub k: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct AddToPlaylistRequest {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub titles: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddToPlaylistResponse {
    pub added: bool,
    pub titles: Vec<String>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// All catalog titles, in catalog order, for the selection list
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .catalog()
            .all_titles()
            .into_iter()
            .map(str::to_string)
            .collect(),
    )
}

/// Poster, summary, rating, credits and trailer for one catalog movie
pub async fn movie_details(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<TitleQuery>,
) -> AppResult<Json<MovieDetails>> {
    let record = state.catalog().find(&params.title)?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %record.id,
        provider = state.metadata.name(),
        "Fetching movie details"
    );

    let details = state.metadata.fetch_details(record.id, &record.title).await;
    Ok(Json(details))
}

/// Movies most similar to `title`, each with its poster
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendedMovie>>> {
    let k = params
        .k
        .unwrap_or(state.default_recommendations)
        .min(MAX_RECOMMENDATIONS);

    let recommendations = state.recommender.recommend(&params.title, k)?;

    let mut movies = Vec::with_capacity(recommendations.len());
    for rec in recommendations {
        let poster_url = state.metadata.fetch_poster(rec.movie_id).await;
        movies.push(RecommendedMovie {
            title: rec.title,
            movie_id: rec.movie_id,
            score: rec.score,
            poster_url,
        });
    }

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        k,
        returned = movies.len(),
        "Recommendations served"
    );

    Ok(Json(movies))
}

/// Recently released movies
pub async fn now_playing(State(state): State<AppState>) -> Json<Vec<NowPlaying>> {
    Json(state.metadata.fetch_now_playing().await)
}

/// Current favorites
pub async fn get_playlist(State(state): State<AppState>) -> Json<PlaylistResponse> {
    Json(PlaylistResponse {
        titles: state.playlist.entries().await,
    })
}

/// Adds a catalog title to the favorites
///
/// Returns 201 when the title was added and 200 when it was already present.
pub async fn add_to_playlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<AddToPlaylistRequest>,
) -> AppResult<(StatusCode, Json<AddToPlaylistResponse>)> {
    let record = state.catalog().find(&request.title)?;
    let outcome = state.playlist.add(&record.title).await?;

    tracing::info!(
        request_id = %request_id,
        title = %record.title,
        outcome = ?outcome,
        "Playlist add"
    );

    let status = match outcome {
        AddOutcome::Added => StatusCode::CREATED,
        AddOutcome::AlreadyPresent => StatusCode::OK,
    };

    Ok((
        status,
        Json(AddToPlaylistResponse {
            added: outcome == AddOutcome::Added,
            titles: state.playlist.entries().await,
        }),
    ))
}

/// Removes every favorite
pub async fn clear_playlist(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> AppResult<StatusCode> {
    state.playlist.clear().await?;
    tracing::info!(request_id = %request_id, "Playlist cleared");
    Ok(StatusCode::NO_CONTENT)
}
