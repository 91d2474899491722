use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies", get(handlers::list_movies))
        .route("/movies/details", get(handlers::movie_details))
        // Recommendations
        .route("/recommendations", get(handlers::recommend))
        .route("/now-playing", get(handlers::now_playing))
        // Playlist
        .route(
            "/playlist",
            get(handlers::get_playlist)
                .post(handlers::add_to_playlist)
                .delete(handlers::clear_playlist),
        )
}
