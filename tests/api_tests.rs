use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use marquee_api::{
    api::{create_router, AppState},
    catalog::{Catalog, SimilarityMatrix},
    models::{CastAndCrew, MovieDetails, MovieId, MovieRecord, NowPlaying, RecommendedMovie},
    services::{JsonFilePlaylistStore, MetadataProvider, PlaylistService, Recommender},
};

/// Metadata provider answering from fixed data, no network
struct StubMetadata;

#[async_trait::async_trait]
impl MetadataProvider for StubMetadata {
    async fn fetch_poster(&self, id: MovieId) -> String {
        format!("https://posters.test/{}.jpg", id)
    }

    async fn fetch_summary(&self, id: MovieId) -> String {
        format!("Summary of {}", id)
    }

    async fn fetch_cast_and_crew(&self, _id: MovieId) -> CastAndCrew {
        CastAndCrew {
            cast: vec!["Lead Actor".to_string()],
            directors: vec!["Some Director".to_string()],
        }
    }

    async fn fetch_rating(&self, _id: MovieId) -> Option<f64> {
        Some(7.5)
    }

    async fn fetch_trailer_url(&self, _id: MovieId) -> Option<String> {
        None
    }

    async fn fetch_now_playing(&self) -> Vec<NowPlaying> {
        vec![NowPlaying {
            title: "Fresh Release".to_string(),
            poster_url: "https://posters.test/fresh.jpg".to_string(),
        }]
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct TestApp {
    server: TestServer,
    playlist_dir: TempDir,
}

async fn create_test_app() -> TestApp {
    let catalog = Catalog::from_records(vec![
        MovieRecord::new(1, "A"),
        MovieRecord::new(2, "B"),
        MovieRecord::new(3, "C"),
        MovieRecord::new(4, "D"),
    ]);
    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.2, 0.3, 0.3],
        vec![0.2, 1.0, 0.9, 0.5],
        vec![0.3, 0.9, 1.0, 0.1],
        vec![0.3, 0.5, 0.1, 1.0],
    ])
    .unwrap();
    let recommender = Recommender::new(Arc::new(catalog), Arc::new(similarity)).unwrap();

    let playlist_dir = TempDir::new().unwrap();
    let store = JsonFilePlaylistStore::new(playlist_dir.path().join("playlist.json"));
    let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();

    let state = AppState::new(recommender, Arc::new(StubMetadata), Arc::new(playlist), 5);
    let server = TestServer::new(create_router(state)).unwrap();

    TestApp {
        server,
        playlist_dir,
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy" }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app().await;
    let response = app.server.get("/health").await;
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_list_movies_in_catalog_order() {
    let app = create_test_app().await;
    let response = app.server.get("/api/v1/movies").await;
    response.assert_status_ok();
    response.assert_json(&json!(["A", "B", "C", "D"]));
}

#[tokio::test]
async fn test_recommendations_ranked_with_posters() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/recommendations")
        .add_query_param("title", "B")
        .add_query_param("k", 2)
        .await;
    response.assert_status_ok();

    let movies: Vec<RecommendedMovie> = response.json();
    let summary: Vec<(&str, MovieId)> = movies
        .iter()
        .map(|m| (m.title.as_str(), m.movie_id))
        .collect();
    assert_eq!(summary, vec![("C", MovieId(3)), ("D", MovieId(4))]);
    assert_eq!(movies[0].poster_url, "https://posters.test/3.jpg");
}

#[tokio::test]
async fn test_recommendations_default_k_truncates() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/recommendations")
        .add_query_param("title", "B")
        .await;
    response.assert_status_ok();

    let movies: Vec<RecommendedMovie> = response.json();
    assert_eq!(movies.len(), 3);
    assert!(movies.iter().all(|m| m.title != "B"));
}

#[tokio::test]
async fn test_recommendations_unknown_title() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/recommendations")
        .add_query_param("title", "Z")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Z"));
}

#[tokio::test]
async fn test_recommendations_huge_k_is_truncated() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/recommendations")
        .add_query_param("title", "B")
        .add_query_param("k", 1000)
        .await;
    response.assert_status_ok();

    let movies: Vec<RecommendedMovie> = response.json();
    let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "D", "A"]);
}

#[tokio::test]
async fn test_movie_details() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/movies/details")
        .add_query_param("title", "C")
        .await;
    response.assert_status_ok();

    let details: MovieDetails = response.json();
    assert_eq!(details.movie_id, MovieId(3));
    assert_eq!(details.title, "C");
    assert_eq!(details.summary, "Summary of 3");
    assert_eq!(details.rating, Some(7.5));
    assert_eq!(details.directors, vec!["Some Director"]);
    assert_eq!(details.trailer_url, None);
}

#[tokio::test]
async fn test_movie_details_unknown_title() {
    let app = create_test_app().await;
    let response = app
        .server
        .get("/api/v1/movies/details")
        .add_query_param("title", "Nope")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_now_playing() {
    let app = create_test_app().await;
    let response = app.server.get("/api/v1/now-playing").await;
    response.assert_status_ok();

    let movies: Vec<NowPlaying> = response.json();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "Fresh Release");
}

#[tokio::test]
async fn test_playlist_add_is_idempotent_and_persisted() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/api/v1/playlist")
        .json(&json!({ "title": "C" }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let response = app
        .server
        .post("/api/v1/playlist")
        .json(&json!({ "title": "C" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["added"], false);
    assert_eq!(body["titles"], json!(["C"]));

    let on_disk =
        std::fs::read_to_string(app.playlist_dir.path().join("playlist.json")).unwrap();
    assert_eq!(on_disk, r#"["C"]"#);

    let response = app.server.get("/api/v1/playlist").await;
    response.assert_json(&json!({ "titles": ["C"] }));
}

#[tokio::test]
async fn test_playlist_rejects_unknown_title() {
    let app = create_test_app().await;
    let response = app
        .server
        .post("/api/v1/playlist")
        .json(&json!({ "title": "Not A Movie" }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let response = app.server.get("/api/v1/playlist").await;
    response.assert_json(&json!({ "titles": [] }));
}

#[tokio::test]
async fn test_playlist_clear() {
    let app = create_test_app().await;
    app.server
        .post("/api/v1/playlist")
        .json(&json!({ "title": "A" }))
        .await;
    app.server
        .post("/api/v1/playlist")
        .json(&json!({ "title": "D" }))
        .await;

    let response = app.server.delete("/api/v1/playlist").await;
    response.assert_status(StatusCode::NO_CONTENT);

    let response = app.server.get("/api/v1/playlist").await;
    response.assert_json(&json!({ "titles": [] }));

    let on_disk =
        std::fs::read_to_string(app.playlist_dir.path().join("playlist.json")).unwrap();
    assert_eq!(on_disk, "[]");
}
