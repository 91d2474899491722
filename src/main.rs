use std::{sync::Arc, time::Duration};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use marquee_api::{
    api::{create_router, AppState},
    cache::{create_redis_client, Cache},
    catalog::{Catalog, SimilarityMatrix},
    config::Config,
    services::{JsonFilePlaylistStore, PlaylistService, Recommender, TmdbProvider},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("marquee_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Precomputed data is loaded once and stays read-only
    let catalog = Catalog::from_json_file(&config.catalog_path)
        .await
        .context("loading movie catalog")?;
    let similarity = SimilarityMatrix::from_json_file(&config.similarity_path)
        .await
        .context("loading similarity matrix")?;
    let recommender = Recommender::new(Arc::new(catalog), Arc::new(similarity))?;

    let (cache, cache_writer) = match &config.redis_url {
        Some(url) => {
            let (cache, handle) = Cache::new(create_redis_client(url)?);
            tracing::info!(redis_url = %url, "Metadata caching enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, metadata caching disabled");
            (None, None)
        }
    };

    let metadata = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        config.tmdb_image_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
        cache,
    )?;

    let playlist =
        PlaylistService::load(Arc::new(JsonFilePlaylistStore::new(&config.playlist_path)))
            .await
            .context("loading playlist")?;

    let state = AppState::new(
        recommender,
        Arc::new(metadata),
        Arc::new(playlist),
        config.recommendation_count,
    );
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_writer {
        handle.shutdown().await;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
