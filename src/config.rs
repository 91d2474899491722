use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// JSON catalog of movie records, in similarity-matrix row order
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// JSON N×N similarity matrix
    #[serde(default = "default_similarity_path")]
    pub similarity_path: PathBuf,

    /// Where the favorites playlist is persisted
    #[serde(default = "default_playlist_path")]
    pub playlist_path: PathBuf,

    /// TMDb API key
    pub tmdb_api_key: String,

    /// TMDb API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for poster paths returned by TMDb
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Redis connection URL; metadata responses are not cached when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Timeout applied to every metadata request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of recommendations returned when the client does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/movies.json")
}

fn default_similarity_path() -> PathBuf {
    PathBuf::from("data/similarity.json")
}

fn default_playlist_path() -> PathBuf {
    PathBuf::from("playlist.json")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_recommendation_count() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
