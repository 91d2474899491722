/// The Movie Database (TMDb) v3 metadata provider
///
/// API Flow:
/// 1. Poster, summary, rating: /movie/{id}
/// 2. Cast and directors: /movie/{id}/credits
/// 3. Trailer: /movie/{id}/videos
/// 4. Now playing: /movie/now_playing
///
/// Each public call is backed by a fallible `try_*` method. Failures are classified
/// as `EnrichmentError` and converted to that call's sentinel in one place, `degrade`.
use std::time::Duration;

use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::{AppResult, EnrichmentError},
    models::{
        CastAndCrew, MovieDetails, MovieId, NowPlaying, TmdbCredits, TmdbMovie, TmdbMovieList,
        TmdbVideos,
    },
    services::providers::{
        MetadataProvider, NOW_PLAYING_LIMIT, NO_SUMMARY, PLACEHOLDER_POSTER_URL, SUMMARY_ERROR,
        TOP_CAST_LIMIT,
    },
};

const MOVIE_CACHE_TTL: u64 = 86400; // 1 day
const NOW_PLAYING_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_url: String,
    cache: Option<Cache>,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
        cache: Option<Cache>,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url,
            cache,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, EnrichmentError> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EnrichmentError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(
                path = %path,
                error = %e,
                response = %body,
                "Undecodable TMDb response"
            );
            EnrichmentError::from(e)
        })
    }

    async fn try_movie(&self, id: MovieId) -> Result<TmdbMovie, EnrichmentError> {
        let path = format!("/movie/{}", id);
        cached!(
            &self.cache,
            CacheKey::Movie(id),
            MOVIE_CACHE_TTL,
            self.get_json::<TmdbMovie>(&path, &[])
        )
    }

    fn poster_url_of(&self, poster_path: Option<&str>) -> Result<String, EnrichmentError> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_url, p))
            .ok_or(EnrichmentError::MissingField("poster_path"))
    }

    fn summary_of(movie: &TmdbMovie) -> Result<String, EnrichmentError> {
        movie
            .overview
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .ok_or(EnrichmentError::MissingField("overview"))
    }

    fn rating_of(movie: &TmdbMovie) -> Result<f64, EnrichmentError> {
        movie
            .vote_average
            .ok_or(EnrichmentError::MissingField("vote_average"))
    }

    pub async fn try_poster(&self, id: MovieId) -> Result<String, EnrichmentError> {
        let movie = self.try_movie(id).await?;
        self.poster_url_of(movie.poster_path.as_deref())
    }

    pub async fn try_summary(&self, id: MovieId) -> Result<String, EnrichmentError> {
        Self::summary_of(&self.try_movie(id).await?)
    }

    pub async fn try_rating(&self, id: MovieId) -> Result<f64, EnrichmentError> {
        Self::rating_of(&self.try_movie(id).await?)
    }

    pub async fn try_cast_and_crew(&self, id: MovieId) -> Result<CastAndCrew, EnrichmentError> {
        let path = format!("/movie/{}/credits", id);
        let credits: TmdbCredits = cached!(
            &self.cache,
            CacheKey::Credits(id),
            MOVIE_CACHE_TTL,
            self.get_json::<TmdbCredits>(&path, &[])
        )?;

        Ok(CastAndCrew {
            cast: credits
                .cast
                .into_iter()
                .take(TOP_CAST_LIMIT)
                .map(|member| member.name)
                .collect(),
            directors: credits
                .crew
                .into_iter()
                .filter(|member| member.job == "Director")
                .map(|member| member.name)
                .collect(),
        })
    }

    /// `Ok(None)` means the lookup worked but no YouTube trailer exists
    pub async fn try_trailer_url(&self, id: MovieId) -> Result<Option<String>, EnrichmentError> {
        let path = format!("/movie/{}/videos", id);
        let videos: TmdbVideos = cached!(
            &self.cache,
            CacheKey::Videos(id),
            MOVIE_CACHE_TTL,
            self.get_json::<TmdbVideos>(&path, &[])
        )?;

        Ok(videos
            .results
            .into_iter()
            .find(|video| video.site == "YouTube" && video.video_type == "Trailer")
            .map(|video| format!("https://www.youtube.com/watch?v={}", video.key)))
    }

    pub async fn try_now_playing(&self) -> Result<Vec<NowPlaying>, EnrichmentError> {
        let list: TmdbMovieList = cached!(
            &self.cache,
            CacheKey::NowPlaying,
            NOW_PLAYING_CACHE_TTL,
            self.get_json::<TmdbMovieList>(
                "/movie/now_playing",
                &[("language", "en-US"), ("page", "1")]
            )
        )?;

        Ok(list
            .results
            .into_iter()
            .take(NOW_PLAYING_LIMIT)
            .filter_map(|movie| {
                let poster_url = self
                    .poster_url_of(movie.poster_path.as_deref())
                    .unwrap_or_else(|_| PLACEHOLDER_POSTER_URL.to_string());
                movie.title.map(|title| NowPlaying { title, poster_url })
            })
            .collect())
    }
}

/// Applies a call's sentinel to a failed lookup, logging the failure category
fn degrade<T>(
    call: &'static str,
    result: Result<T, EnrichmentError>,
    sentinel: impl FnOnce(&EnrichmentError) -> T,
) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(
            call,
            category = e.category(),
            error = %e,
            provider = "tmdb",
            "Metadata lookup failed, using fallback"
        );
        sentinel(&e)
    })
}

fn poster_sentinel(_: &EnrichmentError) -> String {
    PLACEHOLDER_POSTER_URL.to_string()
}

/// A movie without an overview is not an error to the reader; anything else is
fn summary_sentinel(e: &EnrichmentError) -> String {
    match e {
        EnrichmentError::MissingField(_) => NO_SUMMARY.to_string(),
        _ => SUMMARY_ERROR.to_string(),
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_poster(&self, id: MovieId) -> String {
        degrade("poster", self.try_poster(id).await, poster_sentinel)
    }

    async fn fetch_summary(&self, id: MovieId) -> String {
        degrade("summary", self.try_summary(id).await, summary_sentinel)
    }

    async fn fetch_cast_and_crew(&self, id: MovieId) -> CastAndCrew {
        degrade("cast_and_crew", self.try_cast_and_crew(id).await, |_| {
            CastAndCrew::default()
        })
    }

    async fn fetch_rating(&self, id: MovieId) -> Option<f64> {
        degrade("rating", self.try_rating(id).await.map(Some), |_| None)
    }

    async fn fetch_trailer_url(&self, id: MovieId) -> Option<String> {
        degrade("trailer", self.try_trailer_url(id).await, |_| None)
    }

    async fn fetch_now_playing(&self) -> Vec<NowPlaying> {
        let movies = degrade("now_playing", self.try_now_playing().await, |_| Vec::new());
        tracing::info!(results = movies.len(), provider = "tmdb", "Now playing fetched");
        movies
    }

    /// Fetches `/movie/{id}` once and derives poster, summary and rating from it
    async fn fetch_details(&self, id: MovieId, title: &str) -> MovieDetails {
        let movie = self.try_movie(id).await;

        let poster_url = degrade(
            "poster",
            movie
                .clone()
                .and_then(|m| self.poster_url_of(m.poster_path.as_deref())),
            poster_sentinel,
        );
        let summary = degrade(
            "summary",
            movie.clone().and_then(|m| Self::summary_of(&m)),
            summary_sentinel,
        );
        let rating = degrade(
            "rating",
            movie.and_then(|m| Self::rating_of(&m)).map(Some),
            |_| None,
        );
        let CastAndCrew { cast, directors } = self.fetch_cast_and_crew(id).await;
        let trailer_url = self.fetch_trailer_url(id).await;

        tracing::info!(movie_id = %id, provider = "tmdb", "Movie details fetched");

        MovieDetails {
            movie_id: id,
            title: title.to_string(),
            poster_url,
            summary,
            rating,
            cast,
            directors,
            trailer_url,
            fetched_at: Utc::now(),
        }
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
