use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};

/// Durable storage for the favorites playlist
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Stored titles, or an empty list when nothing has been saved yet
    async fn load(&self) -> AppResult<Vec<String>>;

    /// Replaces the stored titles
    async fn save(&self, titles: &[String]) -> AppResult<()>;
}

/// Playlist persisted as a JSON array of titles
pub struct JsonFilePlaylistStore {
    path: PathBuf,
}

impl JsonFilePlaylistStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl PlaylistStore for JsonFilePlaylistStore {
    async fn load(&self) -> AppResult<Vec<String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::Playlist(format!(
                    "cannot read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::Playlist(format!("invalid playlist {}: {}", self.path.display(), e))
        })
    }

    async fn save(&self, titles: &[String]) -> AppResult<()> {
        let json = serde_json::to_vec(titles)
            .map_err(|e| AppError::Internal(format!("Playlist serialization error: {}", e)))?;

        // write-then-rename so a crash never leaves a truncated file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await.map_err(|e| {
            AppError::Playlist(format!("cannot write {}: {}", tmp_path.display(), e))
        })?;
        tokio::fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            AppError::Playlist(format!("cannot replace {}: {}", self.path.display(), e))
        })?;

        Ok(())
    }
}

/// Result of adding a title to the playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// The user's favorites list
///
/// Every mutation runs read-modify-persist under one lock, and the in-memory list
/// only changes once the store has accepted the new contents.
pub struct PlaylistService {
    store: Arc<dyn PlaylistStore>,
    entries: Mutex<Vec<String>>,
}

impl PlaylistService {
    /// Loads the persisted playlist once at startup
    pub async fn load(store: Arc<dyn PlaylistStore>) -> AppResult<Self> {
        let entries = store.load().await?;
        tracing::info!(entries = entries.len(), "Loaded playlist");

        Ok(Self {
            store,
            entries: Mutex::new(entries),
        })
    }

    pub async fn entries(&self) -> Vec<String> {
        self.entries.lock().await.clone()
    }

    /// Appends `title` unless it is already present; persists only on change
    pub async fn add(&self, title: &str) -> AppResult<AddOutcome> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|entry| entry == title) {
            tracing::debug!(title = %title, "Title already in playlist");
            return Ok(AddOutcome::AlreadyPresent);
        }

        let mut updated = entries.clone();
        updated.push(title.to_string());
        self.persist(&updated).await?;
        *entries = updated;

        tracing::info!(title = %title, entries = entries.len(), "Added title to playlist");
        Ok(AddOutcome::Added)
    }

    /// Removes every entry
    pub async fn clear(&self) -> AppResult<()> {
        let mut entries = self.entries.lock().await;
        self.persist(&[]).await?;
        entries.clear();

        tracing::info!("Cleared playlist");
        Ok(())
    }

    async fn persist(&self, titles: &[String]) -> AppResult<()> {
        self.store.save(titles).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to persist playlist");
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn store_with(initial: Vec<String>) -> MockPlaylistStore {
        let mut store = MockPlaylistStore::new();
        store.expect_load().times(1).return_once(move || Ok(initial));
        store
    }

    #[tokio::test]
    async fn test_load_uses_stored_entries() {
        let store = store_with(vec!["Avatar".to_string()]);
        let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();
        assert_eq!(playlist.entries().await, vec!["Avatar"]);
    }

    #[tokio::test]
    async fn test_add_is_idempotent_with_one_write() {
        let mut store = store_with(Vec::new());
        store
            .expect_save()
            .withf(|titles| titles.len() == 1 && titles[0] == "Avatar")
            .times(1)
            .returning(|_| Ok(()));

        let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();
        assert_eq!(playlist.add("Avatar").await.unwrap(), AddOutcome::Added);
        assert_eq!(
            playlist.add("Avatar").await.unwrap(),
            AddOutcome::AlreadyPresent
        );
        assert_eq!(playlist.entries().await, vec!["Avatar"]);
    }

    #[tokio::test]
    async fn test_add_preserves_order() {
        let mut store = store_with(vec!["Avatar".to_string()]);
        store.expect_save().times(2).returning(|_| Ok(()));

        let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();
        assert_ok!(playlist.add("Titanic").await);
        assert_ok!(playlist.add("Inception").await);
        assert_eq!(
            playlist.entries().await,
            vec!["Avatar", "Titanic", "Inception"]
        );
    }

    #[tokio::test]
    async fn test_failed_save_leaves_playlist_unchanged() {
        let mut store = store_with(vec!["Avatar".to_string()]);
        store
            .expect_save()
            .times(1)
            .returning(|_| Err(AppError::Playlist("disk full".to_string())));

        let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();
        assert_err!(playlist.add("Titanic").await);
        assert_eq!(playlist.entries().await, vec!["Avatar"]);
    }

    #[tokio::test]
    async fn test_clear_persists_empty_list() {
        let mut store = store_with(vec!["Avatar".to_string(), "Titanic".to_string()]);
        store
            .expect_save()
            .withf(|titles| titles.is_empty())
            .times(1)
            .returning(|_| Ok(()));

        let playlist = PlaylistService::load(Arc::new(store)).await.unwrap();
        assert_ok!(playlist.clear().await);
        assert!(playlist.entries().await.is_empty());
    }

    #[tokio::test]
    async fn test_json_store_missing_file_is_empty() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFilePlaylistStore::new(dir.path().join("playlist.json"));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = JsonFilePlaylistStore::new(dir.path().join("playlist.json"));
        let titles = vec!["Avatar".to_string(), "The Dark Knight".to_string()];

        store.save(&titles).await.unwrap();
        assert_eq!(store.load().await.unwrap(), titles);

        let on_disk = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(on_disk, r#"["Avatar","The Dark Knight"]"#);
    }

    #[tokio::test]
    async fn test_json_store_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = JsonFilePlaylistStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, AppError::Playlist(_)));
    }

    #[tokio::test]
    async fn test_service_survives_reload_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("playlist.json");

        let playlist = PlaylistService::load(Arc::new(JsonFilePlaylistStore::new(&path)))
            .await
            .unwrap();
        playlist.add("Avatar").await.unwrap();
        playlist.add("Titanic").await.unwrap();

        let reloaded = PlaylistService::load(Arc::new(JsonFilePlaylistStore::new(&path)))
            .await
            .unwrap();
        assert_eq!(reloaded.entries().await, vec!["Avatar", "Titanic"]);
    }
}
