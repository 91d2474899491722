use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::MovieRecord,
};

/// Ordered, read-only collection of catalog movies
///
/// A record's position is its row and column in the similarity matrix, so the
/// catalog is never mutated after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<MovieRecord>,
}

impl Catalog {
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        Self { records }
    }

    /// Loads the catalog from a JSON array of records
    pub async fn from_json_file(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::DataLoad(format!("cannot read catalog {}: {}", path.display(), e))
        })?;
        let records: Vec<MovieRecord> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::DataLoad(format!("invalid catalog {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            movies = records.len(),
            "Loaded movie catalog"
        );

        Ok(Self::from_records(records))
    }

    /// Position of the first movie whose title equals `title`
    pub fn resolve_index(&self, title: &str) -> AppResult<usize> {
        self.records
            .iter()
            .position(|record| record.title == title)
            .ok_or_else(|| AppError::NotFound(format!("Movie '{}' is not in the catalog", title)))
    }

    /// Record at `index`.
    ///
    /// # Panics
    /// If `index` is out of range. Indices come from `resolve_index` or from the
    /// similarity matrix, so an out-of-range index is a bug.
    pub fn record_at(&self, index: usize) -> &MovieRecord {
        &self.records[index]
    }

    pub fn all_titles(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.title.as_str()).collect()
    }

    /// Convenience lookup combining `resolve_index` and `record_at`
    pub fn find(&self, title: &str) -> AppResult<&MovieRecord> {
        self.resolve_index(title).map(|index| self.record_at(index))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
