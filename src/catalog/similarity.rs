use std::path::Path;

use crate::error::{AppError, AppResult};

/// Dense N×N pairwise similarity scores, stored row-major
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    dimension: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Builds a matrix from nested rows.
    ///
    /// Rejects ragged or non-square input and non-finite scores.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> AppResult<Self> {
        let dimension = rows.len();
        let mut scores = Vec::with_capacity(dimension * dimension);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != dimension {
                return Err(AppError::DataLoad(format!(
                    "similarity row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    dimension
                )));
            }
            if let Some(j) = row.iter().position(|score| !score.is_finite()) {
                return Err(AppError::DataLoad(format!(
                    "similarity entry ({}, {}) is not a finite number",
                    i, j
                )));
            }
            scores.extend(row);
        }

        Ok(Self { dimension, scores })
    }

    /// Loads a JSON array of N arrays of N numbers
    pub async fn from_json_file(path: &Path) -> AppResult<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::DataLoad(format!(
                "cannot read similarity matrix {}: {}",
                path.display(),
                e
            ))
        })?;
        let rows: Vec<Vec<f32>> = serde_json::from_slice(&bytes).map_err(|e| {
            AppError::DataLoad(format!(
                "invalid similarity matrix {}: {}",
                path.display(),
                e
            ))
        })?;

        let matrix = Self::from_rows(rows)?;
        tracing::info!(
            path = %path.display(),
            dimension = matrix.dimension,
            "Loaded similarity matrix"
        );
        Ok(matrix)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Scores of movie `index` against every catalog movie
    ///
    /// # Panics
    /// If `index >= dimension()`.
    pub fn row(&self, index: usize) -> &[f32] {
        assert!(
            index < self.dimension,
            "row {} out of range for {}x{} matrix",
            index,
            self.dimension,
            self.dimension
        );
        let start = index * self.dimension;
        &self.scores[start..start + self.dimension]
    }
}
