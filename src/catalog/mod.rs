//! Precomputed catalog data: the ordered movie records and the similarity matrix
//! whose rows and columns follow the same order.

pub mod similarity;
pub mod store;

pub use similarity::SimilarityMatrix;
pub use store::Catalog;

use crate::error::{AppError, AppResult};

/// Checks that the matrix dimension matches the number of catalog rows
pub fn ensure_aligned(catalog: &Catalog, matrix: &SimilarityMatrix) -> AppResult<()> {
    if catalog.len() != matrix.dimension() {
        return Err(AppError::DataLoad(format!(
            "catalog has {} movies but similarity matrix is {}x{}",
            catalog.len(),
            matrix.dimension(),
            matrix.dimension()
        )));
    }
    Ok(())
}
