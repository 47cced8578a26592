use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::RecipeBook,
};

/// Read-only access to the recipe dataset on disk
///
/// The file is read on every call, so edits to the dataset are visible to
/// the next request without a restart.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    path: PathBuf,
}

impl RecipeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loads and parses the dataset
    pub async fn load(&self) -> AppResult<RecipeBook> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to read recipe dataset");
            AppError::Dataset(e.to_string())
        })?;

        let book: RecipeBook = serde_json::from_str(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to parse recipe dataset");
            AppError::Dataset(e.to_string())
        })?;

        tracing::debug!(
            path = %self.path.display(),
            recipes = book.default_recipe_count(),
            "Recipe dataset loaded"
        );

        Ok(book)
    }
}
