//! Read-only access to the movie and manga catalog.

mod memory;
mod postgres;

pub use memory::InMemoryCatalog;
pub use postgres::PgCatalog;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        manga::MangaResponse,
        movie::{Movie, MovieFilter},
    },
};

/// Source of catalog data served behind the API key guard.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Movies matching `filter`, ordered by id.
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, AppError>;

    /// Every manga with its chapters, both ordered by id.
    async fn list_mangas(&self) -> Result<Vec<MangaResponse>, AppError>;
}
