//! Catalog queries against the `movies`, `mangas` and `chapters` tables.

use async_trait::async_trait;

use super::CatalogRepository;
use crate::{
    db::DbPool,
    error::AppError,
    models::{
        manga::{self, Chapter, Manga, MangaResponse},
        movie::{Movie, MovieFilter, MovieLookup},
    },
};

/// Escape `LIKE` wildcards so the search term matches literally.
///
/// Backslash is the default `LIKE` escape character in PostgreSQL.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[derive(Debug, Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogRepository for PgCatalog {
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, AppError> {
        let movies = match filter.lookup() {
            MovieLookup::ById(id) => {
                sqlx::query_as::<_, Movie>(
                    "SELECT id, title, year, rating, cover, link, synopsis FROM movies WHERE id = $1",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            MovieLookup::NoMatch => Vec::new(),
            MovieLookup::Title(q) => {
                sqlx::query_as::<_, Movie>(
                    r#"
                    SELECT id, title, year, rating, cover, link, synopsis
                    FROM movies
                    WHERE title ILIKE $1
                    ORDER BY id
                    "#,
                )
                .bind(format!("%{}%", escape_like(q)))
                .fetch_all(&self.pool)
                .await?
            }
            MovieLookup::All => {
                sqlx::query_as::<_, Movie>(
                    "SELECT id, title, year, rating, cover, link, synopsis FROM movies ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(movies)
    }

    async fn list_mangas(&self) -> Result<Vec<MangaResponse>, AppError> {
        let mangas = sqlx::query_as::<_, Manga>(
            r#"
            SELECT id, title, rating, year, cover, link, genres, synopsis
            FROM mangas
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        // One query for all chapters instead of one per manga
        let chapters = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, manga_id, title, link, release_date, images
            FROM chapters
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(manga::assemble(mangas, chapters))
    }
}
