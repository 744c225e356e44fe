//! Catalog held in memory, for running without a database and for tests.

use async_trait::async_trait;

use super::CatalogRepository;
use crate::{
    error::AppError,
    models::{
        manga::{self, Chapter, Manga, MangaResponse},
        movie::{Movie, MovieFilter},
    },
};

#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    movies: Vec<Movie>,
    mangas: Vec<Manga>,
    chapters: Vec<Chapter>,
}

impl InMemoryCatalog {
    pub fn new(movies: Vec<Movie>, mangas: Vec<Manga>, chapters: Vec<Chapter>) -> Self {
        Self {
            movies,
            mangas,
            chapters,
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalog {
    async fn list_movies(&self, filter: &MovieFilter) -> Result<Vec<Movie>, AppError> {
        let mut movies: Vec<Movie> = self
            .movies
            .iter()
            .filter(|movie| filter.matches(movie))
            .cloned()
            .collect();
        movies.sort_by_key(|movie| movie.id);
        Ok(movies)
    }

    async fn list_mangas(&self) -> Result<Vec<MangaResponse>, AppError> {
        let mut mangas = self.mangas.clone();
        mangas.sort_by_key(|m| m.id);
        let mut chapters = self.chapters.clone();
        chapters.sort_by_key(|c| c.id);
        Ok(manga::assemble(mangas, chapters))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            year: None,
            rating: None,
            cover: None,
            link: None,
            synopsis: None,
        }
    }

    fn catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(
            vec![movie(2, "The Matrix"), movie(1, "Alien"), movie(3, "Matrix Reloaded")],
            Vec::new(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn lists_all_movies_by_id_without_filter() {
        let movies = catalog().list_movies(&MovieFilter::default()).await.unwrap();
        assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn title_search_is_case_insensitive() {
        let filter = MovieFilter::by_title("matrix");

        let movies = catalog().list_movies(&filter).await.unwrap();
        assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![2, 3]);
    }

    #[tokio::test]
    async fn id_takes_precedence_over_title() {
        let filter = MovieFilter {
            id: Some("1".to_string()),
            q: Some("matrix".to_string()),
        };

        let movies = catalog().list_movies(&filter).await.unwrap();
        assert_eq!(movies, vec![movie(1, "Alien")]);
    }

    #[tokio::test]
    async fn wildcard_characters_match_literally() {
        let catalog = InMemoryCatalog::new(
            vec![movie(1, "100% Wolf"), movie(2, "1000 Wolves")],
            Vec::new(),
            Vec::new(),
        );

        let movies = catalog.list_movies(&MovieFilter::by_title("100%")).await.unwrap();
        assert_eq!(movies.iter().map(|m| m.id).collect::<Vec<_>>(), vec![1]);
    }
}
