//! Movie catalog model.

use serde::{Deserialize, Serialize};

/// A movie row from the `movies` table, returned to clients as is.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<String>,
    pub cover: Option<String>,
    pub link: Option<String>,
    pub synopsis: Option<String>,
}

/// Query string accepted by the movie listing endpoint.
///
/// - `id`: return only the movie with this id (takes precedence over `q`)
/// - `q`: case-insensitive substring of the title
///
/// Both are kept as raw text so a malformed value never rejects the request:
/// a blank `id` is ignored and a non-numeric one matches nothing.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MovieFilter {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub q: Option<String>,
}

/// How a [`MovieFilter`] selects movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieLookup<'a> {
    All,
    ById(i64),
    /// `id` was given but is not a number, so no movie can match.
    NoMatch,
    Title(&'a str),
}

impl MovieFilter {
    pub fn by_title(q: &str) -> Self {
        Self {
            id: None,
            q: Some(q.to_string()),
        }
    }

    /// Resolve the raw query values, ignoring blank ones.
    pub fn lookup(&self) -> MovieLookup<'_> {
        if let Some(id) = self.id.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            return match id.parse() {
                Ok(id) => MovieLookup::ById(id),
                Err(_) => MovieLookup::NoMatch,
            };
        }

        match self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => MovieLookup::Title(q),
            None => MovieLookup::All,
        }
    }

    /// Whether `movie` passes this filter. Title matching is a literal,
    /// case-insensitive substring test.
    pub fn matches(&self, movie: &Movie) -> bool {
        match self.lookup() {
            MovieLookup::All => true,
            MovieLookup::ById(id) => movie.id == id,
            MovieLookup::NoMatch => false,
            MovieLookup::Title(q) => movie.title.to_lowercase().contains(&q.to_lowercase()),
        }
    }
}
