//! Manga catalog models.
//!
//! The `mangas` and `chapters` tables keep list-valued fields (`genres`,
//! `images`) as `", "`-separated text. Responses expose them as arrays.

use std::collections::HashMap;

use serde::Serialize;

/// A manga row from the `mangas` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Manga {
    pub id: i64,
    pub title: String,
    pub rating: Option<String>,
    pub year: Option<i32>,
    pub cover: Option<String>,
    pub link: Option<String>,
    pub genres: String,
    pub synopsis: Option<String>,
}

/// A chapter row from the `chapters` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Chapter {
    pub id: i64,
    pub manga_id: i64,
    pub title: String,
    pub link: Option<String>,
    pub release_date: Option<String>,
    pub images: String,
}

/// Response body for one chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterResponse {
    pub id: i64,
    pub title: String,
    pub link: Option<String>,
    pub release_date: Option<String>,
    pub images: Vec<String>,
}

/// Response body for one manga, chapters included.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "title": "Berserk",
///   "rating": "9.4",
///   "year": 1989,
///   "cover": "https://example.com/berserk.jpg",
///   "link": "https://example.com/berserk",
///   "genres": ["Action", "Dark Fantasy"],
///   "synopsis": "...",
///   "chapters": [
///     {
///       "id": 10,
///       "title": "The Black Swordsman",
///       "link": "https://example.com/berserk/1",
///       "release_date": "1989-08-25",
///       "images": ["p1.jpg", "p2.jpg"]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MangaResponse {
    pub id: i64,
    pub title: String,
    pub rating: Option<String>,
    pub year: Option<i32>,
    pub cover: Option<String>,
    pub link: Option<String>,
    pub genres: Vec<String>,
    pub synopsis: Option<String>,
    pub chapters: Vec<ChapterResponse>,
}

/// Split a `", "`-separated column. An empty column yields an empty list.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(", ")
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

impl From<Chapter> for ChapterResponse {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id,
            title: chapter.title,
            link: chapter.link,
            release_date: chapter.release_date,
            images: split_list(&chapter.images),
        }
    }
}

impl MangaResponse {
    /// Build the response for `manga` from the chapters that belong to it.
    pub fn new(manga: Manga, chapters: Vec<Chapter>) -> Self {
        Self {
            id: manga.id,
            title: manga.title,
            rating: manga.rating,
            year: manga.year,
            cover: manga.cover,
            link: manga.link,
            genres: split_list(&manga.genres),
            synopsis: manga.synopsis,
            chapters: chapters.into_iter().map(Into::into).collect(),
        }
    }
}

/// Attach chapters to their manga, keeping both in the order given.
pub fn assemble(mangas: Vec<Manga>, chapters: Vec<Chapter>) -> Vec<MangaResponse> {
    let mut by_manga: HashMap<i64, Vec<Chapter>> = HashMap::new();
    for chapter in chapters {
        by_manga.entry(chapter.manga_id).or_default().push(chapter);
    }

    mangas
        .into_iter()
        .map(|manga| {
            let chapters = by_manga.remove(&manga.id).unwrap_or_default();
            MangaResponse::new(manga, chapters)
        })
        .collect()
}
