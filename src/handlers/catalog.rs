//! Catalog HTTP handlers. Every route here sits behind the API key guard.
//!
//! - GET /api/{key}/movies - List movies, optionally filtered by `q` or `id`
//! - GET /api/{key}/mangas - List mangas with their chapters

use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppError,
    models::{
        manga::MangaResponse,
        movie::{Movie, MovieFilter},
    },
    state::AppState,
};

/// List movies.
///
/// # Query Parameters
///
/// - `id` - return only this movie (empty list if it does not exist)
/// - `q` - case-insensitive title substring, ignored when `id` is present
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filter): Query<MovieFilter>,
) -> Result<Json<Vec<Movie>>, AppError> {
    let movies = state.catalog.list_movies(&filter).await?;
    Ok(Json(movies))
}

/// List all mangas with their chapters.
pub async fn list_mangas(State(state): State<AppState>) -> Result<Json<Vec<MangaResponse>>, AppError> {
    let mangas = state.catalog.list_mangas().await?;
    Ok(Json(mangas))
}
