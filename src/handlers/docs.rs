//! Static documentation page.

use axum::response::Html;

const DOCS_PAGE: &str = include_str!("docs.html");

/// `GET /` - HTML page describing the endpoints.
pub async fn documentation() -> Html<&'static str> {
    Html(DOCS_PAGE)
}
