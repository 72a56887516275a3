use axum::response::Html;

const INDEX_HTML: &str = include_str!("index.html");

/// Scene generator page
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
