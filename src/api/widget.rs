//! The chat widget page
//!
//! A single form: one message box in, one autoplaying audio player out.
//! The page keeps the session history in memory and sends it with every
//! submission; reloading the page starts a new session.

use axum::{response::Html, routing::get, Router};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Build widget router
pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
