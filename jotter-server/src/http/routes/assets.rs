//! Stylesheet, compiled into the binary

use std::sync::Arc;

use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::http::server::AppState;

const STYLE_CSS: &str = include_str!("../../../assets/style.css");

/// GET /static/style.css
async fn stylesheet() -> impl IntoResponse {
    (
        [
            (CONTENT_TYPE, "text/css; charset=utf-8"),
            (CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLE_CSS,
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/static/style.css", get(stylesheet))
}
