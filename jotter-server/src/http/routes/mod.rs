//! Route handlers organized by resource

pub mod accounts;
pub mod assets;
pub mod health;
pub mod notes;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use tower_sessions::Session;

use super::error::WebError;
use super::extractors::MaybeUser;
use super::server::{AppState, Mode};
use crate::auth;
use crate::db::User;
use crate::views::{error_page, Nav, PageContext};

/// Navigation for the current mode and visitor.
pub(crate) fn nav_for(mode: Mode, user: Option<&User>) -> Nav {
    match (mode, user) {
        (Mode::Single, _) => Nav::SingleUser,
        (Mode::Multi, None) => Nav::Anonymous,
        (Mode::Multi, Some(user)) => Nav::SignedIn {
            username: user.username.clone(),
        },
    }
}

/// Page context with the queued flash messages consumed.
pub(crate) async fn page_context(session: &Session, nav: Nav) -> Result<PageContext, WebError> {
    Ok(PageContext::new(nav).with_flashes(auth::take_flashes(session).await?))
}

/// Fallback for every unmatched path
pub async fn not_found(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
) -> Response {
    let context = PageContext::new(nav_for(state.mode, user.as_ref()));
    let page = error_page(context, 404, "Page not found");
    (StatusCode::NOT_FOUND, Html(page)).into_response()
}
