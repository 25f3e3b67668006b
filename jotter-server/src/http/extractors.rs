//! Custom Axum extractors

use std::sync::Arc;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tower_sessions::Session;

use super::error::WebError;
use super::server::AppState;
use crate::auth;
use crate::db::{DbError, User, UserRepo};

/// Integer note id from the path.
///
/// Anything that is not an integer is a 404, as if no route had matched.
pub struct NoteId(pub i64);

impl<S> FromRequestParts<S> for NoteId
where
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| WebError::NotFound)?;

        id.parse().map(Self).map_err(|_| WebError::NotFound)
    }
}

/// Signed-in user, if any
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from(parts, state).await?;

        let Some(user_id) = auth::current_user_id(&session).await? else {
            return Ok(Self(None));
        };

        match UserRepo::new(&state.pool).get(user_id).await {
            Ok(user) => Ok(Self(Some(user))),
            // account removed while the session was alive
            Err(DbError::NotFound { .. }) => {
                tracing::warn!(user_id, "session refers to a missing user, signing out");
                auth::logout(&session).await?;
                Ok(Self(None))
            }
            Err(e) => Err(WebError::Database(e)),
        }
    }
}

/// Signed-in user; anonymous requests are sent to the login form
pub struct RequireUser(pub User);

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;

        user.map(Self).ok_or_else(|| WebError::Unauthenticated {
            next: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_owned())
                .unwrap_or_else(|| parts.uri.path().to_owned()),
        })
    }
}

async fn session_from(parts: &mut Parts, state: &Arc<AppState>) -> Result<Session, WebError> {
    Session::from_request_parts(parts, state)
        .await
        .map_err(|(_, reason)| WebError::NoSession(reason))
}
