//! Web error type with IntoResponse
//!
//! Handlers return `Result<_, WebError>`. Failures become HTML error pages or,
//! for a missing login, a redirect to the login form. Causes of 5xx responses
//! are logged and never rendered.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::auth::AuthError;
use crate::db::DbError;
use crate::views::{error_page, Nav, PageContext};

pub const ADD_FAILED: &str = "There was an issue adding your note";
pub const EDIT_FAILED: &str = "There was an issue editing your note";
pub const DELETE_FAILED: &str = "There was a problem deleting that note";

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Web error type with automatic HTTP status mapping
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Missing, foreign, or unparsable resource (404)
    #[error("not found")]
    NotFound,

    /// Protected page without a signed-in user (303 to the login form)
    #[error("login required for {next}")]
    Unauthenticated { next: String },

    /// A note mutation failed (500 with a user-facing message)
    #[error("{message}: {source}")]
    Operation {
        message: &'static str,
        #[source]
        source: DbError,
    },

    /// Database error (500, logged)
    #[error(transparent)]
    Database(DbError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Handler reached without the session layer
    #[error("session unavailable: {0}")]
    NoSession(&'static str),
}

impl WebError {
    /// Map a failed mutation: missing rows stay 404, anything else shows `message`.
    pub fn during(message: &'static str) -> impl FnOnce(DbError) -> Self {
        move |e| match e {
            DbError::NotFound { .. } => Self::NotFound,
            source => Self::Operation { message, source },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Unauthenticated { .. } => StatusCode::SEE_OTHER,
            Self::Operation { .. }
            | Self::Database(_)
            | Self::Auth(_)
            | Self::Session(_)
            | Self::NoSession(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DbError> for WebError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { .. } => Self::NotFound,
            _ => Self::Database(e),
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::NotFound => "Page not found",
            Self::Unauthenticated { next } => {
                let location = format!("/login?next={}", urlencoding::encode(next));
                return Redirect::to(&location).into_response();
            }
            Self::Operation { message, .. } => {
                // Log the actual error, render the fixed message
                tracing::error!(error = %self, "note operation failed");
                *message
            }
            _ => {
                tracing::error!(error = %self, "internal error");
                GENERIC_FAILURE
            }
        };

        // The error path has no session access; the page gets neutral navigation.
        let page = error_page(PageContext::new(Nav::SingleUser), status.as_u16(), message);
        (status, Html(page)).into_response()
    }
}
