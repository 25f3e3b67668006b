//! Landing page, registration, login, and logout (multi-user mode)

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tower_sessions::Session;

use super::{nav_for, page_context};
use crate::auth::{self, AuthError, FlashLevel};
use crate::db::DbError;
use crate::http::error::WebError;
use crate::http::extractors::MaybeUser;
use crate::http::server::AppState;
use crate::models::{FormErrors, LoginForm, RegisterForm};
use crate::views::{self, LoginDraft, Nav};

const BAD_CREDENTIALS: &str = "Invalid username or password";
const USERNAME_TAKEN: &str = "That username is already taken";

/// `?next=` on the login form
#[derive(Debug, Default, Deserialize)]
pub struct NextParam {
    pub next: Option<String>,
}

/// GET / - landing page
async fn landing(
    State(state): State<Arc<AppState>>,
    MaybeUser(user): MaybeUser,
    session: Session,
) -> Result<Html<String>, WebError> {
    let context = page_context(&session, nav_for(state.mode, user.as_ref())).await?;
    Ok(Html(views::landing_page(context)))
}

/// GET /register
async fn register_form(
    MaybeUser(user): MaybeUser,
    session: Session,
) -> Result<Response, WebError> {
    if user.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    let context = page_context(&session, Nav::Anonymous).await?;
    Ok(Html(views::register_page(context, "", &FormErrors::new())).into_response())
}

/// POST /register - create the account and sign it in
async fn register(
    State(state): State<Arc<AppState>>,
    MaybeUser(current): MaybeUser,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, WebError> {
    if current.is_some() {
        return Ok(Redirect::to("/home").into_response());
    }

    let username = form.username.trim();
    let registration = match form.validate() {
        Ok(registration) => registration,
        Err(errors) => {
            return register_rejected(&session, username, StatusCode::UNPROCESSABLE_ENTITY, errors)
                .await
        }
    };

    let user = match auth::create_account(&state.pool, &registration).await {
        Ok(user) => user,
        Err(AuthError::Database(DbError::Conflict { .. })) => {
            let errors = FormErrors::single("username", USERNAME_TAKEN);
            return register_rejected(&session, username, StatusCode::CONFLICT, errors).await;
        }
        Err(e) => return Err(e.into()),
    };

    auth::login(&session, user.id, None).await?;
    auth::flash(
        &session,
        FlashLevel::Success,
        format!("Welcome, {}!", user.username),
    )
    .await?;
    Ok(Redirect::to("/home").into_response())
}

/// Registration form again, with what went wrong.
async fn register_rejected(
    session: &Session,
    username: &str,
    status: StatusCode,
    errors: FormErrors,
) -> Result<Response, WebError> {
    let context = page_context(session, Nav::Anonymous).await?;
    let page = views::register_page(context, username, &errors);
    Ok((status, Html(page)).into_response())
}

/// GET /login
async fn login_form(
    MaybeUser(user): MaybeUser,
    session: Session,
    Query(params): Query<NextParam>,
) -> Result<Response, WebError> {
    let next = auth::safe_next(params.next.as_deref()).map(str::to_owned);
    if user.is_some() {
        return Ok(Redirect::to(next.as_deref().unwrap_or("/home")).into_response());
    }

    let draft = LoginDraft {
        next,
        ..LoginDraft::default()
    };
    let context = page_context(&session, Nav::Anonymous).await?;
    Ok(Html(views::login_page(context, &draft, &FormErrors::new())).into_response())
}

/// POST /login
async fn login(
    State(state): State<Arc<AppState>>,
    MaybeUser(current): MaybeUser,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, WebError> {
    if current.is_some() {
        let target = auth::safe_next(form.next.as_deref()).unwrap_or("/home");
        return Ok(Redirect::to(target).into_response());
    }

    let draft = LoginDraft {
        username: form.username.trim().to_owned(),
        remember: form.remember.is_some(),
        next: auth::safe_next(form.next.as_deref()).map(str::to_owned),
    };
    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => {
            return login_rejected(&session, &draft, StatusCode::UNPROCESSABLE_ENTITY, errors).await
        }
    };

    let Some(user) =
        auth::authenticate(&state.pool, &credentials.username, &credentials.password).await?
    else {
        tracing::warn!(username = %credentials.username, "login rejected");
        let errors = FormErrors::single("credentials", BAD_CREDENTIALS);
        return login_rejected(&session, &draft, StatusCode::UNAUTHORIZED, errors).await;
    };

    let remember_for = credentials.remember.then_some(state.remember_for);
    auth::login(&session, user.id, remember_for).await?;
    tracing::info!(user_id = user.id, remember = credentials.remember, "user logged in");

    let target = auth::safe_next(form.next.as_deref()).unwrap_or("/home");
    Ok(Redirect::to(target).into_response())
}

async fn login_rejected(
    session: &Session,
    draft: &LoginDraft,
    status: StatusCode,
    errors: FormErrors,
) -> Result<Response, WebError> {
    let context = page_context(session, Nav::Anonymous).await?;
    let page = views::login_page(context, draft, &errors);
    Ok((status, Html(page)).into_response())
}

/// GET /logout
async fn logout(MaybeUser(user): MaybeUser, session: Session) -> Result<Redirect, WebError> {
    auth::logout(&session).await?;
    if let Some(user) = user {
        tracing::info!(user_id = user.id, "user logged out");
    }
    Ok(Redirect::to("/"))
}

/// Account routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/register", get(register_form).post(register))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}
