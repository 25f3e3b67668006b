//! Note pages
//!
//! The same handlers serve both modes. A [`Scope`] decides whose notes are
//! touched and which navigation is shown: single-user mode works on ownerless
//! notes at `/`, multi-user mode on the signed-in user's notes at `/home`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use tower_sessions::Session;

use super::page_context;
use crate::auth::{self, FlashLevel};
use crate::db::{NoteRepo, Owner, User};
use crate::http::error::{WebError, ADD_FAILED, DELETE_FAILED, EDIT_FAILED};
use crate::http::extractors::{NoteId, RequireUser};
use crate::http::server::AppState;
use crate::models::{FormErrors, NoteForm, PageParams, Pagination};
use crate::views::{self, Nav};

/// Whose notes a request works on
struct Scope {
    owner: Owner,
    nav: Nav,
}

impl Scope {
    fn single() -> Self {
        Self {
            owner: Owner::Nobody,
            nav: Nav::SingleUser,
        }
    }

    fn user(user: User) -> Self {
        Self {
            owner: Owner::User(user.id),
            nav: Nav::SignedIn {
                username: user.username,
            },
        }
    }

    fn home(&self) -> &'static str {
        self.nav.home()
    }

    /// Single-user notes have no title; a submitted one is ignored.
    fn shape(&self, form: NoteForm) -> NoteForm {
        if self.nav.multi_user() {
            form
        } else {
            NoteForm {
                title: None,
                ..form
            }
        }
    }
}

async fn render_list(
    state: &AppState,
    session: &Session,
    scope: Scope,
    page: Pagination,
    draft: &NoteForm,
    errors: &FormErrors,
) -> Result<String, WebError> {
    let listing = NoteRepo::new(&state.pool).list(scope.owner, page).await?;
    let context = page_context(session, scope.nav).await?;
    Ok(views::list_page(context, &listing, draft, errors))
}

async fn show_list(
    state: &AppState,
    session: &Session,
    scope: Scope,
    params: PageParams,
) -> Result<Response, WebError> {
    let page = render_list(
        state,
        session,
        scope,
        params.into(),
        &NoteForm::default(),
        &FormErrors::new(),
    )
    .await?;
    Ok(Html(page).into_response())
}

async fn add_note(
    state: &AppState,
    session: &Session,
    scope: Scope,
    form: NoteForm,
) -> Result<Response, WebError> {
    let form = scope.shape(form);
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let page =
                render_list(state, session, scope, Pagination::default(), &form, &errors).await?;
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    let note = NoteRepo::new(&state.pool)
        .create(scope.owner, &input)
        .await
        .map_err(WebError::during(ADD_FAILED))?;

    tracing::info!(note_id = note.id, owner = ?scope.owner, "note added");
    auth::flash(session, FlashLevel::Success, "Note added").await?;
    Ok(Redirect::to(scope.home()).into_response())
}

async fn show_note(
    state: &AppState,
    session: &Session,
    scope: Scope,
    id: i64,
) -> Result<Response, WebError> {
    let note = NoteRepo::new(&state.pool).get(scope.owner, id).await?;
    let context = page_context(session, scope.nav).await?;
    Ok(Html(views::view_page(context, &note)).into_response())
}

async fn edit_form(
    state: &AppState,
    session: &Session,
    scope: Scope,
    id: i64,
) -> Result<Response, WebError> {
    let note = NoteRepo::new(&state.pool).get(scope.owner, id).await?;
    let draft = NoteForm {
        title: note.title,
        content: note.content,
    };
    let context = page_context(session, scope.nav).await?;
    Ok(Html(views::edit_page(context, id, &draft, &FormErrors::new())).into_response())
}

async fn update_note(
    state: &AppState,
    session: &Session,
    scope: Scope,
    id: i64,
    form: NoteForm,
) -> Result<Response, WebError> {
    let repo = NoteRepo::new(&state.pool);
    let form = scope.shape(form);
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            // editing somebody else's note is a 404 even when the form is bad
            repo.get(scope.owner, id).await?;
            let context = page_context(session, scope.nav).await?;
            let page = views::edit_page(context, id, &form, &errors);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response());
        }
    };

    repo.update(scope.owner, id, &input)
        .await
        .map_err(WebError::during(EDIT_FAILED))?;

    tracing::info!(note_id = id, owner = ?scope.owner, "note updated");
    auth::flash(session, FlashLevel::Success, "Note updated").await?;
    Ok(Redirect::to(scope.home()).into_response())
}

async fn delete_note(
    state: &AppState,
    session: &Session,
    scope: Scope,
    id: i64,
) -> Result<Response, WebError> {
    NoteRepo::new(&state.pool)
        .delete(scope.owner, id)
        .await
        .map_err(WebError::during(DELETE_FAILED))?;

    tracing::info!(note_id = id, owner = ?scope.owner, "note deleted");
    auth::flash(session, FlashLevel::Info, "Note deleted").await?;
    Ok(Redirect::to(scope.home()).into_response())
}

// Single-user mode

/// GET / - all notes and the creation form
async fn single_list(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<Response, WebError> {
    show_list(&state, &session, Scope::single(), params).await
}

/// POST / - add a note
async fn single_add(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    add_note(&state, &session, Scope::single(), form).await
}

/// GET /edit/{id}
async fn single_edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    NoteId(id): NoteId,
) -> Result<Response, WebError> {
    edit_form(&state, &session, Scope::single(), id).await
}

/// POST /edit/{id}
async fn single_update(
    State(state): State<Arc<AppState>>,
    session: Session,
    NoteId(id): NoteId,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    update_note(&state, &session, Scope::single(), id, form).await
}

/// GET /delete/{id}
async fn single_delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    NoteId(id): NoteId,
) -> Result<Response, WebError> {
    delete_note(&state, &session, Scope::single(), id).await
}

/// Note routes for single-user mode
pub fn single_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(single_list).post(single_add))
        .route("/edit/{id}", get(single_edit_form).post(single_update))
        .route("/delete/{id}", get(single_delete))
}

// Multi-user mode

/// GET /home - the signed-in user's notes
async fn home(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<Response, WebError> {
    show_list(&state, &session, Scope::user(user), params).await
}

/// POST /home - add a note owned by the signed-in user
async fn home_add(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    add_note(&state, &session, Scope::user(user), form).await
}

/// GET /view/{id}
async fn user_view(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    NoteId(id): NoteId,
) -> Result<Response, WebError> {
    show_note(&state, &session, Scope::user(user), id).await
}

/// GET /edit/{id}
async fn user_edit_form(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    NoteId(id): NoteId,
) -> Result<Response, WebError> {
    edit_form(&state, &session, Scope::user(user), id).await
}

/// POST /edit/{id}
async fn user_update(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    NoteId(id): NoteId,
    Form(form): Form<NoteForm>,
) -> Result<Response, WebError> {
    update_note(&state, &session, Scope::user(user), id, form).await
}

/// GET /delete/{id}
async fn user_delete(
    State(state): State<Arc<AppState>>,
    RequireUser(user): RequireUser,
    session: Session,
    NoteId(id): NoteId,
) -> Result<Response, WebError> {
    delete_note(&state, &session, Scope::user(user), id).await
}

/// Note routes for multi-user mode; all of them require a login
pub fn multi_user_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/home", get(home).post(home_add))
        .route("/view/{id}", get(user_view))
        .route("/edit/{id}", get(user_edit_form).post(user_update))
        .route("/delete/{id}", get(user_delete))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_scope_drops_title() {
        let form = NoteForm {
            title: Some("ignored".into()),
            content: "eggs".into(),
        };
        let shaped = Scope::single().shape(form);
        assert_eq!(shaped.title, None);
        assert_eq!(shaped.content, "eggs");
    }

    #[test]
    fn user_scope_keeps_title() {
        let user = User {
            id: 4,
            username: "alice".into(),
            password_hash: String::new(),
            created_at: chrono::Utc::now(),
        };
        let scope = Scope::user(user);
        assert_eq!(scope.owner, Owner::User(4));
        assert_eq!(scope.home(), "/home");

        let shaped = scope.shape(NoteForm {
            title: Some("kept".into()),
            content: "eggs".into(),
        });
        assert_eq!(shaped.title.as_deref(), Some("kept"));
    }
}
