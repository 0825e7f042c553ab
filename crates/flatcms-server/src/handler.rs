use axum::extract::{Form, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Extension;
use flatcms_auth::CredentialError;
use flatcms_gate::{Authorization, Operation};
use flatcms_store::StoreError;
use flatcms_types::NameError;
use serde::Deserialize;
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::session::SessionHandle;
use crate::state::AppState;
use crate::views;

#[derive(Debug, Deserialize)]
pub struct NewDocumentForm {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentForm {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Redirect to the listing with `message` waiting on the next page.
fn redirect_home(session: &SessionHandle, message: impl Into<String>) -> Response {
    session.flash(message);
    Redirect::to("/").into_response()
}

/// `Some(redirect)` when the session may not perform `operation`.
fn deny(state: &AppState, session: &SessionHandle, operation: Operation) -> Option<Response> {
    match state.gate.check(&session.identity(), operation) {
        Authorization::Allowed => None,
        Authorization::Denied { message } => Some(redirect_home(session, message)),
    }
}

fn missing(session: &SessionHandle, name: &str) -> Response {
    redirect_home(session, format!("{name} does not exist."))
}

fn name_problem(reason: &NameError) -> &'static str {
    match reason {
        NameError::Empty => "A name is required.",
        NameError::UnsafePath(_) => "Name must not contain '/' or '\\' or start with '.'.",
        NameError::MissingExtension(_) | NameError::UnsupportedExtension { .. } => {
            "Name must end with .txt or .md."
        }
    }
}

fn unprocessable(page: String) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
}

/// Run blocking credential work off the async executor.
async fn blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

/// Document listing.
pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> ServerResult<Html<String>> {
    let mut names = state.documents.list()?;
    names.sort();
    let identity = session.identity();
    Ok(Html(views::index(
        &names,
        session.take_flash().as_deref(),
        identity.username(),
    )))
}

/// A single document, rendered by extension.
pub async fn show_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    match state.documents.read(&name) {
        Ok(content) => {
            let rendered = state.renderer.render(&name, &content)?;
            let content_type = format!("{}; charset=utf-8", rendered.content_type);
            Ok(([(CONTENT_TYPE, content_type)], rendered.body).into_response())
        }
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(missing(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn new_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Response {
    if let Some(denied) = deny(&state, &session, Operation::ViewNewForm) {
        return denied;
    }
    Html(views::new_document(session.take_flash().as_deref(), "")).into_response()
}

pub async fn create_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<NewDocumentForm>,
) -> ServerResult<Response> {
    if let Some(denied) = deny(&state, &session, Operation::Create) {
        return Ok(denied);
    }
    match state.documents.create(&form.name, "") {
        Ok(name) => Ok(redirect_home(&session, format!("{name} has been created."))),
        Err(StoreError::InvalidName { reason, .. }) => Ok(unprocessable(views::new_document(
            Some(name_problem(&reason)),
            &form.name,
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn edit_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    if let Some(denied) = deny(&state, &session, Operation::ViewEditForm) {
        return Ok(denied);
    }
    match state.documents.read(&name) {
        Ok(content) => Ok(Html(views::edit_document(
            session.take_flash().as_deref(),
            &name,
            &content,
        ))
        .into_response()),
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(missing(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn update_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
    Form(form): Form<ContentForm>,
) -> ServerResult<Response> {
    if let Some(denied) = deny(&state, &session, Operation::Overwrite) {
        return Ok(denied);
    }
    match state.documents.overwrite(&name, &form.content) {
        Ok(saved) => Ok(redirect_home(&session, format!("{saved} has been updated."))),
        Err(StoreError::InvalidName { reason, .. }) => Ok(unprocessable(views::edit_document(
            Some(name_problem(&reason)),
            &name,
            &form.content,
        ))),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    if let Some(denied) = deny(&state, &session, Operation::Delete) {
        return Ok(denied);
    }
    match state.documents.delete(&name) {
        Ok(()) => {
            info!(document = %name, "document deleted");
            Ok(redirect_home(&session, format!("{name} has been deleted.")))
        }
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(missing(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn duplicate_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Path(name): Path<String>,
) -> ServerResult<Response> {
    if let Some(denied) = deny(&state, &session, Operation::Duplicate) {
        return Ok(denied);
    }
    let mut counter = session.duplicates();
    let result = state.documents.duplicate(&name, &mut counter);
    session.set_duplicates(counter);
    match result {
        Ok(copy) => Ok(redirect_home(&session, format!("{copy} has been created."))),
        Err(StoreError::InvalidName {
            reason: NameError::MissingExtension(_) | NameError::UnsupportedExtension { .. },
            ..
        }) if state.documents.exists(&name)? => Ok(redirect_home(
            &session,
            format!("{name} cannot be duplicated. Name must end with .txt or .md."),
        )),
        Err(StoreError::NotFound { .. } | StoreError::InvalidName { .. }) => {
            Ok(missing(&session, &name))
        }
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

pub async fn signin_form(Extension(session): Extension<SessionHandle>) -> Html<String> {
    Html(views::signin(session.take_flash().as_deref(), ""))
}

pub async fn signin(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<CredentialsForm>,
) -> ServerResult<Response> {
    let credentials = state.credentials.clone();
    let username = form.username.clone();
    let matched = blocking(move || credentials.verify(&username, &form.password)).await??;

    if matched {
        session.sign_in(&form.username);
        info!(username = %form.username, "signed in");
        Ok(redirect_home(&session, "Welcome!"))
    } else {
        Ok(unprocessable(views::signin(
            Some("Invalid credentials"),
            &form.username,
        )))
    }
}

pub async fn signout(Extension(session): Extension<SessionHandle>) -> Response {
    session.sign_out();
    redirect_home(&session, "You have been signed out.")
}

pub async fn signup_form(Extension(session): Extension<SessionHandle>) -> Html<String> {
    Html(views::signup(session.take_flash().as_deref(), ""))
}

pub async fn signup(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Form(form): Form<CredentialsForm>,
) -> ServerResult<Response> {
    let credentials = state.credentials.clone();
    let username = form.username.clone();
    let added = blocking(move || credentials.add(&username, &form.password)).await?;

    match added {
        Ok(()) => {
            session.sign_in(&form.username);
            Ok(redirect_home(
                &session,
                format!("{} has been signed up.", form.username),
            ))
        }
        Err(
            e @ (CredentialError::DuplicateUser { .. }
            | CredentialError::InvalidUsername { .. }
            | CredentialError::EmptyPassword),
        ) => Ok(unprocessable(views::signup(Some(&e.to_string()), &form.username))),
        Err(e) => Err(e.into()),
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Liveness probe.
pub async fn health() -> &'static str {
    "ok"
}
