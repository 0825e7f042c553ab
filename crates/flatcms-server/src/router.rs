use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::session::session_layer;
use crate::state::AppState;

/// Build the axum router with all flatcms endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::index))
        .route("/new", get(handler::new_document).post(handler::create_document))
        .route("/docs/:name", get(handler::show_document).post(handler::update_document))
        .route("/docs/:name/edit", get(handler::edit_document))
        .route("/docs/:name/delete", post(handler::delete_document))
        .route("/docs/:name/duplicate", post(handler::duplicate_document))
        .route("/users/signin", get(handler::signin_form).post(handler::signin))
        .route("/users/signout", post(handler::signout))
        .route("/users/signup", get(handler::signup_form).post(handler::signup))
        .route("/health", get(handler::health))
        .layer(middleware::from_fn_with_state(state.clone(), session_layer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
