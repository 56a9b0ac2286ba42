//! Axum router wiring.
//!
//! The node is path-agnostic: every path is served by the same method table.

use axum::routing::{post, MethodRouter};
use axum::Router;

use crate::{app_state::AppState, transport::http};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", methods())
        .route("/*path", methods())
        .with_state(state)
}

fn methods() -> MethodRouter<AppState> {
    post(http::receive)
        .get(http::not_found)
        .head(http::head)
        .put(http::not_implemented)
        .patch(http::not_implemented)
        .delete(http::not_implemented)
}
