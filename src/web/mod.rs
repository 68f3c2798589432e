pub mod admin;
pub mod announcements;
pub mod auth;
pub mod documents;
pub mod error;
pub mod password_reset;
pub mod profile;
pub mod session;
pub mod views;

#[cfg(test)]
mod tests;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router(state.clone()))
        .nest("/auth/password-reset", password_reset::router(state.clone()))
        .nest("/profile", profile::router(state.clone()))
        .nest("/announcements", announcements::router(state.clone()))
        .nest("/admin", admin::router(state.clone()))
        .nest("/admin/announcements", announcements::admin_router(state.clone()))
        .nest("/admin/documents", documents::router(state))
}
