pub mod health;

#[cfg(test)]
mod tests;

use axum::{
    routing::{get, post},
    Router,
};

use crate::accounts::handlers as accounts;
use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/auth/register", post(accounts::handle_register))
        .route("/api/v1/auth/login", post(accounts::handle_login))
        .route("/api/v1/auth/logout", post(accounts::handle_logout))
        .route("/api/v1/auth/me", get(accounts::handle_me))
        // Profile
        .route(
            "/api/v1/profile",
            get(profiles::handle_get_profile).put(profiles::handle_put_profile),
        )
        .route(
            "/api/v1/profile/analysis",
            post(generation::handle_analyze_portfolio),
        )
        // Documents
        .route("/api/v1/documents", get(generation::handle_list_documents))
        .route(
            "/api/v1/documents/:kind",
            get(generation::handle_get_document).post(generation::handle_generate),
        )
        .route("/api/v1/documents/:kind/export", get(export::handle_export))
        .with_state(state)
}
