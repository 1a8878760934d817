use std::sync::Arc;

use crate::accounts::session::SessionStore;
use crate::db::UserStore;
use crate::export::PdfRenderer;
use crate::llm_client::ChatModel;

/// Shared application state injected into all route handlers via Axum extractors.
/// Built once in `main` from `Config`; there is no other process-wide state.
#[derive(Clone)]
pub struct AppState {
    /// User collection (accounts + embedded profiles). Default: `PgUserStore`.
    pub users: Arc<dyn UserStore>,
    /// Login sessions. Default: `RedisSessionStore`.
    pub sessions: Arc<dyn SessionStore>,
    /// Hosted chat model. Default: `LlmClient`.
    pub model: Arc<dyn ChatModel>,
    pub pdf: PdfRenderer,
}
