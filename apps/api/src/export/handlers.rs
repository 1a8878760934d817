use axum::extract::State;
use serde::Deserialize;

use crate::accounts::session::CurrentSession;
use crate::errors::AppError;
use crate::extract::{ValidPath, ValidQuery};
use crate::export::{to_markdown, to_plain_text, ExportFormat, ExportedFile};
use crate::generation::handlers::session_document;
use crate::models::document::DocumentKind;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

/// GET /api/v1/documents/:kind/export?format=markdown|text|pdf
///
/// Downloads the session's current document of `kind`.
pub async fn handle_export(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    ValidPath(kind): ValidPath<DocumentKind>,
    ValidQuery(query): ValidQuery<ExportQuery>,
) -> Result<ExportedFile, AppError> {
    let document = session_document(&session, kind)?;

    match query.format {
        ExportFormat::Markdown => Ok(to_markdown(kind, &document.content)),
        ExportFormat::Text => Ok(to_plain_text(kind, &document.content)),
        ExportFormat::Pdf => state.pdf.render(kind, &document.content).await,
    }
}
