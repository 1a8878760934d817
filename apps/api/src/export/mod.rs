//! Document Exporter: packages generated text as a downloadable file.
//!
//! Markdown and plain text are pure transformations of the input, so the same
//! text always exports to the same bytes. PDF goes through an external
//! renderer binary and is only available when that binary is installed.

use std::io::ErrorKind;
use std::time::Duration;

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::document::DocumentKind;

pub mod handlers;

const RENDER_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Text,
    Pdf,
}

/// A downloadable payload: filename, MIME type and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Bytes,
}

impl IntoResponse for ExportedFile {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, self.content_type.to_string()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.filename),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}

/// Wraps text as a `.md` download.
pub fn to_markdown(kind: DocumentKind, text: &str) -> ExportedFile {
    ExportedFile {
        filename: format!("{}.md", kind.file_stem()),
        content_type: "text/markdown; charset=utf-8",
        body: Bytes::from(normalize_text(text)),
    }
}

/// Wraps text as a `.txt` download.
pub fn to_plain_text(kind: DocumentKind, text: &str) -> ExportedFile {
    ExportedFile {
        filename: format!("{}.txt", kind.file_stem()),
        content_type: "text/plain; charset=utf-8",
        body: Bytes::from(normalize_text(text)),
    }
}

/// `\n` line endings and exactly one trailing newline.
fn normalize_text(text: &str) -> String {
    let mut out = text.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed_len = out.trim_end_matches('\n').len();
    out.truncate(trimmed_len);
    out.push('\n');
    out
}

/// Renders documents to PDF through an external HTML-to-PDF binary
/// (`wkhtmltopdf` by default) invoked as `<command> --quiet <in.html> <out.pdf>`.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    command: String,
}

impl PdfRenderer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub async fn render(&self, kind: DocumentKind, text: &str) -> Result<ExportedFile, AppError> {
        let workdir = tempfile::tempdir()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create temp dir: {e}")))?;
        let input = workdir.path().join("document.html");
        let output = workdir.path().join("document.pdf");

        tokio::fs::write(&input, render_html(kind, text))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to write HTML: {e}")))?;

        let mut command = Command::new(&self.command);
        command
            .arg("--quiet")
            .arg(&input)
            .arg(&output)
            .kill_on_drop(true);

        let result = match tokio::time::timeout(RENDER_TIMEOUT, command.output()).await {
            Err(_) => {
                return Err(AppError::ExportUnavailable(
                    "PDF rendering timed out".to_string(),
                ))
            }
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                warn!("PDF renderer '{}' is not installed", self.command);
                return Err(AppError::ExportUnavailable(format!(
                    "PDF export requires '{}' to be installed on the server",
                    self.command
                )));
            }
            Ok(Err(e)) => {
                return Err(AppError::ExportUnavailable(format!(
                    "Failed to start PDF renderer: {e}"
                )))
            }
            Ok(Ok(result)) => result,
        };

        if !result.status.success() {
            warn!(
                "PDF renderer exited with {}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr)
            );
            return Err(AppError::ExportUnavailable(
                "PDF rendering failed".to_string(),
            ));
        }

        let pdf = tokio::fs::read(&output)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to read rendered PDF: {e}")))?;

        info!("Rendered {} PDF ({} bytes)", kind, pdf.len());
        Ok(ExportedFile {
            filename: format!("{}.pdf", kind.file_stem()),
            content_type: "application/pdf",
            body: Bytes::from(pdf),
        })
    }
}

/// Minimal printable HTML page: the text, escaped, in a preformatted block.
fn render_html(kind: DocumentKind, text: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>body{{font-family:sans-serif;margin:2cm;}}\
         pre{{white-space:pre-wrap;font-family:inherit;font-size:11pt;}}</style>\
         </head><body><pre>{}</pre></body></html>\n",
        kind.title(),
        escape_html(&normalize_text(text))
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
