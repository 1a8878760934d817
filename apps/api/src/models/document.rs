use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kinds of document the generation pipeline produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    Resume,
    CoverLetter,
    AchievementStatement,
}

impl DocumentKind {
    /// Filename stem used for downloads.
    pub fn file_stem(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
            DocumentKind::AchievementStatement => "achievement_statement",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKind::Resume => "Resume",
            DocumentKind::CoverLetter => "Cover Letter",
            DocumentKind::AchievementStatement => "Achievement Statement",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover-letter",
            DocumentKind::AchievementStatement => "achievement-statement",
        })
    }
}

/// Model output held in the caller's session. Never written to the user collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub content: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

impl GeneratedDocument {
    pub fn new(kind: DocumentKind, content: String, model: &str) -> Self {
        Self {
            kind,
            content,
            model: model.to_string(),
            created_at: Utc::now(),
        }
    }
}
