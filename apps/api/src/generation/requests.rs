//! Typed request bodies, one per document kind, validated before any model call.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResumeStyle {
    #[default]
    ModernProfessional,
    Creative,
    Minimalist,
    AtsOptimized,
}

impl ResumeStyle {
    pub fn label(&self) -> &'static str {
        match self {
            ResumeStyle::ModernProfessional => "Modern Professional",
            ResumeStyle::Creative => "Creative",
            ResumeStyle::Minimalist => "Minimalist",
            ResumeStyle::AtsOptimized => "ATS-Optimized",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterTone {
    #[default]
    Professional,
    Enthusiastic,
    Formal,
    Creative,
}

impl LetterTone {
    pub fn label(&self) -> &'static str {
        match self {
            LetterTone::Professional => "Professional",
            LetterTone::Enthusiastic => "Enthusiastic",
            LetterTone::Formal => "Formal",
            LetterTone::Creative => "Creative",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LetterLength {
    Brief,
    #[default]
    Standard,
    Detailed,
}

impl LetterLength {
    pub fn label(&self) -> &'static str {
        match self {
            LetterLength::Brief => "Brief (about 150 words)",
            LetterLength::Standard => "Standard (about 300 words)",
            LetterLength::Detailed => "Detailed (about 450 words)",
        }
    }
}

fn default_true() -> bool {
    true
}

/// Body of `POST /api/v1/documents/resume`. Every field is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub style: ResumeStyle,
    #[serde(default = "default_true")]
    pub include_summary: bool,
    #[serde(default = "default_true")]
    pub include_skills: bool,
    #[serde(default = "default_true")]
    pub include_projects: bool,
    pub target_company: Option<String>,
    pub job_description: Option<String>,
}

impl Default for ResumeRequest {
    fn default() -> Self {
        Self {
            style: ResumeStyle::default(),
            include_summary: true,
            include_skills: true,
            include_projects: true,
            target_company: None,
            job_description: None,
        }
    }
}

impl ResumeRequest {
    /// Sections to request, in resume order, minus the excluded ones.
    pub fn sections(&self) -> Vec<&'static str> {
        let mut sections = Vec::with_capacity(6);
        if self.include_summary {
            sections.push("Professional Summary");
        }
        if self.include_skills {
            sections.push("Technical Skills");
        }
        sections.push("Work Experience");
        sections.push("Education");
        if self.include_projects {
            sections.push("Projects");
        }
        sections.push("Certifications");
        sections
    }
}

/// Body of `POST /api/v1/documents/cover-letter`.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverLetterRequest {
    pub company: String,
    pub job_title: String,
    pub job_description: String,
    pub hiring_manager: Option<String>,
    #[serde(default)]
    pub tone: LetterTone,
    #[serde(default)]
    pub length: LetterLength,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        let missing: Vec<&str> = [
            ("company", &self.company),
            ("job_title", &self.job_title),
            ("job_description", &self.job_description),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Required fields missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Body of `POST /api/v1/documents/achievement-statement`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnhanceRequest {
    pub text: String,
}

impl EnhanceRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation("text cannot be empty".to_string()));
        }
        Ok(())
    }
}
