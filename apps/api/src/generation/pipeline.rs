//! Generation Pipeline: turns a profile into prompts and returns model text.
//!
//! Flow per document: validate request → render profile → fill template →
//! one model call → `GeneratedDocument`. No caching, no retry.

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::generation::prompts::{
    COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM, PORTFOLIO_ANALYZER_PROMPT_TEMPLATE,
    PORTFOLIO_ANALYZER_SYSTEM, RESUME_PROMPT_TEMPLATE, RESUME_SYSTEM,
    SKILL_ENHANCER_PROMPT_TEMPLATE, SKILL_ENHANCER_SYSTEM,
};
use crate::generation::requests::{CoverLetterRequest, EnhanceRequest, ResumeRequest};
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{complete_json, ChatModel};
use crate::models::document::{DocumentKind, GeneratedDocument};
use crate::models::profile::Profile;

const NOT_PROVIDED: &str = "Not provided";

/// Generates a resume from the profile.
pub async fn generate_resume(
    model: &dyn ChatModel,
    profile: &Profile,
    request: &ResumeRequest,
) -> Result<GeneratedDocument, AppError> {
    require_profile(profile)?;
    let prompt = build_resume_prompt(profile, request);
    let content = model.complete(RESUME_SYSTEM, &prompt).await?;

    info!(
        "Generated resume ({} chars, style={})",
        content.len(),
        request.style.label()
    );
    Ok(GeneratedDocument::new(
        DocumentKind::Resume,
        content,
        model.model_name(),
    ))
}

/// Generates a cover letter for a specific company and job description.
pub async fn generate_cover_letter(
    model: &dyn ChatModel,
    profile: &Profile,
    request: &CoverLetterRequest,
) -> Result<GeneratedDocument, AppError> {
    require_profile(profile)?;
    request.validate()?;
    let prompt = build_cover_letter_prompt(profile, request);
    let content = model.complete(COVER_LETTER_SYSTEM, &prompt).await?;

    info!("Generated cover letter for {}", request.company.trim());
    Ok(GeneratedDocument::new(
        DocumentKind::CoverLetter,
        content,
        model.model_name(),
    ))
}

/// Rewrites a raw description of work as a professional achievement statement.
pub async fn enhance_skill_statement(
    model: &dyn ChatModel,
    request: &EnhanceRequest,
) -> Result<GeneratedDocument, AppError> {
    request.validate()?;
    let prompt = SKILL_ENHANCER_PROMPT_TEMPLATE.replace("{original_content}", request.text.trim());
    let content = model.complete(SKILL_ENHANCER_SYSTEM, &prompt).await?;

    Ok(GeneratedDocument::new(
        DocumentKind::AchievementStatement,
        content,
        model.model_name(),
    ))
}

/// Asks the model for a structured JSON analysis of the profile and its links.
pub async fn analyze_portfolio(
    model: &dyn ChatModel,
    profile: &Profile,
) -> Result<Value, AppError> {
    require_profile(profile)?;

    let links = profile.links.present();
    let links = if links.is_empty() {
        NOT_PROVIDED.to_string()
    } else {
        links
            .iter()
            .map(|(name, url)| format!("- {name}: {url}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let prompt = PORTFOLIO_ANALYZER_PROMPT_TEMPLATE
        .replace("{profile}", &render_profile(profile))
        .replace("{links}", &links)
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION);
    let system = format!("{PORTFOLIO_ANALYZER_SYSTEM} {JSON_ONLY_INSTRUCTION}");

    let analysis: Value = complete_json(model, &system, &prompt).await?;
    if !analysis.is_object() {
        return Err(AppError::ModelUnavailable(
            "The AI service returned an unreadable analysis.".to_string(),
        ));
    }
    Ok(analysis)
}

fn require_profile(profile: &Profile) -> Result<(), AppError> {
    if profile.is_empty() {
        return Err(AppError::Validation(
            "Profile is empty. Save your profile before generating documents.".to_string(),
        ));
    }
    Ok(())
}

fn build_resume_prompt(profile: &Profile, request: &ResumeRequest) -> String {
    let sections = request
        .sections()
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    RESUME_PROMPT_TEMPLATE
        .replace("{profile}", &render_profile(profile))
        .replace(
            "{target_position}",
            or_not_provided(&profile.career_goals.target_position),
        )
        .replace("{style}", request.style.label())
        .replace(
            "{target_company}",
            or_not_provided(request.target_company.as_deref().unwrap_or_default()),
        )
        .replace(
            "{job_description}",
            or_not_provided(request.job_description.as_deref().unwrap_or_default()),
        )
        .replace("{sections}", &sections)
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
}

fn build_cover_letter_prompt(profile: &Profile, request: &CoverLetterRequest) -> String {
    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{profile}", &render_profile(profile))
        .replace("{company}", request.company.trim())
        .replace(
            "{hiring_manager}",
            or_not_provided(request.hiring_manager.as_deref().unwrap_or_default()),
        )
        .replace("{job_title}", request.job_title.trim())
        .replace("{tone}", request.tone.label())
        .replace("{length}", request.length.label())
        .replace("{job_description}", request.job_description.trim())
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
}

fn or_not_provided(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

/// Renders the profile as a labelled plain-text block. Empty fields are omitted
/// so the model is never shown a blank it could fill in.
fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: &str| {
        let value = value.trim();
        if !value.is_empty() {
            out.push_str(&format!("{label}: {value}\n"));
        }
    };

    let p = &profile.personal_info;
    line("Name", &p.full_name);
    line("Email", &p.email);
    line("Phone", p.phone.as_deref().unwrap_or_default());
    line("Location", p.location.as_deref().unwrap_or_default());

    let g = &profile.career_goals;
    line("Target position", &g.target_position);
    line("Target industry", g.target_industry.as_deref().unwrap_or_default());
    line("Experience level", g.experience_level.as_deref().unwrap_or_default());

    line("Technical skills", &profile.skills.technical.join(", "));
    line("Soft skills", &profile.skills.soft.join(", "));
    line("Certifications", &profile.certifications.join("; "));

    for (name, url) in profile.links.present() {
        line(name, url);
    }

    for (i, e) in profile.experience.iter().enumerate() {
        let end = if e.current {
            "present"
        } else {
            e.end_date.as_deref().unwrap_or_default()
        };
        let period = match (e.start_date.as_deref(), end) {
            (Some(start), "") => format!("{start} -"),
            (Some(start), end) => format!("{start} - {end}"),
            (None, end) => end.to_string(),
        };
        line(
            &format!("Experience {}", i + 1),
            &format!("{} at {}", e.job_title, e.company),
        );
        line("  Location", e.location.as_deref().unwrap_or_default());
        line("  Period", &period);
        line("  Responsibilities", &e.responsibilities);
    }

    for (i, e) in profile.education.iter().enumerate() {
        line(
            &format!("Education {}", i + 1),
            &format!("{}, {}", e.degree, e.institution),
        );
        line("  Graduated", e.graduation_date.as_deref().unwrap_or_default());
        line("  GPA", e.gpa.as_deref().unwrap_or_default());
    }

    for (i, proj) in profile.projects.iter().enumerate() {
        line(&format!("Project {}", i + 1), &proj.title);
        line("  Description", &proj.description);
        line("  Technologies", &proj.technologies.join(", "));
        line("  Link", proj.link.as_deref().unwrap_or_default());
    }

    out
}
