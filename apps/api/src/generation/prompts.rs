// All model prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for resume generation.
pub const RESUME_SYSTEM: &str = "You are an expert resume writer and career coach. \
    You create professional, ATS-friendly resumes that highlight the user's strengths and achievements. \
    Use industry-standard resume formatting, action verbs and professional language. \
    Focus on quantifiable achievements and results where the profile provides them. \
    Keep it concise and impactful. Respond in markdown only.";

/// Resume prompt template.
/// Replace: {profile}, {target_position}, {style}, {target_company}, {job_description},
///          {sections}, {grounding_instruction}
pub const RESUME_PROMPT_TEMPLATE: &str = r#"USER PROFILE:
{profile}

Target position: {target_position}
Resume style: {style}
Target company: {target_company}

JOB DESCRIPTION (tailor wording to it where the profile supports it):
{job_description}

Generate a professional resume in markdown format with exactly these sections, in this order:
{sections}

{grounding_instruction}"#;

/// System prompt for cover letters.
pub const COVER_LETTER_SYSTEM: &str = "You are an expert cover letter writer. \
    You write compelling, personalized cover letters that address the hiring manager professionally, \
    connect the user's skills to the job requirements and show enthusiasm and cultural fit. \
    Keep it to one page. Respond in markdown only.";

/// Cover letter prompt template.
/// Replace: {profile}, {company}, {hiring_manager}, {job_title}, {job_description},
///          {tone}, {length}, {grounding_instruction}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"USER PROFILE:
{profile}

Company: {company}
Hiring manager: {hiring_manager}
Job title: {job_title}
Tone: {tone}
Length: {length}

JOB DESCRIPTION:
{job_description}

Generate a professional cover letter in markdown format.

{grounding_instruction}"#;

/// System prompt for achievement statement enhancement.
pub const SKILL_ENHANCER_SYSTEM: &str = "You are a career development expert. \
    You turn basic descriptions of work and achievements into professional, impactful statements \
    using industry-standard terminology and action-oriented language, focused on results and impact. \
    Respond with the enhanced statement only.";

/// Enhancement prompt template. Replace: {original_content}
pub const SKILL_ENHANCER_PROMPT_TEMPLATE: &str = r#"Original content:
{original_content}

Rewrite the original content as an enhanced, professional statement.
Keep every fact from the original. Do NOT add numbers, employers or tools that the original does not mention.

Enhanced version:"#;

/// System prompt for portfolio analysis.
pub const PORTFOLIO_ANALYZER_SYSTEM: &str = "You are a portfolio analysis expert. \
    You analyze a user's profile and links to extract skills, achievements and project details for resume generation.";

/// Portfolio analysis prompt template.
/// Replace: {profile}, {links}, {grounding_instruction}
pub const PORTFOLIO_ANALYZER_PROMPT_TEMPLATE: &str = r#"USER PROFILE:
{profile}

PROVIDED LINKS:
{links}

Return a JSON object with this EXACT schema:
{
  "technical_skills": [{"skill": "Rust", "proficiency": "advanced"}],
  "key_projects": [{"name": "...", "description": "...", "technologies": ["..."]}],
  "achievements": ["..."],
  "education": ["..."],
  "experience": ["..."],
  "specialized_knowledge": ["..."]
}

Links are listed for context only; you cannot open them. Do not describe their contents.

{grounding_instruction}"#;
