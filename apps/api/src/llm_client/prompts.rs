// Shared prompt fragments.
// Each service that needs model calls defines its own prompts.rs alongside it.
// This file contains cross-cutting prompt fragments.

/// Appended to every generation prompt that embeds profile data.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Use ONLY facts present in the user profile above. \
    Do NOT invent employers, job titles, dates, metrics, degrees or certifications. \
    If a section has no supporting data in the profile, omit it entirely.";

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
