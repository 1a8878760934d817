// Generation Pipeline: profile → prompt → model → generated document.
// All model calls go through llm_client: no direct HTTP calls here.

pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod requests;
