// Compatibility analysis pipeline: prompt building, gateway call, extraction,
// persistence. All model calls go through ai_gateway — no direct HTTP here.

pub mod handlers;
pub mod prompt_builder;
pub mod prompts;
