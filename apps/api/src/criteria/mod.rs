// Selection criteria generation.
// Implements: prompt building, model call, JSON extraction, schema validation, formatting.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod extractor;
pub mod formatter;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod validation;
