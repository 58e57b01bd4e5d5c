// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments only.

/// Persona line that opens every recruitment prompt.
pub const RECRUITER_PERSONA: &str = "You are an expert AI recruitment analyst.";

/// Closing instruction for prompts whose answer must be a bare JSON array.
pub const JSON_ARRAY_ONLY: &str = "Return the JSON array only. \
    Do not include any explanations outside the JSON array. \
    Do not use markdown code fences.";
