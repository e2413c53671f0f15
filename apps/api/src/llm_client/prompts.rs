// Shared prompt fragments for suggestion-service calls.
// Analysis-specific templates live in analysis::prompts.

/// Instruction prepended to every prompt so the model answers with bare JSON.
pub const JSON_ONLY_SYSTEM: &str = "You are an expert career counselor specializing in \
    resume optimization and job matching. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction that keeps suggestions tied to what the resume actually says.
pub const GROUNDING_INSTRUCTION: &str = "\
    Only suggest bullet points the candidate could truthfully claim based on the resume. \
    Do NOT invent employers, metrics, or technologies the resume gives no evidence of; \
    phrase speculative additions as skills to develop instead.";
