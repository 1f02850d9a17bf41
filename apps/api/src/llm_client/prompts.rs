// Cross-cutting prompt fragments used by the orchestrator and the business
// operations. Operation-specific prompts live in each module's prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Follow-up user turn sent when a JSON reply looks truncated.
pub const CONTINUATION_INSTRUCTION: &str =
    "Continue please. Complete the JSON response from where you left off.";

/// Instruction appended to every resume-facing prompt.
pub const TRUTHFULNESS_INSTRUCTION: &str = "\
    CRITICAL: Only use facts present in the resume text provided. \
    Do NOT invent employers, dates, titles, degrees, or metrics. \
    If information is missing, leave the field empty rather than guessing.";
