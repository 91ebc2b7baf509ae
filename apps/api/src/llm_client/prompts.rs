// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose answer is fed to the structured response parser.
pub const JSON_ONLY_INSTRUCTION: &str = "Responde ÚNICAMENTE con un objeto JSON válido. \
    No incluyas texto fuera del objeto JSON. \
    No agregues explicaciones ni disculpas.";

/// Appended to prompts whose answer is used verbatim as a short value.
pub const SHORT_ANSWER_INSTRUCTION: &str = "Responde solo con el valor solicitado, \
    sin comillas, sin explicaciones y sin formato adicional.";
