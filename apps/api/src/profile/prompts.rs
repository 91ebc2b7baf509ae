// Prompt constants for profile extraction. Both prompts are single-shot.

/// Summarizes a résumé into a professional profile. Replace `{resume_text}`.
pub const PROFILE_PROMPT: &str = r#"Analiza el siguiente currículum y redacta un perfil profesional breve del candidato.
Incluye: formación, años de experiencia, áreas de especialidad, habilidades técnicas y blandas, e idiomas.
Si el currículum está vacío o no es legible, indícalo en una sola oración.

CURRÍCULUM:
{resume_text}"#;

/// Infers the candidate's region of residence. Replace `{profile}` and `{short_answer}`.
pub const REGION_PROMPT: &str = r#"A partir del siguiente perfil profesional, indica la región de Chile donde reside el candidato.
Si no es posible determinarla, responde exactamente: null

PERFIL:
{profile}

{short_answer}"#;
