// Prompt constants for job matching.

/// Single-shot job matching prompt.
/// Replace: {profile}, {region_clause}, {jobs_json}, {json_only}
pub const FILTER_JOBS_PROMPT: &str = r#"Eres un reclutador experto. Compara el perfil profesional del candidato con las ofertas laborales y selecciona las que mejor se ajusten.

PERFIL DEL CANDIDATO:
{profile}

{region_clause}

OFERTAS LABORALES (JSON):
{jobs_json}

Reglas:
- Descarta las ofertas cuyos requisitos excluyentes el candidato no cumple.
- match_score es un entero entre 0 y 100.
- match_reasons explica brevemente por qué la oferta calza con el perfil.
- Ordena las ofertas de mayor a menor match_score.

Devuelve un objeto JSON con este esquema EXACTO:
{"matched_jobs": [{"job_id": "<id de la oferta>", "match_score": 85, "match_reasons": ["razón 1", "razón 2"]}]}

{json_only}"#;

/// Region clause when the candidate declared a region. Replace `{region}`.
pub const REGION_CLAUSE: &str =
    "REGIÓN DEL CANDIDATO: {region}. Prioriza ofertas en esa región.";

pub const NO_REGION_CLAUSE: &str = "REGIÓN DEL CANDIDATO: no informada.";
