//! Prompt rendering: template slot substitution and packaging for the gateway.
//!
//! Chat calls go out as a two-message list (system first, user second).
//! Profile, region and job-matching calls go out as single-shot strings with no system role.

use crate::llm_client::{ChatMessage, Prompt};

/// Substitutes every `{key}` slot in `template` with its value from `vars`.
///
/// Single pass: substituted values are never re-scanned, so user text containing
/// `{chat_history}` or JSON braces is inserted literally. Braces that do not name a
/// known slot are left as they are.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let slot = after
            .find('}')
            .and_then(|close| {
                let key = &after[..close];
                vars.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (close, *value))
            });

        match slot {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Builds the chat payload: the system template with the transcript folded into its
/// `{chat_history}` slot, followed by the user's input.
pub fn render_chat(system_template: &str, history: &str, user_input: &str) -> Prompt {
    let system = render(system_template, &[("chat_history", history)]);
    Prompt::Messages(vec![ChatMessage::system(system), ChatMessage::user(user_input)])
}

/// Builds a single-shot prompt with no system role.
pub fn render_single_shot(template: &str, vars: &[(&str, &str)]) -> Prompt {
    Prompt::Text(render(template, vars))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::ChatRole;

    #[test]
    fn test_render_substitutes_all_occurrences() {
        let out = render("{a} y {b}, otra vez {a}", &[("a", "uno"), ("b", "dos")]);
        assert_eq!(out, "uno y dos, otra vez uno");
    }

    #[test]
    fn test_render_leaves_unknown_and_json_braces_alone() {
        let template = r#"Formato: {"matched_jobs": []} para {profile}"#;
        let out = render(template, &[("profile", "Ingeniera")]);
        assert_eq!(out, r#"Formato: {"matched_jobs": []} para Ingeniera"#);
    }

    #[test]
    fn test_render_does_not_rescan_substituted_values() {
        let out = render("{input}|{other}", &[("input", "{other}"), ("other", "X")]);
        assert_eq!(out, "{other}|X");
    }

    #[test]
    fn test_render_handles_unclosed_brace() {
        assert_eq!(render("abre { sin cerrar", &[("x", "y")]), "abre { sin cerrar");
    }

    #[test]
    fn test_render_chat_orders_system_then_user() {
        let prompt = render_chat("Contexto:\n{chat_history}", "Usuario: hola\n", "¿y ahora?");
        let Prompt::Messages(messages) = prompt else {
            panic!("chat prompt must be a message list");
        };

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[0].content, "Contexto:\nUsuario: hola\n");
        assert_eq!(messages[1].role, ChatRole::User);
        assert_eq!(messages[1].content, "¿y ahora?");
    }

    #[test]
    fn test_render_single_shot_is_plain_text() {
        let prompt = render_single_shot("Perfil: {profile}", &[("profile", "QA")]);
        assert_eq!(prompt, Prompt::Text("Perfil: QA".to_string()));
    }
}
