//! One chat exchange: history → prompt → model → transcript.

use tracing::debug;

use crate::conversation::prompts::CHAT_SYSTEM_TEMPLATE;
use crate::conversation::session::SessionStore;
use crate::errors::AppError;
use crate::llm_client::CompletionGateway;
use crate::prompting::render_chat;

/// Runs a single exchange for `session_id` and returns the assistant's raw reply.
///
/// The exchange is only recorded after the model answers, so a failed call leaves
/// the transcript untouched.
pub async fn run_exchange(
    gateway: &dyn CompletionGateway,
    sessions: &SessionStore,
    session_id: &str,
    user_input: &str,
) -> Result<String, AppError> {
    let history = sessions.history(session_id);
    debug!(
        "Chat exchange for session {session_id}: {} history chars",
        history.len()
    );

    let prompt = render_chat(CHAT_SYSTEM_TEMPLATE, &history, user_input);
    let reply = gateway.complete(&prompt).await?;

    sessions.record(session_id, user_input, &reply);
    debug!(
        "Session {session_id} now holds {} exchange(s)",
        sessions.exchanges(session_id)
    );
    Ok(reply)
}
