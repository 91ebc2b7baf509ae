// Conversational context: per-session transcripts folded into the chat prompt.
// All model calls go through llm_client::CompletionGateway.

pub mod chat;
pub mod handlers;
pub mod memory;
pub mod prompts;
pub mod session;
