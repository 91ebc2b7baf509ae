//! Conversation memory: an append-only log of turns for one session.

use serde::Serialize;

/// Who authored a turn. The transcript vocabulary is closed: anything else is not a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    /// Line prefix used when rendering the transcript.
    pub fn label(self) -> &'static str {
        match self {
            Role::Human => "Usuario",
            Role::Assistant => "Asistente",
        }
    }
}

/// A single turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    content: String,
}

#[cfg(test)]
impl Turn {
    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Ordered transcript for a single conversation.
///
/// Turns are only ever added in (Human, Assistant) pairs through `record`, so the log
/// always holds whole exchanges. With `max_exchanges > 0` the oldest exchanges are
/// dropped once the bound is exceeded; `0` keeps everything.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
    max_exchanges: usize,
}

impl ConversationMemory {
    pub fn new(max_exchanges: usize) -> Self {
        Self {
            turns: Vec::new(),
            max_exchanges,
        }
    }

    /// Appends one completed exchange: the user turn, then the assistant turn.
    pub fn record(&mut self, user_text: impl Into<String>, assistant_text: impl Into<String>) {
        self.turns.push(Turn {
            role: Role::Human,
            content: user_text.into(),
        });
        self.turns.push(Turn {
            role: Role::Assistant,
            content: assistant_text.into(),
        });

        if self.max_exchanges > 0 && self.exchanges() > self.max_exchanges {
            let excess = self.exchanges() - self.max_exchanges;
            self.turns.drain(..excess * 2);
        }
    }

    /// Renders the transcript, one `Label: content` line per turn in chronological order.
    pub fn render(&self) -> String {
        self.turns.iter().fold(String::new(), |mut out, turn| {
            out.push_str(turn.role.label());
            out.push_str(": ");
            out.push_str(&turn.content);
            out.push('\n');
            out
        })
    }

    #[cfg(test)]
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn exchanges(&self) -> usize {
        self.turns.len() / 2
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
