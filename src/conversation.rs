use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// Body of a log entry. Prompts produced by the session are always plain
/// text; payloads derived from remote results travel as `Structured` and
/// are left for the renderer to interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Content {
    Text(String),
    Structured(serde_json::Value),
}

impl Content {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Structured(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationEntry {
    pub id: u64,
    pub role: Role,
    pub content: Content,
    pub timestamp: DateTime<Utc>,
}

/// Append-only sequence of entries. Entries are never edited, removed
/// or reordered once pushed.
#[derive(Debug, Default)]
pub struct ConversationLog {
    entries: Vec<ConversationEntry>,
    next_id: u64,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: Content) -> &ConversationEntry {
        let entry = ConversationEntry {
            id: self.next_id,
            role,
            content,
            timestamp: Utc::now(),
        };
        self.next_id += 1;
        log::debug!("log entry #{} ({:?})", entry.id, entry.role);

        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn push_user(&mut self, text: impl Into<String>) -> &ConversationEntry {
        self.push(Role::User, Content::Text(text.into()))
    }

    pub fn push_bot(&mut self, text: impl Into<String>) -> &ConversationEntry {
        self.push(Role::Bot, Content::Text(text.into()))
    }

    pub fn push_structured(&mut self, value: serde_json::Value) -> &ConversationEntry {
        self.push(Role::Bot, Content::Structured(value))
    }

    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Entries appended after the first `seen` ones, for renderers that
    /// draw incrementally.
    pub fn since(&self, seen: usize) -> &[ConversationEntry] {
        self.entries.get(seen..).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationEntry> {
        self.entries.last()
    }
}
