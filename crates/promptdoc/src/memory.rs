//! Conversation history attached to a query.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Speaker of an utterance.
///
/// Serialized as a plain string; unknown strings round-trip through
/// [`Role::Other`]. Build custom roles with [`Role::other`] so that the
/// built-in names always map to their variants.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub enum Role {
    System,
    User,
    Assistant,
    /// A custom role. Holding `"system"`, `"user"` or `"assistant"` here is
    /// not preserved: it deserializes as the matching built-in variant.
    Other(String),
}

impl Role {
    /// Role named `name`, normalized to a built-in variant when it matches one.
    pub fn other(name: impl Into<String>) -> Self {
        Role::from(name.into())
    }

    /// Tag name used when rendering: lower-cased, spaces replaced with `_`.
    pub fn tag(&self) -> String {
        self.to_string().to_lowercase().replace(' ', "_")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::System => write!(f, "system"),
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Other(name) => write!(f, "{name}"),
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "system" => Role::System,
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(s),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        Role::from(s.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

/// One turn of dialogue.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Utterance {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub contents: String,
}

/// A tool invocation issued by the model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    pub tool_name: String,
    pub arguments: String,
    pub tool_call_id: String,
}

/// The outcome of a tool invocation. `result` is `None` when the tool
/// produced nothing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub result: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum MemoryItem {
    Utterance(Utterance),
    ToolCall(ToolCall),
    ToolCallResult(ToolCallResult),
}

impl MemoryItem {
    pub fn utterance(role: impl Into<Role>, contents: impl Into<String>) -> Self {
        MemoryItem::Utterance(Utterance {
            role: role.into(),
            name: None,
            contents: contents.into(),
        })
    }

    pub fn tool_call(
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
        tool_call_id: impl Into<String>,
    ) -> Self {
        MemoryItem::ToolCall(ToolCall {
            tool_name: tool_name.into(),
            arguments: arguments.into(),
            tool_call_id: tool_call_id.into(),
        })
    }

    pub fn tool_call_result(tool_call_id: impl Into<String>, result: Option<String>) -> Self {
        MemoryItem::ToolCallResult(ToolCallResult {
            tool_call_id: tool_call_id.into(),
            result,
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Memory {
    pub contents: Vec<MemoryItem>,
}

impl Memory {
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }
}
