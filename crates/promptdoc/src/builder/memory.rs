//! Builder for the conversation memory of a query.

use super::pending::Pending;
use crate::content::Content;
use crate::error::Result;
use crate::memory::{Memory, MemoryItem, Role, ToolCall, ToolCallResult, Utterance};
use crate::template::TemplateData;

/// Deferred builder for a conversation [`Memory`].
///
/// Utterances whose content resolves to `None` are dropped. A tool result
/// whose content resolves to `None` is kept with a `null` result.
pub struct MemoryBuilder<T> {
    items: Pending<T, MemoryItem>,
}

impl<T: TemplateData + 'static> Default for MemoryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> MemoryBuilder<T> {
    pub fn new() -> Self {
        Self {
            items: Pending::new(),
        }
    }

    pub fn utterance(self, role: impl Into<Role>, content: impl Into<Content<T>>) -> Self {
        self.push_utterance(role.into(), None, content.into())
    }

    /// An utterance attributed to a named speaker.
    pub fn named_utterance(
        self,
        role: impl Into<Role>,
        name: impl Into<String>,
        content: impl Into<Content<T>>,
    ) -> Self {
        self.push_utterance(role.into(), Some(name.into()), content.into())
    }

    pub fn system(self, content: impl Into<Content<T>>) -> Self {
        self.utterance(Role::System, content)
    }

    pub fn user(self, content: impl Into<Content<T>>) -> Self {
        self.utterance(Role::User, content)
    }

    pub fn assistant(self, content: impl Into<Content<T>>) -> Self {
        self.utterance(Role::Assistant, content)
    }

    fn push_utterance(mut self, role: Role, name: Option<String>, content: Content<T>) -> Self {
        self.items.push_one(move |data: &T| {
            Ok(content.resolve(data)?.map(|contents| {
                MemoryItem::Utterance(Utterance {
                    role: role.clone(),
                    name: name.clone(),
                    contents,
                })
            }))
        });
        self
    }

    /// A tool invocation. Arguments are usually a JSON string.
    pub fn tool_call(
        mut self,
        tool_name: impl Into<String>,
        arguments: impl Into<Content<T>>,
        tool_call_id: impl Into<String>,
    ) -> Self {
        let tool_name = tool_name.into();
        let arguments = arguments.into();
        let tool_call_id = tool_call_id.into();
        self.items.push_one(move |data: &T| {
            Ok(Some(MemoryItem::ToolCall(ToolCall {
                tool_name: tool_name.clone(),
                arguments: arguments.resolve(data)?.unwrap_or_default(),
                tool_call_id: tool_call_id.clone(),
            })))
        });
        self
    }

    pub fn tool_call_result(
        mut self,
        tool_call_id: impl Into<String>,
        result: impl Into<Content<T>>,
    ) -> Self {
        let tool_call_id = tool_call_id.into();
        let result = result.into();
        self.items.push_one(move |data: &T| {
            Ok(Some(MemoryItem::ToolCallResult(ToolCallResult {
                tool_call_id: tool_call_id.clone(),
                result: result.resolve(data)?,
            })))
        });
        self
    }

    /// Splice in items computed from the data, e.g. a stored transcript.
    pub fn items_with(mut self, f: impl Fn(&T) -> Vec<MemoryItem> + 'static) -> Self {
        self.items.push(move |data: &T| Ok(f(data)));
        self
    }

    pub fn build(&self, data: &T) -> Result<Memory> {
        Ok(Memory {
            contents: self.items.resolve(data)?,
        })
    }
}
