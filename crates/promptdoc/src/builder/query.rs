//! Query builder tying the prompt to memory, tools, and output.

use super::list::ListBuilder;
use super::memory::MemoryBuilder;
use super::section::{PromptBuilder, SectionBuilder, SpecialSectionBuilder};
use super::table::TableBuilder;
use crate::content::Content;
use crate::error::Result;
use crate::query::{Output, Query, Tool, ToolRegistry};
use crate::schema::Schema;
use crate::template::TemplateData;
use tracing::debug;

/// Top-level builder assembling a [`Query`].
///
/// Prompt content is added directly on the query builder. Memory, tools,
/// and the output kind can be configured in any order; switching the output
/// kind keeps everything configured so far.
///
/// ```
/// use promptdoc::builder::QueryBuilder;
/// use serde_json::json;
///
/// let query = QueryBuilder::new()
///     .paragraph("You are a support agent.")
///     .memory_section(|s| s.heading("Conversation"))
///     .memory(|m| m.user("My order is late."))
///     .build(&json!({}))
///     .unwrap();
/// assert_eq!(query.memory.unwrap().len(), 1);
/// ```
pub struct QueryBuilder<T> {
    prompt: PromptBuilder<T>,
    memory: Option<MemoryBuilder<T>>,
    tools: Option<ToolRegistry>,
    output: Output,
}

impl<T: TemplateData + 'static> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> QueryBuilder<T> {
    pub fn new() -> Self {
        Self {
            prompt: PromptBuilder::new(),
            memory: None,
            tools: None,
            output: Output::Text,
        }
    }

    pub fn paragraph(mut self, content: impl Into<Content<T>>) -> Self {
        self.prompt = self.prompt.paragraph(content);
        self
    }

    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        self.prompt = self.prompt.list(f);
        self
    }

    pub fn table<R>(mut self, f: impl FnOnce(TableBuilder<T>) -> R) -> Self
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        self.prompt = self.prompt.table(f);
        self
    }

    pub fn section<R>(mut self, f: impl FnOnce(SectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SectionBuilder<T>>>,
    {
        self.prompt = self.prompt.section(f);
        self
    }

    pub fn memory_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.prompt = self.prompt.memory_section(f);
        self
    }

    pub fn tools_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.prompt = self.prompt.tools_section(f);
        self
    }

    pub fn output_specs_section<R>(
        mut self,
        f: impl FnOnce(SpecialSectionBuilder<T>) -> R,
    ) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.prompt = self.prompt.output_specs_section(f);
        self
    }

    /// Configure the conversation memory. Repeated calls keep adding to the
    /// same log; returning `None` clears it.
    pub fn memory<R>(mut self, f: impl FnOnce(MemoryBuilder<T>) -> R) -> Self
    where
        R: Into<Option<MemoryBuilder<T>>>,
    {
        let current = self.memory.take().unwrap_or_default();
        self.memory = f(current).into();
        self
    }

    /// Register one tool.
    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.get_or_insert_with(ToolRegistry::new).register(tool);
        self
    }

    /// Register every tool of `registry`.
    pub fn tools(self, registry: ToolRegistry) -> Self {
        registry.iter().cloned().fold(self, QueryBuilder::tool)
    }

    /// Request plain-text output (the default).
    pub fn output_text(mut self) -> Self {
        self.output = Output::Text;
        self
    }

    /// Request JSON output matching `schema` under the default schema name.
    pub fn output_json(mut self, schema: Schema) -> Self {
        self.output = Output::json(schema);
        self
    }

    /// Request JSON output matching `schema` under `name`.
    pub fn output_json_named(mut self, schema: Schema, name: impl Into<String>) -> Self {
        self.output = Output::Json {
            schema_name: name.into(),
            schema,
        };
        self
    }

    pub fn build(&self, data: &T) -> Result<Query> {
        let prompt = self.prompt.build(data)?;
        let memory = match &self.memory {
            Some(memory) => Some(memory.build(data)?),
            None => None,
        };
        debug!(
            blocks = prompt.contents.len(),
            memory_items = memory.as_ref().map_or(0, |m| m.len()),
            tools = self.tools.as_ref().map_or(0, ToolRegistry::len),
            json_output = self.output.is_json(),
            "built query"
        );
        Ok(Query {
            prompt,
            memory,
            output: self.output.clone(),
            tools: self.tools.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SpecialKind;
    use crate::error::{ConfigError, PromptError};
    use crate::query::DEFAULT_SCHEMA_NAME;
    use serde_json::{Value, json};

    fn schema() -> Schema {
        Schema::from_description(json!({"type": "object"})).unwrap()
    }

    #[test]
    fn defaults_to_text_without_memory_or_tools() {
        let query = QueryBuilder::<Value>::new()
            .paragraph("hi")
            .build(&json!({}))
            .unwrap();
        assert_eq!(query.output, Output::Text);
        assert!(query.memory.is_none());
        assert!(query.tools.is_none());
    }

    #[test]
    fn switching_output_keeps_prompt_and_memory() {
        let query = QueryBuilder::<Value>::new()
            .paragraph("before")
            .memory(|m| m.user("u"))
            .output_json(schema())
            .paragraph("after")
            .memory(|m| m.assistant("a"))
            .build(&json!({}))
            .unwrap();
        assert_eq!(query.prompt.contents.len(), 2);
        assert_eq!(query.memory.as_ref().map(|m| m.len()), Some(2));
        assert_eq!(query.output.schema_name(), Some(DEFAULT_SCHEMA_NAME));
    }

    #[test]
    fn named_json_output_then_back_to_text() {
        let builder = QueryBuilder::<Value>::new().output_json_named(schema(), "verdict");
        assert_eq!(
            builder.build(&json!({})).unwrap().output.schema_name(),
            Some("verdict")
        );
        let query = builder.output_text().build(&json!({})).unwrap();
        assert_eq!(query.output, Output::Text);
    }

    #[test]
    fn memory_none_clears_log() {
        let query = QueryBuilder::<Value>::new()
            .memory(|m| m.user("x"))
            .memory(|_| None::<MemoryBuilder<Value>>)
            .build(&json!({}))
            .unwrap();
        assert!(query.memory.is_none());
    }

    #[test]
    fn two_tools_sections_produce_no_query() {
        let result = QueryBuilder::<Value>::new()
            .tools_section(|s| s.heading("Tools"))
            .tools_section(|s| s.heading("More tools"))
            .build(&json!({}));
        assert!(matches!(
            result,
            Err(PromptError::Config(ConfigError::DuplicateSpecialSection(
                SpecialKind::Tools
            )))
        ));
    }

    #[test]
    fn tools_accumulate_and_merge_registries() {
        let query = QueryBuilder::<Value>::new()
            .tool(Tool::new("a", "first", schema()))
            .tools(ToolRegistry::new().with(Tool::new("b", "second", schema())))
            .build(&json!({}))
            .unwrap();
        assert!(query.tool("a").is_some());
        assert!(query.tool("b").is_some());
        assert_eq!(query.tools.unwrap().len(), 2);
    }

    fn failing() -> Content<Value> {
        Content::try_from_fn(|_: &Value| Err::<String, _>("lookup failed"))
    }

    fn assert_callback_error(builder: QueryBuilder<Value>) {
        let err = builder.build(&json!({})).unwrap_err();
        assert!(matches!(err, PromptError::Callback(_)));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "lookup failed");
    }

    #[test]
    fn failing_callback_surfaces_from_nested_content() {
        assert_callback_error(
            QueryBuilder::new().section(|s| {
                s.heading("Outer")
                    .section(|inner| inner.list(|l| l.item("ok").list(|sub| sub.item(failing()))))
            }),
        );
        assert_callback_error(
            QueryBuilder::new().table(|t| t.row(|r| r.header("Status").cell(failing()))),
        );
        assert_callback_error(
            QueryBuilder::new().memory_section(|s| s.heading("History").paragraph(failing())),
        );
        assert_callback_error(QueryBuilder::new().memory(|m| m.user("hi").user(failing())));
    }

    #[test]
    fn builder_is_reusable_with_new_data() {
        let builder = QueryBuilder::new()
            .paragraph(Content::from_fn(|d: &Value| format!("n={}", d["n"])))
            .memory(|m| m.user(Content::from_fn(|d: &Value| d["n"].to_string())));
        let one = builder.build(&json!({"n": 1})).unwrap();
        let two = builder.build(&json!({"n": 2})).unwrap();
        assert_ne!(one, two);
        assert_eq!(builder.build(&json!({"n": 1})).unwrap(), one);
    }
}
