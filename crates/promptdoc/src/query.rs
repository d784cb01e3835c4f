//! The complete, immutable input for one model call.

use crate::document::Prompt;
use crate::error::{PromptError, Result};
use crate::memory::Memory;
use crate::schema::Schema;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Schema name used when JSON output is requested without one.
pub const DEFAULT_SCHEMA_NAME: &str = "response";

/// Expected response kind.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Output {
    #[default]
    Text,
    Json {
        #[serde(rename = "schemaName")]
        schema_name: String,
        schema: Schema,
    },
}

impl Output {
    pub fn json(schema: Schema) -> Self {
        Output::Json {
            schema_name: DEFAULT_SCHEMA_NAME.to_string(),
            schema,
        }
    }

    pub fn is_json(&self) -> bool {
        matches!(self, Output::Json { .. })
    }

    pub fn schema_name(&self) -> Option<&str> {
        match self {
            Output::Text => None,
            Output::Json { schema_name, .. } => Some(schema_name),
        }
    }
}

/// An external capability the model may invoke.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub parameters: Schema,
}

impl Tool {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Schema) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Tool whose parameters are described by a `schemars::JsonSchema` type.
    pub fn for_type<A: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(name, description, Schema::for_type::<A>()?))
    }
}

/// Ordered set of tools, unique by name.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct ToolRegistry {
    tools: Vec<Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool, replacing any tool with the same name in place.
    pub fn register(&mut self, tool: Tool) {
        if let Some(existing) = self.tools.iter_mut().find(|t| t.name == tool.name) {
            *existing = tool;
        } else {
            self.tools.push(tool);
        }
    }

    pub fn with(mut self, tool: Tool) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<Tool> for ToolRegistry {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), ToolRegistry::with)
    }
}

impl<'a> IntoIterator for &'a ToolRegistry {
    type Item = &'a Tool;
    type IntoIter = std::slice::Iter<'a, Tool>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A prompt plus optional memory and tools, and the expected output kind.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Query {
    pub prompt: Prompt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<Memory>,
    pub output: Output,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolRegistry>,
}

impl Query {
    /// Parse a model response and check it against the JSON output schema.
    pub fn parse_json_output(&self, response: &str) -> Result<serde_json::Value> {
        let Output::Json {
            schema,
            schema_name,
        } = &self.output
        else {
            return Err(PromptError::Schema(
                "query does not request JSON output".to_string(),
            ));
        };
        let value: serde_json::Value = serde_json::from_str(response)
            .map_err(|e| PromptError::SchemaViolation(vec![format!("  - not JSON: {e}")]))?;
        schema.validate(&value)?;
        trace!("response matches schema '{schema_name}'");
        Ok(value)
    }

    /// Look up a registered tool by name.
    pub fn tool(&self, name: &str) -> Option<&Tool> {
        self.tools.as_ref()?.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn answer_schema() -> Schema {
        Schema::from_description(json!({
            "type": "object",
            "properties": {"answer": {"type": "string"}},
            "required": ["answer"]
        }))
        .unwrap()
    }

    #[test]
    fn output_kind_is_tagged() {
        assert_eq!(serde_json::to_value(Output::Text).unwrap(), json!({"kind": "text"}));
        let json = serde_json::to_value(Output::json(answer_schema())).unwrap();
        assert_eq!(json["kind"], "json");
        assert_eq!(json["schemaName"], DEFAULT_SCHEMA_NAME);
        assert_eq!(json["schema"]["required"][0], "answer");
    }

    #[test]
    fn registry_replaces_same_name() {
        let schema = answer_schema();
        let registry: ToolRegistry = [
            Tool::new("search", "v1", schema.clone()),
            Tool::new("fetch", "get", schema.clone()),
            Tool::new("search", "v2", schema),
        ]
        .into_iter()
        .collect();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("search").unwrap().description, "v2");
        let names: Vec<&str> = registry.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["search", "fetch"]);
    }

    #[test]
    fn parse_json_output_validates() {
        let query = Query {
            output: Output::json(answer_schema()),
            ..Default::default()
        };
        assert_eq!(
            query.parse_json_output(r#"{"answer": "42"}"#).unwrap()["answer"],
            "42"
        );
        assert!(matches!(
            query.parse_json_output(r#"{"answer": 42}"#),
            Err(PromptError::SchemaViolation(_))
        ));
        assert!(query.parse_json_output("not json").is_err());
    }

    #[test]
    fn parse_json_output_requires_json_kind() {
        let query = Query::default();
        assert!(matches!(
            query.parse_json_output("{}"),
            Err(PromptError::Schema(_))
        ));
    }
}
