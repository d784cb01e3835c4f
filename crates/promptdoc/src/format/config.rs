//! Formatter configuration.
//!
//! [`FormatConfig`] can be built in code with the `with_*` methods or read
//! from a TOML file. Every field is optional in TOML; missing fields take
//! their defaults.
//!
//! ```toml
//! indent = "    "
//! list_item_prefix = "* "
//! exclude_tools = true
//! ```

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Rendering options for the text formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Indentation unit repeated once per list depth. Default: two spaces.
    pub indent: String,
    /// Prefix for unordered list items. Default: `"- "`.
    pub list_item_prefix: String,
    /// Line placed before the memory log. Empty suppresses it.
    pub memory_intro: String,
    /// Line placed before the tool list.
    pub tools_intro: String,
    /// Line placed before the JSON output schema.
    pub output_schema_intro: String,
    /// Omit the memory section entirely.
    pub exclude_memory: bool,
    /// Omit the tools section entirely.
    pub exclude_tools: bool,
    /// Omit the output-specs section entirely.
    pub exclude_output_schema: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
            list_item_prefix: "- ".to_string(),
            memory_intro: "The conversation so far:".to_string(),
            tools_intro: "You can call the following tools:".to_string(),
            output_schema_intro: "Respond with JSON matching this schema:".to_string(),
            exclude_memory: false,
            exclude_tools: false,
            exclude_output_schema: false,
        }
    }
}

impl FormatConfig {
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_list_item_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.list_item_prefix = prefix.into();
        self
    }

    pub fn with_memory_intro(mut self, intro: impl Into<String>) -> Self {
        self.memory_intro = intro.into();
        self
    }

    pub fn with_tools_intro(mut self, intro: impl Into<String>) -> Self {
        self.tools_intro = intro.into();
        self
    }

    pub fn with_output_schema_intro(mut self, intro: impl Into<String>) -> Self {
        self.output_schema_intro = intro.into();
        self
    }

    pub fn with_exclude_memory(mut self, exclude: bool) -> Self {
        self.exclude_memory = exclude;
        self
    }

    pub fn with_exclude_tools(mut self, exclude: bool) -> Self {
        self.exclude_tools = exclude;
        self
    }

    pub fn with_exclude_output_schema(mut self, exclude: bool) -> Self {
        self.exclude_output_schema = exclude;
        self
    }

    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), "loaded format config");
        Ok(config)
    }
}
