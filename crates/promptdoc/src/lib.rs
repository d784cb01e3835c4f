//! Deferred builders and text formatting for structured LLM prompts.
//!
//! `promptdoc` separates *describing* a prompt from *filling it in*. You
//! chain builder calls once to describe the document (paragraphs, lists,
//! tables, nested sections, plus the conversation memory, tool registry,
//! and expected output kind), then call `build(&data)` as often as you like
//! with different parameter data. Each build yields an immutable
//! [`Query`] that can be rendered to text or serialized to JSON.
//!
//! # Getting started
//!
//! ```
//! use promptdoc::builder::QueryBuilder;
//! use promptdoc::format::format_query;
//! use promptdoc::Template;
//! use serde_json::json;
//!
//! let builder = QueryBuilder::new()
//!     .paragraph(Template::parse("You are helping ${customer}.").unwrap())
//!     .section(|s| {
//!         s.heading("Rules")
//!             .list(|l| l.item("Be polite").item("Never guess order numbers"))
//!     })
//!     .memory_section(|s| s.heading("Conversation"))
//!     .memory(|m| m.user("Where is my parcel?"));
//!
//! let query = builder.build(&json!({"customer": "Ada"})).unwrap();
//! let text = format_query(&query).unwrap();
//! assert!(text.starts_with("You are helping Ada.\n\n# Rules\n\n- Be polite"));
//! assert!(text.ends_with("<user>Where is my parcel?</user>"));
//! ```
//!
//! # Where to find things
//!
//! If you're looking for how to...
//!
//! - **Describe a document:** start from [`QueryBuilder`](builder::QueryBuilder)
//!   or [`PromptBuilder`](builder::PromptBuilder). Content arguments accept a
//!   plain string, a [`Template`], or a closure over the data via [`Content`].
//!
//! - **Add conversation history:** [`QueryBuilder::memory`](builder::QueryBuilder::memory)
//!   hands you a [`MemoryBuilder`](builder::MemoryBuilder). Place it in the
//!   document with `memory_section`.
//!
//! - **Offer tools or request JSON:** register [`Tool`]s with
//!   [`QueryBuilder::tool`](builder::QueryBuilder::tool) and pick the output
//!   kind with [`QueryBuilder::output_json`](builder::QueryBuilder::output_json).
//!   Parameters and output are described by [`Schema`], which can be derived
//!   from any `schemars::JsonSchema` type.
//!
//! - **Render text:** [`format::format_query`] or a configured
//!   [`TextFormatter`](format::TextFormatter). [`FormatConfig`](format::FormatConfig)
//!   can be loaded from TOML.
//!
//! - **Store or ship a query:** [`serialize_query`] and [`deserialize_query`].
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`builder`] | Deferred prompt, section, list, table, memory, and query builders |
//! | [`document`] | Immutable prompt tree |
//! | [`memory`] | Conversation log items |
//! | [`query`] | [`Query`], [`Output`], [`Tool`], [`ToolRegistry`] |
//! | [`format`] | Text formatter and its configuration |
//! | [`schema`] | JSON Schema collaborator for output and tool parameters |
//! | [`template`] | `${key}` templates and the [`TemplateData`] trait |
//! | [`serialize`] | JSON interchange for queries |

pub mod builder;
pub mod content;
pub mod document;
pub mod error;
pub mod format;
pub mod memory;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod serialize;
pub mod template;

pub use content::Content;
pub use document::{
    Block, CellContent, List, ListItem, ListItemContent, Paragraph, Prompt, Section, SpecialKind,
    Table, TableCell, TableHeaderCell, TableRow,
};
pub use error::{BoxError, ConfigError, PromptError, Result};
pub use memory::{Memory, MemoryItem, Role, ToolCall, ToolCallResult, Utterance};
pub use query::{DEFAULT_SCHEMA_NAME, Output, Query, Tool, ToolRegistry};
pub use schema::Schema;
pub use serialize::{deserialize_query, serialize_query, serialize_query_pretty};
pub use template::{Template, TemplateData};

// Re-export schemars for downstream crates.
pub use schemars;
