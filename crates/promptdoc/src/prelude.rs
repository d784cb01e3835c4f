//! Convenience re-exports for common `promptdoc` types.
//!
//! Meant to be glob-imported when describing prompts:
//!
//! ```
//! use promptdoc::prelude::*;
//!
//! let prompt = PromptBuilder::<()>::new().paragraph("hi").build(&()).unwrap();
//! assert_eq!(format_query(&Query { prompt, ..Default::default() }).unwrap(), "hi");
//! ```
//!
//! Tree node types are left out; import those from [`crate::document`]
//! when you need to inspect a built prompt.

// ── Builders ────────────────────────────────────────────────────────
pub use crate::builder::{
    CellBuilder, ListBuilder, MemoryBuilder, PromptBuilder, QueryBuilder, RowBuilder,
    SectionBuilder, SpecialSectionBuilder, TableBuilder,
};

// ── Content and data ────────────────────────────────────────────────
pub use crate::content::Content;
pub use crate::template::{Template, TemplateData};

// ── Query model ─────────────────────────────────────────────────────
pub use crate::memory::{MemoryItem, Role};
pub use crate::query::{Output, Query, Tool, ToolRegistry};
pub use crate::schema::Schema;

// ── Rendering and interchange ───────────────────────────────────────
pub use crate::error::{PromptError, Result};
pub use crate::format::{FormatConfig, TextFormatter, format_query, format_query_with};
pub use crate::serialize::{deserialize_query, serialize_query, serialize_query_pretty};
