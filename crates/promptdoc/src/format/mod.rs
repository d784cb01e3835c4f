//! Rendering a built [`Query`] to text.
//!
//! [`TextFormatter`] walks the prompt tree top to bottom. [`FormatConfig`]
//! controls indentation, list prefixes, introduction lines, and whether the
//! memory, tools, and output-specs sections are rendered at all.

mod config;
mod text;

pub use config::FormatConfig;
pub use text::TextFormatter;

use crate::error::Result;
use crate::query::Query;

/// Format `query` with the default configuration.
pub fn format_query(query: &Query) -> Result<String> {
    TextFormatter::default().format(query)
}

/// Format `query` with `config`.
pub fn format_query_with(query: &Query, config: &FormatConfig) -> Result<String> {
    TextFormatter::new(config.clone()).format(query)
}
