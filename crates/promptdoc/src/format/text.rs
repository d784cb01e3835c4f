//! Plain-text formatter rendering queries as Markdown-flavoured prompts.

use super::config::FormatConfig;
use crate::document::{Block, CellContent, List, ListItemContent, Section, SpecialKind, Table};
use crate::error::{PromptError, Result};
use crate::memory::{Memory, MemoryItem};
use crate::query::{Output, Query};
use tracing::{debug, trace};

/// Renders a [`Query`] as markdown-like text.
///
/// Sections become `#` headings, lists become indented bullet lines, tables
/// become `<table>` markup. The memory, tools, and output-specs sections
/// additionally render the query's memory log, tool list, and output
/// schema.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
    config: FormatConfig,
}

impl TextFormatter {
    pub fn new(config: FormatConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    pub fn format(&self, query: &Query) -> Result<String> {
        let text = self.blocks(&query.prompt.contents, 0, query)?;
        debug!(
            blocks = query.prompt.contents.len(),
            bytes = text.len(),
            "formatted query"
        );
        Ok(text)
    }

    fn blocks(&self, blocks: &[Block], level: usize, query: &Query) -> Result<String> {
        let mut fragments = Vec::with_capacity(blocks.len());
        for block in blocks {
            fragments.push(self.block(block, level, query)?);
        }
        Ok(join_fragments(fragments))
    }

    fn block(&self, block: &Block, level: usize, query: &Query) -> Result<String> {
        trace!(kind = block.kind(), level, "formatting block");
        match block {
            Block::Paragraph(p) => Ok(p.content.clone()),
            Block::List(list) => Ok(self.list(list, 0)),
            Block::Table(table) => Ok(self.table(table)),
            Block::Section(section) => self.section(section, level, query),
        }
    }

    fn list(&self, list: &List, depth: usize) -> String {
        let indent = self.config.indent.repeat(depth);
        let lines: Vec<String> = list
            .items
            .iter()
            .map(|item| match &item.content {
                ListItemContent::Paragraph(p) => {
                    format!("{indent}{}{}", self.config.list_item_prefix, p.content)
                }
                ListItemContent::List(sublist) => self.list(sublist, depth + 1),
            })
            .filter(|line| !line.is_empty())
            .collect();
        lines.join("\n")
    }

    fn table(&self, table: &Table) -> String {
        let mut lines = vec!["<table>".to_string()];
        if let Some(headers) = table.column_headers.as_ref().filter(|h| !h.is_empty()) {
            let cells: String = headers
                .iter()
                .map(|h| format!("<th>{}</th>", h.contents.content))
                .collect();
            lines.push(format!("<tr>{cells}</tr>"));
        }
        for row in &table.rows {
            let mut line = String::from("<tr>");
            if let Some(header) = &row.row_header {
                line.push_str(&format!("<th>{}</th>", header.contents.content));
            }
            for cell in &row.cells {
                let contents: Vec<String> = cell
                    .contents
                    .iter()
                    .map(|content| match content {
                        CellContent::Paragraph(p) => p.content.clone(),
                        CellContent::List(list) => self.list(list, 0),
                        CellContent::Table(inner) => self.table(inner),
                    })
                    .collect();
                line.push_str(&format!("<td>{}</td>", contents.join("\n")));
            }
            line.push_str("</tr>");
            lines.push(line);
        }
        lines.push("</table>".to_string());
        lines.join("\n")
    }

    fn section(&self, section: &Section, level: usize, query: &Query) -> Result<String> {
        let Some(kind) = section.special else {
            return self.headed(section, level, query);
        };

        if let Some(nested) = section
            .contents
            .iter()
            .find(|b| matches!(b, Block::Section(_)))
        {
            return Err(PromptError::UnexpectedNode {
                kind: nested.kind(),
                parent: special_parent(kind),
            });
        }

        let extra = match kind {
            SpecialKind::Memory => {
                if self.config.exclude_memory {
                    trace!("memory section excluded");
                    return Ok(String::new());
                }
                query
                    .memory
                    .as_ref()
                    .filter(|m| !m.is_empty())
                    .map(|m| self.memory_log(m))
            }
            SpecialKind::Tools => {
                let tools = query.tools.as_ref().filter(|t| !t.is_empty());
                let Some(tools) = tools.filter(|_| !self.config.exclude_tools) else {
                    trace!("tools section omitted");
                    return Ok(String::new());
                };
                let listing =
                    serde_json::to_string_pretty(tools).map_err(PromptError::Serialize)?;
                Some(with_intro(&self.config.tools_intro, listing))
            }
            SpecialKind::OutputSpecs => {
                if self.config.exclude_output_schema {
                    trace!("output specs section excluded");
                    return Ok(String::new());
                }
                match &query.output {
                    Output::Text => None,
                    Output::Json { schema, .. } => {
                        let description = serde_json::to_string_pretty(schema.describe())
                            .map_err(PromptError::Serialize)?;
                        Some(with_intro(&self.config.output_schema_intro, description))
                    }
                }
            }
        };

        let head = self.headed(section, level, query)?;
        Ok(join_fragments([Some(head), extra].into_iter().flatten()))
    }

    /// Heading plus body, shared by ordinary and special sections.
    fn headed(&self, section: &Section, level: usize, query: &Query) -> Result<String> {
        let heading = section
            .heading
            .as_ref()
            .map(|h| format!("{} {h}", "#".repeat(level + 1)));
        let body = self.blocks(&section.contents, level + 1, query)?;
        Ok(join_fragments(heading.into_iter().chain(Some(body))))
    }

    fn memory_log(&self, memory: &Memory) -> String {
        let lines = memory.contents.iter().map(|item| match item {
            MemoryItem::Utterance(u) => {
                let tag = u.role.tag();
                match &u.name {
                    Some(name) => format!("<{tag} name=\"{name}\">{}</{tag}>", u.contents),
                    None => format!("<{tag}>{}</{tag}>", u.contents),
                }
            }
            MemoryItem::ToolCall(call) => format!(
                "<tool_call id=\"{}\" name=\"{}\">{}</tool_call>",
                call.tool_call_id, call.tool_name, call.arguments
            ),
            MemoryItem::ToolCallResult(result) => format!(
                "<tool_call_result id=\"{}\">{}</tool_call_result>",
                result.tool_call_id,
                result.result.as_deref().unwrap_or("null")
            ),
        });
        let log: Vec<String> = lines.collect();
        with_intro(&self.config.memory_intro, log.join("\n"))
    }
}

fn special_parent(kind: SpecialKind) -> &'static str {
    match kind {
        SpecialKind::Memory => "memory section",
        SpecialKind::Tools => "tools section",
        SpecialKind::OutputSpecs => "output specs section",
    }
}

fn with_intro(intro: &str, body: String) -> String {
    if intro.is_empty() {
        body
    } else {
        format!("{intro}\n{body}")
    }
}

/// Join sibling fragments with a blank line, skipping blank ones.
fn join_fragments(fragments: impl IntoIterator<Item = String>) -> String {
    fragments
        .into_iter()
        .filter(|f| !f.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
