//! Immutable prompt tree.
//!
//! These values are produced by the builders in [`crate::builder`] and
//! consumed by the formatter in [`crate::format`]. Every node type derives
//! `Serialize`/`Deserialize`; node enums are internally tagged with a
//! `"type"` field.

use crate::error::{PromptError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A run of text.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub content: String,
}

impl Paragraph {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// An ordered list. Items hold text or a nested list, never a table.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct List {
    pub items: Vec<ListItem>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListItem {
    pub content: ListItemContent,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListItemContent {
    Paragraph(Paragraph),
    List(List),
}

impl ListItem {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: ListItemContent::Paragraph(Paragraph::new(content)),
        }
    }

    pub fn sublist(list: List) -> Self {
        Self {
            content: ListItemContent::List(list),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_headers: Option<Vec<TableHeaderCell>>,
    pub rows: Vec<TableRow>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_header: Option<TableHeaderCell>,
    pub cells: Vec<TableCell>,
}

/// A data cell. Cells may nest lists and tables.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TableCell {
    pub contents: Vec<CellContent>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CellContent {
    Paragraph(Paragraph),
    List(List),
    Table(Table),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TableHeaderCell {
    pub contents: Paragraph,
}

/// The three section kinds that carry out-of-tree material when formatted.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum SpecialKind {
    /// Renders the query's conversation history.
    Memory,
    /// Renders the query's tool registry.
    Tools,
    /// Renders the JSON output schema description.
    OutputSpecs,
}

impl SpecialKind {
    pub const ALL: [SpecialKind; 3] = [Self::Memory, Self::Tools, Self::OutputSpecs];
}

impl fmt::Display for SpecialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialKind::Memory => write!(f, "memory"),
            SpecialKind::Tools => write!(f, "tools"),
            SpecialKind::OutputSpecs => write!(f, "output specs"),
        }
    }
}

/// A possibly-headed group of blocks.
///
/// `special` marks the memory, tools, or output-specs section. A special
/// section never contains a nested section.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "SectionRepr", into = "SectionRepr")]
pub struct Section {
    pub heading: Option<String>,
    pub contents: Vec<Block>,
    pub special: Option<SpecialKind>,
}

impl Section {
    pub fn is_memory_section(&self) -> bool {
        self.special == Some(SpecialKind::Memory)
    }

    pub fn is_tools_section(&self) -> bool {
        self.special == Some(SpecialKind::Tools)
    }

    pub fn is_output_specs_section(&self) -> bool {
        self.special == Some(SpecialKind::OutputSpecs)
    }
}

/// Wire shape of a [`Section`]: one boolean per special kind.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SectionRepr {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    heading: Option<String>,
    contents: Vec<Block>,
    #[serde(default, skip_serializing_if = "is_false")]
    is_memory_section: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    is_tools_section: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    is_output_specs_section: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl TryFrom<SectionRepr> for Section {
    type Error = String;

    fn try_from(repr: SectionRepr) -> Result<Self, Self::Error> {
        let flags = [
            (repr.is_memory_section, SpecialKind::Memory),
            (repr.is_tools_section, SpecialKind::Tools),
            (repr.is_output_specs_section, SpecialKind::OutputSpecs),
        ];
        let mut set = flags.iter().filter(|(on, _)| *on).map(|(_, kind)| *kind);
        let special = set.next();
        if let Some(other) = set.next() {
            return Err(format!(
                "section is flagged as both {} and {other}",
                special.unwrap_or(other)
            ));
        }
        Ok(Section {
            heading: repr.heading,
            contents: repr.contents,
            special,
        })
    }
}

impl From<Section> for SectionRepr {
    fn from(section: Section) -> Self {
        SectionRepr {
            heading: section.heading,
            contents: section.contents,
            is_memory_section: section.special == Some(SpecialKind::Memory),
            is_tools_section: section.special == Some(SpecialKind::Tools),
            is_output_specs_section: section.special == Some(SpecialKind::OutputSpecs),
        }
    }
}

/// Anything that can sit in a prompt or section body.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Paragraph),
    List(List),
    Table(Table),
    Section(Section),
}

impl Block {
    /// Short node-kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Paragraph(_) => "paragraph",
            Block::List(_) => "list",
            Block::Table(_) => "table",
            Block::Section(_) => "section",
        }
    }
}

/// Document root.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Prompt {
    pub contents: Vec<Block>,
}

impl Prompt {
    /// Check the document-wide invariants: at most one section of each
    /// special kind, and no section nested inside a special section.
    pub fn validate(&self) -> Result<()> {
        let mut seen: Vec<SpecialKind> = Vec::new();
        check_blocks(&self.contents, &mut seen)
    }

    /// The section registered for `kind`, if any.
    pub fn special_section(&self, kind: SpecialKind) -> Option<&Section> {
        find_special(&self.contents, kind)
    }
}

fn check_blocks(blocks: &[Block], seen: &mut Vec<SpecialKind>) -> Result<()> {
    for block in blocks {
        let Block::Section(section) = block else {
            continue;
        };
        if let Some(kind) = section.special {
            if seen.contains(&kind) {
                return Err(PromptError::InvalidDocument(format!(
                    "more than one {kind} section"
                )));
            }
            seen.push(kind);
            if section.contents.iter().any(|b| matches!(b, Block::Section(_))) {
                return Err(PromptError::InvalidDocument(format!(
                    "{kind} section contains a nested section"
                )));
            }
        }
        check_blocks(&section.contents, seen)?;
    }
    Ok(())
}

fn find_special(blocks: &[Block], kind: SpecialKind) -> Option<&Section> {
    blocks.iter().find_map(|block| match block {
        Block::Section(s) if s.special == Some(kind) => Some(s),
        Block::Section(s) => find_special(&s.contents, kind),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn special(kind: SpecialKind, contents: Vec<Block>) -> Block {
        Block::Section(Section {
            heading: None,
            contents,
            special: Some(kind),
        })
    }

    #[test]
    fn section_serializes_flags_as_booleans() {
        let section = Section {
            heading: Some("History".into()),
            contents: vec![],
            special: Some(SpecialKind::Memory),
        };
        let json = serde_json::to_value(Block::Section(section)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "section",
                "heading": "History",
                "contents": [],
                "isMemorySection": true
            })
        );
    }

    #[test]
    fn section_with_two_flags_is_rejected() {
        let json = serde_json::json!({
            "contents": [],
            "isMemorySection": true,
            "isToolsSection": true
        });
        let err = serde_json::from_value::<Section>(json).unwrap_err();
        assert!(err.to_string().contains("both memory and tools"));
    }

    #[test]
    fn list_item_content_is_tagged() {
        let item = ListItem::text("A");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content": {"type": "paragraph", "content": "A"}})
        );
    }

    #[test]
    fn validate_rejects_duplicate_special_sections_anywhere() {
        let nested = Block::Section(Section {
            heading: Some("Outer".into()),
            contents: vec![special(SpecialKind::Tools, vec![])],
            special: None,
        });
        let prompt = Prompt {
            contents: vec![special(SpecialKind::Tools, vec![]), nested],
        };
        let err = prompt.validate().unwrap_err();
        assert!(err.to_string().contains("more than one tools section"));
    }

    #[test]
    fn validate_rejects_section_inside_special_section() {
        let prompt = Prompt {
            contents: vec![special(
                SpecialKind::Memory,
                vec![Block::Section(Section::default())],
            )],
        };
        assert!(prompt.validate().is_err());
    }

    #[test]
    fn validate_accepts_one_of_each_kind() {
        let prompt = Prompt {
            contents: SpecialKind::ALL
                .iter()
                .map(|k| special(*k, vec![Block::Paragraph(Paragraph::new("x"))]))
                .collect(),
        };
        assert!(prompt.validate().is_ok());
        assert!(prompt.special_section(SpecialKind::OutputSpecs).is_some());
    }
}
