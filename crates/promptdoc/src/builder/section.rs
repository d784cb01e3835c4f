//! Section, special-section, and prompt-root builders.

use super::list::ListBuilder;
use super::pending::{self, Document, Pending};
use super::table::TableBuilder;
use crate::content::Content;
use crate::document::{Block, Prompt, Section, SpecialKind};
use crate::error::{ConfigError, Result};
use crate::template::TemplateData;
use tracing::debug;

/// Heading slot plus block log shared by ordinary and special sections.
struct Body<T> {
    document: Document,
    heading: Option<Content<T>>,
    contents: Pending<T, Block>,
}

impl<T: TemplateData + 'static> Body<T> {
    fn new(document: Document) -> Self {
        Self {
            document,
            heading: None,
            contents: Pending::new(),
        }
    }

    fn heading(&mut self, content: Content<T>) {
        if self.heading.is_some() {
            self.document.fail(ConfigError::HeadingAlreadySet);
        } else {
            self.heading = Some(content);
        }
    }

    fn paragraph(&mut self, content: Content<T>) {
        self.contents
            .push_one(pending::paragraph(content, Block::Paragraph));
    }

    fn list<R>(&mut self, f: impl FnOnce(ListBuilder<T>) -> R)
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        if let Some(list) = f(ListBuilder::new()).into() {
            self.contents
                .push_one(move |data: &T| Ok(Some(Block::List(list.build(data)?))));
        }
    }

    fn table<R>(&mut self, f: impl FnOnce(TableBuilder<T>) -> R)
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        if let Some(table) = f(TableBuilder::new()).into() {
            self.contents
                .push_one(move |data: &T| Ok(Some(Block::Table(table.build(data)?))));
        }
    }

    fn section<R>(&mut self, f: impl FnOnce(SectionBuilder<T>) -> R)
    where
        R: Into<Option<SectionBuilder<T>>>,
    {
        if let Some(section) = f(SectionBuilder::new()).into() {
            self.document.absorb(&section.body.document);
            self.contents
                .push_one(move |data: &T| Ok(Some(Block::Section(section.build(data)?))));
        }
    }

    /// Register and record a special section. The slot is only claimed when
    /// `f` keeps the branch.
    fn special<R>(&mut self, kind: SpecialKind, f: impl FnOnce(SpecialSectionBuilder<T>) -> R)
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        let child = SpecialSectionBuilder {
            kind,
            body: Body::new(Document::default()),
        };
        if let Some(section) = f(child).into() {
            self.document.absorb(&section.body.document);
            self.document.register(section.kind);
            self.contents
                .push_one(move |data: &T| Ok(Some(Block::Section(section.build(data)?))));
        }
    }

    fn build(&self, data: &T, special: Option<SpecialKind>) -> Result<Section> {
        self.document.check()?;
        let heading = match &self.heading {
            Some(content) => content.resolve(data)?,
            None => None,
        };
        Ok(Section {
            heading,
            contents: self.contents.resolve(data)?,
            special,
        })
    }
}

/// Deferred builder for an ordinary [`Section`].
///
/// Each builder keeps a registry of the special sections beneath it. A
/// parent merges a child's registry when the child branch is kept, so the
/// memory, tools, and output-specs sections can each appear only once per
/// document, however deeply they are nested. Misuse is recorded where it
/// happens and returned by `build`.
pub struct SectionBuilder<T> {
    body: Body<T>,
}

impl<T: TemplateData + 'static> Default for SectionBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> SectionBuilder<T> {
    /// A section with its own registry. Passing it to a parent's `section`
    /// merges that registry into the parent's.
    pub fn new() -> Self {
        Self {
            body: Body::new(Document::default()),
        }
    }

    /// Set the heading. A section takes at most one heading; a second call
    /// is a configuration error.
    pub fn heading(mut self, content: impl Into<Content<T>>) -> Self {
        self.body.heading(content.into());
        self
    }

    pub fn paragraph(mut self, content: impl Into<Content<T>>) -> Self {
        self.body.paragraph(content.into());
        self
    }

    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        self.body.list(f);
        self
    }

    pub fn table<R>(mut self, f: impl FnOnce(TableBuilder<T>) -> R) -> Self
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        self.body.table(f);
        self
    }

    /// Nest a section one level deeper. Returning `None` from `f` omits it.
    pub fn section<R>(mut self, f: impl FnOnce(SectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SectionBuilder<T>>>,
    {
        self.body.section(f);
        self
    }

    /// Add the document's memory section.
    pub fn memory_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::Memory, f);
        self
    }

    /// Add the document's tools section.
    pub fn tools_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::Tools, f);
        self
    }

    /// Add the document's output-specs section.
    pub fn output_specs_section<R>(
        mut self,
        f: impl FnOnce(SpecialSectionBuilder<T>) -> R,
    ) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::OutputSpecs, f);
        self
    }

    pub fn build(&self, data: &T) -> Result<Section> {
        self.body.build(data, None)
    }
}

/// Builder for a memory, tools, or output-specs section.
///
/// Only headings, paragraphs, lists, and tables are available: a special
/// section never holds a nested section.
pub struct SpecialSectionBuilder<T> {
    kind: SpecialKind,
    body: Body<T>,
}

impl<T: TemplateData + 'static> SpecialSectionBuilder<T> {
    pub fn kind(&self) -> SpecialKind {
        self.kind
    }

    /// Set the heading. A second call is a configuration error.
    pub fn heading(mut self, content: impl Into<Content<T>>) -> Self {
        self.body.heading(content.into());
        self
    }

    pub fn paragraph(mut self, content: impl Into<Content<T>>) -> Self {
        self.body.paragraph(content.into());
        self
    }

    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        self.body.list(f);
        self
    }

    pub fn table<R>(mut self, f: impl FnOnce(TableBuilder<T>) -> R) -> Self
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        self.body.table(f);
        self
    }

    pub fn build(&self, data: &T) -> Result<Section> {
        self.body.build(data, Some(self.kind))
    }
}

/// Deferred builder for a [`Prompt`], the document root.
///
/// ```
/// use promptdoc::builder::PromptBuilder;
/// use promptdoc::Template;
/// use serde_json::json;
///
/// let prompt = PromptBuilder::new()
///     .paragraph(Template::parse("Hello, ${name}!").unwrap())
///     .section(|s| s.heading("Rules").list(|l| l.item("Be brief")))
///     .build(&json!({"name": "World"}))
///     .unwrap();
/// assert_eq!(prompt.contents.len(), 2);
/// ```
pub struct PromptBuilder<T> {
    body: Body<T>,
}

impl<T: TemplateData + 'static> Default for PromptBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> PromptBuilder<T> {
    pub fn new() -> Self {
        Self {
            body: Body::new(Document::default()),
        }
    }

    pub fn paragraph(mut self, content: impl Into<Content<T>>) -> Self {
        self.body.paragraph(content.into());
        self
    }

    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        self.body.list(f);
        self
    }

    pub fn table<R>(mut self, f: impl FnOnce(TableBuilder<T>) -> R) -> Self
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        self.body.table(f);
        self
    }

    pub fn section<R>(mut self, f: impl FnOnce(SectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SectionBuilder<T>>>,
    {
        self.body.section(f);
        self
    }

    pub fn memory_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::Memory, f);
        self
    }

    pub fn tools_section<R>(mut self, f: impl FnOnce(SpecialSectionBuilder<T>) -> R) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::Tools, f);
        self
    }

    pub fn output_specs_section<R>(
        mut self,
        f: impl FnOnce(SpecialSectionBuilder<T>) -> R,
    ) -> Self
    where
        R: Into<Option<SpecialSectionBuilder<T>>>,
    {
        self.body.special(SpecialKind::OutputSpecs, f);
        self
    }

    /// Resolve every pending operation against `data`. The finished tree is
    /// checked with [`Prompt::validate`], the same rule applied to
    /// deserialized queries.
    pub fn build(&self, data: &T) -> Result<Prompt> {
        let root = self.body.build(data, None)?;
        let prompt = Prompt {
            contents: root.contents,
        };
        prompt.validate()?;
        debug!(
            operations = self.body.contents.len(),
            blocks = prompt.contents.len(),
            "built prompt"
        );
        Ok(prompt)
    }
}
