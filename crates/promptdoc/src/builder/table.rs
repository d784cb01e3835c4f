//! Builders for tables and their rows and cells.

use super::list::ListBuilder;
use super::pending::{self, Pending};
use crate::content::Content;
use crate::document::{CellContent, Paragraph, Table, TableCell, TableHeaderCell, TableRow};
use crate::error::Result;
use crate::template::TemplateData;

fn header_cell<T: TemplateData>(content: &Content<T>, data: &T) -> Result<Option<TableHeaderCell>> {
    Ok(content.resolve(data)?.map(|text| TableHeaderCell {
        contents: Paragraph::new(text),
    }))
}

/// Deferred builder for a [`Table`].
///
/// ```
/// use promptdoc::builder::TableBuilder;
/// use serde_json::json;
///
/// let table = TableBuilder::new()
///     .column_headers(["Name", "Role"])
///     .row(|r| r.cell("Ada").cell("Engineer"))
///     .build(&json!({}))
///     .unwrap();
/// assert_eq!(table.rows[0].cells.len(), 2);
/// ```
pub struct TableBuilder<T> {
    column_headers: Option<Pending<T, TableHeaderCell>>,
    rows: Pending<T, TableRow>,
}

impl<T: TemplateData + 'static> Default for TableBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> TableBuilder<T> {
    pub fn new() -> Self {
        Self {
            column_headers: None,
            rows: Pending::new(),
        }
    }

    /// Append one column header.
    pub fn column_header(mut self, content: impl Into<Content<T>>) -> Self {
        let content = content.into();
        self.column_headers
            .get_or_insert_with(Pending::new)
            .push_one(move |data: &T| header_cell(&content, data));
        self
    }

    /// Append several column headers in order.
    pub fn column_headers<I>(self, headers: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Content<T>>,
    {
        headers
            .into_iter()
            .fold(self, |table, header| table.column_header(header))
    }

    /// Append a row. Returning `None` from `f` omits it.
    pub fn row<R>(mut self, f: impl FnOnce(RowBuilder<T>) -> R) -> Self
    where
        R: Into<Option<RowBuilder<T>>>,
    {
        if let Some(row) = f(RowBuilder::new()).into() {
            self.rows.push_one(move |data: &T| row.build(data).map(Some));
        }
        self
    }

    /// Append one row per element, each configured by `f` on a fresh row
    /// builder.
    pub fn rows<I, F>(self, iter: I, mut f: F) -> Self
    where
        I: IntoIterator,
        F: FnMut(RowBuilder<T>, I::Item, usize) -> RowBuilder<T>,
    {
        iter.into_iter()
            .enumerate()
            .fold(self, |table, (index, element)| {
                table.row(|r| f(r, element, index))
            })
    }

    pub fn build(&self, data: &T) -> Result<Table> {
        let column_headers = match &self.column_headers {
            Some(headers) => Some(headers.resolve(data)?),
            None => None,
        };
        Ok(Table {
            column_headers,
            rows: self.rows.resolve(data)?,
        })
    }
}

/// Deferred builder for a [`TableRow`].
///
/// A second [`header`](Self::header) call replaces the first.
pub struct RowBuilder<T> {
    header: Option<Content<T>>,
    cells: Pending<T, TableCell>,
}

impl<T: TemplateData + 'static> RowBuilder<T> {
    fn new() -> Self {
        Self {
            header: None,
            cells: Pending::new(),
        }
    }

    /// Set the row header cell.
    pub fn header(mut self, content: impl Into<Content<T>>) -> Self {
        self.header = Some(content.into());
        self
    }

    /// Append a cell holding a single paragraph.
    pub fn cell(mut self, content: impl Into<Content<T>>) -> Self {
        let para = pending::paragraph(content.into(), CellContent::Paragraph);
        self.cells.push_one(move |data: &T| {
            Ok(para(data)?.map(|p| TableCell { contents: vec![p] }))
        });
        self
    }

    /// Append a cell with compound contents. Returning `None` from `f`
    /// omits it.
    pub fn cell_with<R>(mut self, f: impl FnOnce(CellBuilder<T>) -> R) -> Self
    where
        R: Into<Option<CellBuilder<T>>>,
    {
        if let Some(cell) = f(CellBuilder::new()).into() {
            self.cells.push_one(move |data: &T| cell.build(data).map(Some));
        }
        self
    }

    pub fn build(&self, data: &T) -> Result<TableRow> {
        let row_header = match &self.header {
            Some(content) => header_cell(content, data)?,
            None => None,
        };
        Ok(TableRow {
            row_header,
            cells: self.cells.resolve(data)?,
        })
    }
}

/// Deferred builder for a [`TableCell`]: paragraphs, lists, and nested
/// tables.
pub struct CellBuilder<T> {
    contents: Pending<T, CellContent>,
}

impl<T: TemplateData + 'static> CellBuilder<T> {
    fn new() -> Self {
        Self {
            contents: Pending::new(),
        }
    }

    pub fn paragraph(mut self, content: impl Into<Content<T>>) -> Self {
        self.contents
            .push_one(pending::paragraph(content.into(), CellContent::Paragraph));
        self
    }

    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        if let Some(list) = f(ListBuilder::new()).into() {
            self.contents
                .push_one(move |data: &T| Ok(Some(CellContent::List(list.build(data)?))));
        }
        self
    }

    pub fn table<R>(mut self, f: impl FnOnce(TableBuilder<T>) -> R) -> Self
    where
        R: Into<Option<TableBuilder<T>>>,
    {
        if let Some(table) = f(TableBuilder::new()).into() {
            self.contents
                .push_one(move |data: &T| Ok(Some(CellContent::Table(table.build(data)?))));
        }
        self
    }

    pub fn build(&self, data: &T) -> Result<TableCell> {
        Ok(TableCell {
            contents: self.contents.resolve(data)?,
        })
    }
}
