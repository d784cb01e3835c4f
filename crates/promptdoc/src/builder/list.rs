//! List builder with conditional and data-driven items.

use super::pending::Pending;
use crate::content::Content;
use crate::document::{List, ListItem, ListItemContent};
use crate::error::Result;
use crate::template::TemplateData;

/// Deferred builder for a [`List`].
///
/// ```
/// use promptdoc::builder::ListBuilder;
/// use serde_json::json;
///
/// let list = ListBuilder::new()
///     .item("A")
///     .item("B")
///     .list(|sub| sub.item("C"))
///     .build(&json!({}))
///     .unwrap();
/// assert_eq!(list.items.len(), 3);
/// ```
pub struct ListBuilder<T> {
    items: Pending<T, ListItem>,
}

impl<T: TemplateData + 'static> Default for ListBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TemplateData + 'static> ListBuilder<T> {
    pub fn new() -> Self {
        Self {
            items: Pending::new(),
        }
    }

    /// Append a text item.
    pub fn item(mut self, content: impl Into<Content<T>>) -> Self {
        let content = content.into();
        self.items.push_one(move |data: &T| {
            Ok(content.resolve(data)?.map(ListItem::text))
        });
        self
    }

    /// Append a nested list as a single item. Returning `None` from `f`
    /// omits it.
    pub fn list<R>(mut self, f: impl FnOnce(ListBuilder<T>) -> R) -> Self
    where
        R: Into<Option<ListBuilder<T>>>,
    {
        if let Some(sub) = f(ListBuilder::new()).into() {
            self.items
                .push_one(move |data: &T| Ok(Some(ListItem::sublist(sub.build(data)?))));
        }
        self
    }

    /// Thread one child builder through `f` for each element and splice the
    /// child's items in at this position.
    pub fn items<I, F>(mut self, iter: I, mut f: F) -> Self
    where
        I: IntoIterator,
        F: FnMut(ListBuilder<T>, I::Item, usize) -> ListBuilder<T>,
    {
        let child = iter
            .into_iter()
            .enumerate()
            .fold(ListBuilder::new(), |child, (index, element)| {
                f(child, element, index)
            });
        self.items.push(move |data: &T| child.collect_items(data));
        self
    }

    /// Like [`items`](Self::items), with the elements selected from the
    /// build data.
    pub fn items_with<E, I, S, F>(mut self, select: S, f: F) -> Self
    where
        S: Fn(&T) -> I + 'static,
        I: IntoIterator<Item = E>,
        F: Fn(ListBuilder<T>, E, usize) -> ListBuilder<T> + 'static,
    {
        self.items.push(move |data: &T| {
            select(data)
                .into_iter()
                .enumerate()
                .fold(ListBuilder::new(), |child, (index, element)| {
                    f(child, element, index)
                })
                .collect_items(data)
        });
        self
    }

    fn collect_items(&self, data: &T) -> Result<Vec<ListItem>> {
        self.items.resolve(data)
    }

    pub fn build(&self, data: &T) -> Result<List> {
        Ok(List {
            items: self.collect_items(data)?,
        })
    }
}

/// Text of every top-level item, for assertions.
#[cfg(test)]
pub(crate) fn item_texts(list: &List) -> Vec<String> {
    list.items
        .iter()
        .map(|item| match &item.content {
            ListItemContent::Paragraph(p) => p.content.clone(),
            ListItemContent::List(sub) => format!("[{}]", item_texts(sub).join(", ")),
        })
        .collect()
}
