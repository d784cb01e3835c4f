//! Text inputs accepted by the builders.

use crate::error::{BoxError, PromptError, Result};
use crate::template::{Template, TemplateData};

type ContentFn<T> = Box<dyn Fn(&T) -> Result<Option<String>, BoxError>>;

/// Source of a piece of text, resolved against the build data.
///
/// Either a [`Template`] (plain strings convert into a literal template) or
/// a function of the data. Function content may resolve to `None`, which
/// drops the node it would have produced.
pub enum Content<T> {
    Template(Template),
    Function(ContentFn<T>),
}

impl<T> Content<T> {
    /// Text computed from the data.
    pub fn from_fn(f: impl Fn(&T) -> String + 'static) -> Self {
        Content::Function(Box::new(move |data| Ok(Some(f(data)))))
    }

    /// Text computed from the data; `None` omits the node.
    pub fn from_opt_fn(f: impl Fn(&T) -> Option<String> + 'static) -> Self {
        Content::Function(Box::new(move |data| Ok(f(data))))
    }

    /// Text computed by a callback that may fail. The error surfaces from
    /// `build` as [`PromptError::Callback`].
    pub fn try_from_fn<E>(f: impl Fn(&T) -> Result<String, E> + 'static) -> Self
    where
        E: Into<BoxError>,
    {
        Content::Function(Box::new(move |data| f(data).map(Some).map_err(Into::into)))
    }
}

impl<T: TemplateData> Content<T> {
    pub(crate) fn resolve(&self, data: &T) -> Result<Option<String>> {
        match self {
            Content::Template(template) => Ok(Some(template.render(data))),
            Content::Function(f) => f(data).map_err(PromptError::Callback),
        }
    }
}

impl<T> From<Template> for Content<T> {
    fn from(template: Template) -> Self {
        Content::Template(template)
    }
}

impl<T> From<&str> for Content<T> {
    fn from(text: &str) -> Self {
        Content::Template(Template::literal(text))
    }
}

impl<T> From<String> for Content<T> {
    fn from(text: String) -> Self {
        Content::Template(Template::literal(text))
    }
}

impl<T> std::fmt::Debug for Content<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Content::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Content::Function(_) => f.write_str("Function(..)"),
        }
    }
}
