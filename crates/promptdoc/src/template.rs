//! Literal-with-placeholders templates.
//!
//! A [`Template`] is `n + 1` literal fragments interleaved with `n` data
//! keys. Rendering looks each key up in the build data through
//! [`TemplateData`]; a missing key renders as an empty string.

use crate::error::{ConfigError, Result};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::BuildHasher;
use std::str::FromStr;

/// Field access used by templates.
pub trait TemplateData {
    /// Text for `key`, or `None` when the data has no such field.
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

fn json_text(value: &serde_json::Value) -> Cow<'_, str> {
    match value {
        serde_json::Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}

impl TemplateData for serde_json::Value {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.as_object()?.get(key).map(json_text)
    }
}

impl TemplateData for serde_json::Map<String, serde_json::Value> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(json_text)
    }
}

impl<V: Display, S: BuildHasher> TemplateData for HashMap<String, V, S> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Owned(v.to_string()))
    }
}

impl<V: Display> TemplateData for BTreeMap<String, V> {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(|v| Cow::Owned(v.to_string()))
    }
}

impl TemplateData for () {
    fn field(&self, _key: &str) -> Option<Cow<'_, str>> {
        None
    }
}

/// A compiled template.
///
/// ```
/// use promptdoc::Template;
/// use serde_json::json;
///
/// let greet: Template = "Hello, ${name}!".parse().unwrap();
/// assert_eq!(greet.render(&json!({"name": "World"})), "Hello, World!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    literals: Vec<String>,
    keys: Vec<String>,
}

impl Template {
    /// Build a template from its literal fragments and keys.
    ///
    /// `literals.len()` must be `keys.len() + 1`.
    pub fn compile<L: AsRef<str>, K: AsRef<str>>(literals: &[L], keys: &[K]) -> Result<Self> {
        if literals.len() != keys.len() + 1 {
            return Err(ConfigError::TemplateArity {
                literals: literals.len(),
                keys: keys.len(),
            }
            .into());
        }
        Ok(Self {
            literals: literals.iter().map(|l| l.as_ref().to_string()).collect(),
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
        })
    }

    /// A template with no placeholders.
    pub fn literal(text: impl Into<String>) -> Self {
        Self {
            literals: vec![text.into()],
            keys: Vec::new(),
        }
    }

    /// Parse `${key}` placeholder syntax.
    pub fn parse(source: &str) -> Result<Self> {
        let mut literals = Vec::new();
        let mut keys = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("${") {
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                return Err(ConfigError::UnterminatedPlaceholder {
                    offset: offset + start,
                }
                .into());
            };
            let key = after[..end].trim();
            if key.is_empty() {
                return Err(ConfigError::EmptyPlaceholder {
                    offset: offset + start,
                }
                .into());
            }
            literals.push(rest[..start].to_string());
            keys.push(key.to_string());
            let consumed = start + 2 + end + 1;
            offset += consumed;
            rest = &rest[consumed..];
        }
        literals.push(rest.to_string());

        Ok(Self { literals, keys })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Substitute every key from `data`.
    pub fn render<D: TemplateData + ?Sized>(&self, data: &D) -> String {
        let mut out = String::with_capacity(self.literals.iter().map(String::len).sum());
        for (i, literal) in self.literals.iter().enumerate() {
            out.push_str(literal);
            if let Some(key) = self.keys.get(i)
                && let Some(value) = data.field(key)
            {
                out.push_str(&value);
            }
        }
        out
    }
}

impl FromStr for Template {
    type Err = crate::error::PromptError;

    fn from_str(s: &str) -> Result<Self> {
        Template::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compile_interleaves_literals_and_keys() {
        let t = Template::compile(&["Hello, ", "!"], &["name"]).unwrap();
        assert_eq!(t.render(&json!({"name": "World"})), "Hello, World!");
    }

    #[test]
    fn compile_rejects_mismatched_arity() {
        let err = Template::compile(&["a", "b"], &["x", "y"]).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn missing_key_renders_empty() {
        let t = Template::parse("[${missing}]").unwrap();
        assert_eq!(t.render(&json!({})), "[]");
        assert_eq!(t.render(&()), "[]");
    }

    #[test]
    fn rendering_is_repeatable() {
        let t = Template::parse("${a}-${b}-${a}").unwrap();
        let data = json!({"a": 1, "b": "two"});
        let first = t.render(&data);
        assert_eq!(first, "1-two-1");
        assert_eq!(t.render(&data), first);
    }

    #[test]
    fn parse_without_placeholders_is_literal() {
        let t = Template::parse("plain $ text {}").unwrap();
        assert!(t.keys().is_empty());
        assert_eq!(t, Template::literal("plain $ text {}"));
    }

    #[test]
    fn parse_reports_unterminated_placeholder() {
        let err = Template::parse("ok ${name").unwrap_err();
        assert!(err.to_string().contains("byte 3"));
    }

    #[test]
    fn parse_rejects_empty_placeholder() {
        assert!(Template::parse("${ }").is_err());
    }

    #[test]
    fn hash_map_data() {
        let mut data = HashMap::new();
        data.insert("count".to_string(), 3);
        let t: Template = "count=${count}".parse().unwrap();
        assert_eq!(t.render(&data), "count=3");
    }
}
