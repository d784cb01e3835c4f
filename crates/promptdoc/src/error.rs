//! Error types returned by builders, the formatter, and the serialization
//! adapter.

use crate::document::SpecialKind;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T, E = PromptError> = std::result::Result<T, E>;

/// Boxed error produced by a fallible content callback.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Builder misuse detected while a document is being configured.
///
/// Cloneable so a builder can hand the same error back from every `build`
/// call after the misuse was recorded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `heading` was called twice on the same section builder.
    #[error("section heading set more than once")]
    HeadingAlreadySet,

    /// A second memory/tools/output-specs section was registered.
    #[error("a {0} section is already registered in this document")]
    DuplicateSpecialSection(SpecialKind),

    /// Literal fragments and keys do not interleave.
    #[error("template has {literals} literal fragments for {keys} keys (expected keys + 1)")]
    TemplateArity { literals: usize, keys: usize },

    /// `${` without a closing `}`.
    #[error("unterminated placeholder at byte {offset}")]
    UnterminatedPlaceholder { offset: usize },

    /// `${}` with nothing inside.
    #[error("empty placeholder at byte {offset}")]
    EmptyPlaceholder { offset: usize },
}

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum PromptError {
    /// Builder misuse.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A content callback failed while the document was being built.
    #[error("content callback failed: {0}")]
    Callback(#[source] BoxError),

    /// The formatter met a node where the tree invariants forbid one.
    #[error("cannot format {kind} node inside {parent}")]
    UnexpectedNode {
        kind: &'static str,
        parent: &'static str,
    },

    /// A schema description could not be compiled into a validator.
    #[error("invalid schema: {0}")]
    Schema(String),

    /// An instance failed schema validation.
    #[error("schema validation failed:\n{}", .0.join("\n"))]
    SchemaViolation(Vec<String>),

    /// A tree breaks a document-wide invariant.
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    #[error("failed to serialize query: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to deserialize query: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("invalid format config: {0}")]
    InvalidFormatConfig(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PromptError {
    /// Wrap a callback failure.
    pub fn callback(err: impl Into<BoxError>) -> Self {
        Self::Callback(err.into())
    }

    /// Whether this error is a recorded builder misuse.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_section_message_names_kind() {
        let err = PromptError::from(ConfigError::DuplicateSpecialSection(SpecialKind::Tools));
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "configuration error: a tools section is already registered in this document"
        );
    }

    #[test]
    fn callback_keeps_source() {
        let err = PromptError::callback("lookup failed");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "lookup failed");
    }

    #[test]
    fn schema_violation_lists_every_error() {
        let err = PromptError::SchemaViolation(vec!["  - /a: bad".into(), "  - /b: worse".into()]);
        assert_eq!(
            err.to_string(),
            "schema validation failed:\n  - /a: bad\n  - /b: worse"
        );
    }
}
