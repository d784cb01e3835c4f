//! Schema collaborator for JSON output and tool parameters.
//!
//! A [`Schema`] is opaque to the rest of the crate: it can be described as a
//! portable JSON Schema value, rebuilt from one, and asked to validate an
//! instance. Rebuilding compiles a validator straight from the description
//! with `jsonschema`; nothing is generated or evaluated.

use crate::error::{PromptError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// A validated-structure description plus its compiled validator.
#[derive(Clone)]
pub struct Schema {
    description: serde_json::Value,
    validator: Arc<jsonschema::Validator>,
}

impl Schema {
    /// Rebuild a schema from its interchange description.
    pub fn from_description(description: serde_json::Value) -> Result<Self> {
        let validator = jsonschema::validator_for(&description)
            .map_err(|e| PromptError::Schema(e.to_string()))?;
        Ok(Self {
            description,
            validator: Arc::new(validator),
        })
    }

    /// Derive a schema from a type implementing `schemars::JsonSchema`.
    ///
    /// ```
    /// use promptdoc::Schema;
    /// use schemars::JsonSchema;
    ///
    /// #[derive(JsonSchema)]
    /// struct Verdict {
    ///     approved: bool,
    ///     reason: String,
    /// }
    ///
    /// let schema = Schema::for_type::<Verdict>().unwrap();
    /// assert_eq!(schema.describe()["type"], "object");
    /// ```
    pub fn for_type<T: JsonSchema>() -> Result<Self> {
        let schema = schemars::schema_for!(T);
        let description =
            serde_json::to_value(schema).map_err(|e| PromptError::Schema(e.to_string()))?;
        Self::from_description(description)
    }

    /// The portable interchange description.
    pub fn describe(&self) -> &serde_json::Value {
        &self.description
    }

    /// Validate `instance`, collecting every violation.
    pub fn validate(&self, instance: &serde_json::Value) -> Result<()> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(instance)
            .map(|e| format!("  - {}: {e}", e.instance_path()))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PromptError::SchemaViolation(errors))
        }
    }

    pub fn is_valid(&self, instance: &serde_json::Value) -> bool {
        self.validator.is_valid(instance)
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("description", &self.description)
            .finish()
    }
}

impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.description.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let description = serde_json::Value::deserialize(deserializer)?;
        Schema::from_description(description).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct SearchArgs {
        query: String,
        limit: Option<u32>,
    }

    #[test]
    fn derived_schema_requires_fields() {
        let schema = Schema::for_type::<SearchArgs>().unwrap();
        assert!(schema.is_valid(&json!({"query": "rust"})));
        assert!(!schema.is_valid(&json!({"limit": 3})));
    }

    #[test]
    fn validate_reports_instance_path() {
        let schema = Schema::from_description(json!({
            "type": "object",
            "properties": {"count": {"type": "integer"}}
        }))
        .unwrap();
        let err = schema.validate(&json!({"count": "three"})).unwrap_err();
        assert!(err.to_string().contains("/count"));
    }

    #[test]
    fn invalid_description_is_rejected() {
        let err = Schema::from_description(json!({"type": 42})).unwrap_err();
        assert!(matches!(err, PromptError::Schema(_)));
    }

    #[test]
    fn serializes_as_description() {
        let description = json!({"type": "string"});
        let schema = Schema::from_description(description.clone()).unwrap();
        assert_eq!(serde_json::to_value(&schema).unwrap(), description);
        let back: Schema = serde_json::from_value(description).unwrap();
        assert_eq!(back, schema);
    }
}
