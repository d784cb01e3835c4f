//! JSON interchange for built queries.
//!
//! Schemas are written as their JSON Schema descriptions and rebuilt from
//! them on the way back in. Deserialization checks the document-wide section
//! invariants as well as the shape, so a returned [`Query`] is always one a
//! builder could have produced.

use crate::error::{PromptError, Result};
use crate::query::Query;
use tracing::debug;

/// Serialize `query` to compact JSON.
pub fn serialize_query(query: &Query) -> Result<String> {
    serde_json::to_string(query).map_err(PromptError::Serialize)
}

/// Serialize `query` to indented JSON.
pub fn serialize_query_pretty(query: &Query) -> Result<String> {
    serde_json::to_string_pretty(query).map_err(PromptError::Serialize)
}

/// Parse and validate a serialized query.
pub fn deserialize_query(json: &str) -> Result<Query> {
    let query: Query = serde_json::from_str(json).map_err(PromptError::Deserialize)?;
    query.prompt.validate()?;
    debug!(
        blocks = query.prompt.contents.len(),
        memory_items = query.memory.as_ref().map_or(0, |m| m.len()),
        "deserialized query"
    );
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::QueryBuilder;
    use crate::query::Output;
    use crate::schema::Schema;
    use serde_json::{Value, json};

    #[test]
    fn prompt_only_query_has_two_keys() {
        let query = QueryBuilder::<Value>::new()
            .paragraph("hello")
            .build(&json!({}))
            .unwrap();
        let value: Value = serde_json::from_str(&serialize_query(&query).unwrap()).unwrap();
        let mut keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["output", "prompt"]);
        assert_eq!(value["output"], json!({"kind": "text"}));
    }

    #[test]
    fn wire_shape_uses_section_flags() {
        let query = QueryBuilder::<Value>::new()
            .memory_section(|s| s.heading("History"))
            .build(&json!({}))
            .unwrap();
        let value: Value = serde_json::from_str(&serialize_query(&query).unwrap()).unwrap();
        assert_eq!(
            value["prompt"]["contents"][0],
            json!({
                "type": "section",
                "heading": "History",
                "contents": [],
                "isMemorySection": true
            })
        );
    }

    #[test]
    fn schema_survives_round_trip() {
        let schema = Schema::from_description(json!({
            "type": "object",
            "properties": {"ok": {"type": "boolean"}},
            "required": ["ok"]
        }))
        .unwrap();
        let query = QueryBuilder::<Value>::new()
            .output_json_named(schema.clone(), "status")
            .build(&json!({}))
            .unwrap();
        let back = deserialize_query(&serialize_query_pretty(&query).unwrap()).unwrap();
        let Output::Json {
            schema_name,
            schema: rebuilt,
        } = &back.output
        else {
            panic!("expected json output");
        };
        assert_eq!(schema_name, "status");
        assert_eq!(rebuilt, &schema);
        assert!(rebuilt.is_valid(&json!({"ok": true})));
        assert!(!rebuilt.is_valid(&json!({"ok": "yes"})));
    }

    #[test]
    fn malformed_json_is_one_wrapped_error() {
        let err = deserialize_query(r#"{"prompt": {"contents": [{"type": "poem"}]}, "output": {"kind": "text"}}"#)
            .unwrap_err();
        assert!(matches!(err, PromptError::Deserialize(_)));
        assert!(deserialize_query("not json").is_err());
        assert!(deserialize_query(r#"{"output": {"kind": "text"}}"#).is_err());
    }

    #[test]
    fn section_with_two_flags_is_rejected() {
        let json = r#"{
            "prompt": {"contents": [{"type": "section", "contents": [],
                "isMemorySection": true, "isToolsSection": true}]},
            "output": {"kind": "text"}
        }"#;
        assert!(matches!(
            deserialize_query(json),
            Err(PromptError::Deserialize(_))
        ));
    }

    #[test]
    fn duplicate_special_sections_are_rejected() {
        let json = r#"{
            "prompt": {"contents": [
                {"type": "section", "contents": [], "isToolsSection": true},
                {"type": "section", "contents": [
                    {"type": "section", "contents": [], "isToolsSection": true}
                ]}
            ]},
            "output": {"kind": "text"}
        }"#;
        assert!(matches!(
            deserialize_query(json),
            Err(PromptError::InvalidDocument(_))
        ));
    }

    #[test]
    fn invalid_schema_description_is_rejected() {
        let json = r#"{
            "prompt": {"contents": []},
            "output": {"kind": "json", "schemaName": "x", "schema": {"type": 12}}
        }"#;
        assert!(matches!(
            deserialize_query(json),
            Err(PromptError::Deserialize(_))
        ));
    }
}
