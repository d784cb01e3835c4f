//! Integration tests for the build → format → serialize pipeline.
//!
//! A realistic support-agent query is described once, built with several
//! data sets, rendered, and pushed through the JSON interchange.

use promptdoc::builder::QueryBuilder;
use promptdoc::format::{FormatConfig, TextFormatter, format_query};
use promptdoc::{
    Content, MemoryItem, Output, Role, Schema, Template, Tool, deserialize_query,
    serialize_query,
};
use schemars::JsonSchema;
use serde_json::{Value, json};

#[allow(dead_code)]
#[derive(JsonSchema)]
struct LookupOrder {
    order_id: String,
}

#[allow(dead_code)]
#[derive(JsonSchema)]
struct Reply {
    message: String,
    escalate: bool,
}

fn support_query() -> QueryBuilder<Value> {
    QueryBuilder::new()
        .paragraph(Template::parse("You are a support agent for ${company}.").unwrap())
        .section(|s| {
            s.heading("Customer")
                .table(|t| {
                    t.column_headers(["Field", "Value"])
                        .row(|r| r.header("Name").cell(Template::parse("${name}").unwrap()))
                        .row(|r| {
                            r.header("Tier")
                                .cell(Content::from_fn(|d: &Value| {
                                    d["tier"].as_str().unwrap_or("standard").to_string()
                                }))
                        })
                })
                .section(|inner| {
                    inner.heading("Open orders").list(|l| {
                        l.items_with(
                            |d: &Value| {
                                d["orders"]
                                    .as_array()
                                    .cloned()
                                    .unwrap_or_default()
                            },
                            |l, order, _| l.item(order.as_str().unwrap_or_default().to_string()),
                        )
                    })
                })
        })
        .tools_section(|s| s.heading("Tools"))
        .memory_section(|s| s.heading("Conversation"))
        .output_specs_section(|s| s.heading("Answer format"))
        .tool(Tool::for_type::<LookupOrder>("lookup_order", "Fetch an order by id").unwrap())
        .memory(|m| {
            m.system("Be concise.")
                .user(Template::parse("Hi, I'm ${name}.").unwrap())
                .tool_call("lookup_order", r#"{"order_id":"A1"}"#, "call_1")
                .tool_call_result("call_1", "shipped")
        })
        .output_json(Schema::for_type::<Reply>().unwrap())
}

fn data() -> Value {
    json!({
        "company": "Acme",
        "name": "Ada",
        "tier": "gold",
        "orders": ["A1", "B2"]
    })
}

#[test]
fn renders_every_part_of_the_query() {
    let query = support_query().build(&data()).unwrap();
    let text = format_query(&query).unwrap();

    assert!(text.starts_with("You are a support agent for Acme.\n\n# Customer\n\n<table>"));
    assert!(text.contains("<tr><th>Tier</th><td>gold</td></tr>"));
    assert!(text.contains("## Open orders\n\n- A1\n- B2"));
    assert!(text.contains("# Tools\n\nYou can call the following tools:\n["));
    assert!(text.contains("\"name\": \"lookup_order\""));
    assert!(text.contains("<user>Hi, I'm Ada.</user>"));
    assert!(text.contains("<tool_call_result id=\"call_1\">shipped</tool_call_result>"));
    assert!(text.contains("# Answer format\n\nRespond with JSON matching this schema:\n{"));
}

#[test]
fn exclusions_remove_sections_entirely() {
    let query = support_query().build(&data()).unwrap();
    let config = FormatConfig::default()
        .with_exclude_memory(true)
        .with_exclude_tools(true)
        .with_exclude_output_schema(true);
    let text = TextFormatter::new(config.clone()).format(&query).unwrap();

    assert!(!text.contains("# Conversation"));
    assert!(!text.contains(&config.memory_intro));
    assert!(!text.contains("Be concise."));
    assert!(!text.contains("call_1"));
    assert!(!text.contains("# Tools"));
    assert!(!text.contains("# Answer format"));
    assert!(text.contains("## Open orders"));
}

#[test]
fn round_trip_preserves_prompt_memory_and_output() {
    let query = support_query().build(&data()).unwrap();
    let back = deserialize_query(&serialize_query(&query).unwrap()).unwrap();

    assert_eq!(back.prompt, query.prompt);
    assert_eq!(back.memory, query.memory);
    assert!(back.output.is_json());
    assert_eq!(back.output.schema_name(), query.output.schema_name());
    assert_eq!(back.tool("lookup_order"), query.tool("lookup_order"));
    assert_eq!(format_query(&back).unwrap(), format_query(&query).unwrap());
}

#[test]
fn same_builder_serves_different_data() {
    let builder = support_query();
    let first = builder.build(&data()).unwrap();
    let second = builder
        .build(&json!({"company": "Globex", "name": "Hank", "orders": []}))
        .unwrap();

    let text = format_query(&second).unwrap();
    assert!(text.contains("for Globex."));
    assert!(text.contains("<td>standard</td>"));
    assert!(!text.contains("## Open orders\n\n- "));
    assert_eq!(
        second.memory.as_ref().unwrap().contents[1],
        MemoryItem::utterance(Role::User, "Hi, I'm Hank.")
    );
    assert_eq!(builder.build(&data()).unwrap(), first);
}

#[test]
fn model_reply_is_checked_against_output_schema() {
    let query = support_query().build(&data()).unwrap();
    let reply = query
        .parse_json_output(r#"{"message": "It shipped.", "escalate": false}"#)
        .unwrap();
    assert_eq!(reply["message"], "It shipped.");
    assert!(query.parse_json_output(r#"{"message": 1}"#).is_err());
    assert!(matches!(
        QueryBuilder::<Value>::new()
            .build(&json!({}))
            .unwrap()
            .output,
        Output::Text
    ));
}
