//! Support-agent prompt example: describe once, build per ticket.
//!
//! Demonstrates:
//! - Templates and closures as content
//! - Conditional branches that omit themselves by returning `None`
//! - Tool parameters and JSON output derived from `JsonSchema` types
//! - Formatting with a custom `FormatConfig` and JSON serialization
//!
//! # Usage
//!
//! ```bash
//! cargo run --example support_prompt
//! ```

use promptdoc::prelude::*;
use schemars::JsonSchema;
use serde_json::{Value, json};

// ── Typed schemas ───────────────────────────────────────────────────

/// Arguments for the `lookup_order` tool.
#[allow(dead_code)]
#[derive(JsonSchema)]
struct LookupOrderArgs {
    /// Order identifier, e.g. `A-1042`.
    order_id: String,
}

/// The reply the model must produce.
#[allow(dead_code)]
#[derive(JsonSchema)]
struct Reply {
    /// Message shown to the customer.
    message: String,
    /// Hand the ticket to a human.
    escalate: bool,
}

fn describe(escalation: bool) -> Result<QueryBuilder<Value>> {
    let customer = Template::parse("${customer}")?;
    let subject = Template::parse("${subject}")?;
    let builder = QueryBuilder::new()
        .paragraph(Template::parse("You answer support tickets for ${company}.")?)
        .section(|s| {
            s.heading("Ticket").table(|t| {
                t.row(|r| r.header("Customer").cell(customer))
                    .row(|r| r.header("Subject").cell(subject))
            })
        })
        .section(|s| {
            s.heading("Rules").list(|l| {
                l.item("Never promise refunds.")
                    .item("Look up orders before answering questions about them.")
                    .items_with(
                        |d: &Value| d["extra_rules"].as_array().cloned().unwrap_or_default(),
                        |l, rule, _| l.item(rule.as_str().unwrap_or_default().to_string()),
                    )
            })
        })
        .section(|s| {
            escalation.then(|| {
                s.heading("Escalation")
                    .paragraph("Set `escalate` when the customer asks for a manager.")
            })
        })
        .tools_section(|s| s.heading("Tools"))
        .memory_section(|s| s.heading("Conversation"))
        .output_specs_section(|s| s.heading("Reply format"))
        .tool(Tool::for_type::<LookupOrderArgs>(
            "lookup_order",
            "Fetch shipping status for an order",
        )?)
        .memory(|m| {
            m.items_with(|d: &Value| {
                d["history"]
                    .as_array()
                    .into_iter()
                    .flatten()
                    .filter_map(|turn| {
                        let role = turn["role"].as_str()?;
                        let text = turn["text"].as_str()?;
                        Some(MemoryItem::utterance(role, text))
                    })
                    .collect()
            })
        })
        .output_json_named(Schema::for_type::<Reply>()?, "reply");
    Ok(builder)
}

fn main() -> Result<()> {
    let builder = describe(true)?;

    let ticket = json!({
        "company": "Acme",
        "customer": "Ada",
        "subject": "Late parcel",
        "extra_rules": ["Apologize once."],
        "history": [
            {"role": "user", "text": "My parcel A-1042 is late."},
            {"role": "assistant", "text": "Let me check that for you."}
        ]
    });
    let query = builder.build(&ticket)?;

    println!("{}", format_query(&query)?);
    println!("\n──────── compact, no schema ────────\n");
    let config = FormatConfig::default()
        .with_indent("    ")
        .with_exclude_output_schema(true);
    println!("{}", format_query_with(&query, &config)?);

    println!("\n──────── serialized ────────\n");
    println!("{}", serialize_query_pretty(&query)?);

    let plain = describe(false)?.build(&ticket)?;
    println!("\n──────── without escalation ────────\n");
    println!("{}", format_query(&plain)?);

    let reply = query.parse_json_output(r#"{"message": "It ships tomorrow.", "escalate": false}"#)?;
    println!("\nvalid reply: {reply}");
    Ok(())
}
