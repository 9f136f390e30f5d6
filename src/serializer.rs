//! Serialization module for writing an endpoint inventory as JSON, YAML or Markdown.
//!
//! JSON and YAML carry the inventory structure unchanged. Markdown is a human-facing
//! rendering: an overview, a summary table and one section per endpoint, with
//! nested field trees flattened into dotted names.

use crate::field_expander::FieldNode;
use crate::inventory::Inventory;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Rendered for empty tables
const NONE_MARKER: &str = "(none)";
/// Rendered for values the source does not provide
const MISSING: &str = "TODO";

/// Serializes an inventory to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(inventory: &Inventory) -> Result<String> {
    debug!("Serializing inventory to YAML");
    serde_yaml::to_string(inventory).context("Failed to serialize inventory to YAML")
}

/// Serializes an inventory to JSON format with pretty printing.
///
/// Field order follows the inventory structure, so repeated runs over the same
/// sources produce byte-identical output.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use api_doc_from_source::inventory::InventoryBuilder;
/// use api_doc_from_source::serializer::serialize_json;
///
/// let inventory = InventoryBuilder::new("shop").build();
/// let json = serialize_json(&inventory).unwrap();
/// assert!(json.contains("\"service\": \"shop\""));
/// ```
pub fn serialize_json(inventory: &Inventory) -> Result<String> {
    debug!("Serializing inventory to JSON");
    serde_json::to_string_pretty(inventory).context("Failed to serialize inventory to JSON")
}

/// Renders an inventory as a Markdown document.
pub fn render_markdown(inventory: &Inventory) -> String {
    debug!("Rendering inventory as Markdown");
    let mut lines: Vec<String> = Vec::new();

    lines.push("# API Documentation".to_string());
    lines.push(String::new());
    lines.push("## Overview".to_string());
    lines.push(format!("- Service: {}", inventory.service));
    lines.push(format!("- Base URL: {}", or_missing(&inventory.base_url)));
    lines.push(format!("- Auth: {}", MISSING));
    lines.push(format!("- Contact: {}", MISSING));
    lines.push(String::new());

    lines.push("## Endpoints".to_string());
    lines.push("| Method | Path | Summary |".to_string());
    lines.push("|---|---|---|".to_string());
    for endpoint in &inventory.endpoints {
        lines.push(format!(
            "| {} | {} | {} |",
            endpoint.method,
            endpoint.path,
            escape_cell(&endpoint.summary)
        ));
    }

    lines.push(String::new());
    lines.push("## Endpoint Details".to_string());
    for endpoint in &inventory.endpoints {
        lines.push(String::new());
        lines.push(format!("### {} {}", endpoint.method, endpoint.path));
        lines.push(format!("- Summary: {}", endpoint.summary));
        lines.push(format!(
            "- Handler: {}#{}",
            endpoint.handler.class, endpoint.handler.method
        ));
        lines.push(format!("- Tags: {}", or_missing(&endpoint.tags.join(", "))));
        lines.push(format!("- Auth: {}", or_missing(&endpoint.auth)));
        lines.push(String::new());

        let request = &endpoint.request;
        lines.push("#### Request".to_string());
        lines.push("Path parameters:".to_string());
        lines.extend(field_table(&request.path_params));
        lines.push(String::new());
        lines.push("Query parameters:".to_string());
        lines.extend(field_table(&request.query_params));
        lines.push(String::new());
        lines.push("Headers:".to_string());
        lines.extend(field_table(&request.headers));
        lines.push(String::new());
        match &request.body {
            Some(body) => {
                lines.push(format!("Body (type: {}):", or_missing(&body.type_name)));
                lines.extend(field_table(&body.fields));
            }
            None => {
                lines.push("Body:".to_string());
                lines.push(NONE_MARKER.to_string());
            }
        }

        lines.push(String::new());
        lines.push("#### Response".to_string());
        if endpoint.responses.is_empty() {
            lines.push(NONE_MARKER.to_string());
        }
        for (status, response) in &endpoint.responses {
            lines.push(format!("Status: {}", status));
            lines.push(format!("Type: {}", or_missing(&response.type_name)));
            lines.extend(field_table(&response.fields));
        }
        lines.push(String::new());
    }

    let mut document = lines.join("\n").trim_end().to_string();
    document.push('\n');
    document
}

fn or_missing(value: &str) -> &str {
    if value.trim().is_empty() {
        MISSING
    } else {
        value
    }
}

/// Keep generic types and free text from breaking the table layout
fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

fn field_table(fields: &[FieldNode]) -> Vec<String> {
    if fields.is_empty() {
        return vec![NONE_MARKER.to_string()];
    }

    let mut rows = vec![
        "| Field | Type | Required | Description |".to_string(),
        "|---|---|---|---|".to_string(),
    ];
    flatten_rows(fields, "", &mut rows);
    rows
}

/// One row per node, depth-first, children named `parent.child`
fn flatten_rows(fields: &[FieldNode], prefix: &str, rows: &mut Vec<String>) {
    for field in fields {
        let name = if prefix.is_empty() {
            field.name.clone()
        } else {
            format!("{}.{}", prefix, field.name)
        };
        rows.push(format!(
            "| {} | {} | {} | {} |",
            name,
            escape_cell(&field.type_name),
            if field.required { "Y" } else { "N" },
            escape_cell(&field.description)
        ));
        flatten_rows(&field.children, &name, rows);
    }
}

/// Writes string content to a file.
///
/// Creates the file if it doesn't exist, or overwrites it if it does.
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written to.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
