//! Endpoint extraction from indexed route containers.
//!
//! This module provides the shared endpoint model and the [`RouteExtractor`] trait.
//! Each framework has its own extractor that knows which annotations declare routes
//! and how handler parameters bind to the request.
//!
//! # Supported Frameworks
//!
//! - **Spring MVC / Spring Web**: See [`spring::SpringExtractor`]
//!
//! # Example
//!
//! ```no_run
//! use api_doc_from_source::extractor::{RouteExtractor, spring::SpringExtractor};
//! use api_doc_from_source::parser::AstParser;
//! use api_doc_from_source::symbol_table::SymbolTable;
//! use std::collections::BTreeSet;
//! use std::path::Path;
//!
//! let root = Path::new(".");
//! let parsed = AstParser::parse_file(root, Path::new("src/UserController.java")).unwrap();
//! let table = SymbolTable::build(&[parsed], &BTreeSet::new());
//! let endpoints = SpringExtractor::new(5).extract_endpoints(&table);
//! println!("Found {} endpoints", endpoints.len());
//! ```

pub mod spring;

use crate::field_expander::FieldNode;
use crate::symbol_table::SymbolTable;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Key of the single placeholder entry in [`EndpointEntry::responses`]
pub const RESPONSE_PLACEHOLDER: &str = "TODO";

/// Trait for extracting endpoints from a built symbol table.
///
/// Implementations walk the table's route containers in order and emit one
/// [`EndpointEntry`] per (verb, path) pair a handler method declares.
pub trait RouteExtractor {
    fn extract_endpoints(&self, table: &SymbolTable) -> Vec<EndpointEntry>;
}

/// HTTP methods a handler can be bound to.
///
/// `Any` stands for a mapping that does not restrict the verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
    Trace,
    Any,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Any => "ANY",
        }
    }

    /// Parse a verb name, ignoring case and an optional `RequestMethod.` prefix
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_prefix("RequestMethod.").unwrap_or(name);
        let method = match name.to_ascii_uppercase().as_str() {
            "GET" => HttpMethod::Get,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "PATCH" => HttpMethod::Patch,
            "HEAD" => HttpMethod::Head,
            "OPTIONS" => HttpMethod::Options,
            "TRACE" => HttpMethod::Trace,
            "ANY" => HttpMethod::Any,
            _ => return None,
        };
        Some(method)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for HttpMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One (verb, path) pair exposed by a handler method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndpointEntry {
    pub method: HttpMethod,
    /// Class prefix joined with the method path, always starting with `/`
    pub path: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub auth: String,
    pub handler: Handler,
    pub request: RequestShape,
    pub responses: BTreeMap<String, BodyShape>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handler {
    /// Qualified name of the controller
    pub class: String,
    pub method: String,
}

/// Bindings of a handler's parameters to parts of the request.
///
/// Parameters are [`FieldNode`]s without children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestShape {
    pub path_params: Vec<FieldNode>,
    pub query_params: Vec<FieldNode>,
    pub headers: Vec<FieldNode>,
    pub body: Option<BodyShape>,
}

/// A declared type together with its expanded field tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyShape {
    #[serde(rename = "type")]
    pub type_name: String,
    pub fields: Vec<FieldNode>,
}

/// Join a class-level prefix with a method-level path.
///
/// Both parts are trimmed of `/`, the non-empty ones joined with a single `/`
/// and the result rooted at `/`. Two empty parts give `/`.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let parts: Vec<&str> = [prefix, path]
        .iter()
        .map(|part| part.trim().trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect();

    let mut joined = format!("/{}", parts.join("/"));
    while joined.contains("//") {
        joined = joined.replace("//", "/");
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/api", "/users/{id}"), "/api/users/{id}");
        assert_eq!(join_paths("api/", "users"), "/api/users");
        assert_eq!(join_paths("", ""), "/");
        assert_eq!(join_paths("/", "/"), "/");
        assert_eq!(join_paths("", "/health"), "/health");
        assert_eq!(join_paths("/api", ""), "/api");
        assert_eq!(join_paths("/api//v1/", "//items"), "/api/v1/items");
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!(HttpMethod::parse("GET"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("RequestMethod.POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("delete"), Some(HttpMethod::Delete));
        assert_eq!(HttpMethod::parse("FETCH"), None);
        assert_eq!(HttpMethod::Options.to_string(), "OPTIONS");
    }

    #[test]
    fn test_http_method_serializes_as_string() {
        let json = serde_json::to_string(&HttpMethod::Patch).unwrap();
        assert_eq!(json, "\"PATCH\"");
    }
}
