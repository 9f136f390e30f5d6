//! Recursive expansion of a type into its field tree.
//!
//! Expansion is bounded two ways. A depth budget is spent on every step into a
//! field or through a wrapper type, and a path set holds the qualified names on
//! the current root-to-node path so that self-referential and mutually recursive
//! types are cut at the first repeat. The path set is copied on each descent, so
//! a type reachable through two sibling fields is expanded under both.

use crate::symbol_table::{ImportMap, SymbolTable};
use crate::type_resolver::{TypeExpr, TypeResolver};
use log::debug;
use serde::Serialize;
use std::collections::HashSet;

/// Leaf types: Java primitives, their boxes, strings, numbers, dates and `Object`
const SCALAR_TYPES: &[&str] = &[
    "byte", "short", "int", "long", "float", "double", "boolean", "char", "Byte", "Short",
    "Integer", "Long", "Float", "Double", "Boolean", "Character", "String", "BigDecimal",
    "BigInteger", "Date", "LocalDate", "LocalDateTime", "OffsetDateTime", "ZonedDateTime",
    "Instant", "UUID", "Object",
];

/// Containers whose element type (last argument) is expanded in their place
const COLLECTION_TYPES: &[&str] = &[
    "List", "Set", "Collection", "Iterable", "ArrayList", "LinkedList", "HashSet", "Page", "IPage",
];

const MAP_TYPES: &[&str] = &["Map", "HashMap", "LinkedHashMap"];

/// One field of an expanded type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldNode {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub required: bool,
    pub description: String,
    pub children: Vec<FieldNode>,
}

/// Package and imports of the file a type expression was written in
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'c> {
    pub package: &'c str,
    pub imports: &'c ImportMap,
}

pub struct FieldExpander<'a> {
    table: &'a SymbolTable,
    resolver: TypeResolver<'a>,
    max_depth: usize,
}

impl<'a> FieldExpander<'a> {
    pub fn new(table: &'a SymbolTable, max_depth: usize) -> Self {
        Self {
            table,
            resolver: TypeResolver::new(table),
            max_depth,
        }
    }

    /// Expand a root type expression with the full depth budget and an empty path
    pub fn expand_root(&self, type_expression: &str, ctx: TypeContext) -> Vec<FieldNode> {
        self.expand(type_expression, ctx, self.max_depth, &HashSet::new())
    }

    /// Expand `type_expression` as written in `ctx`.
    ///
    /// Returns an empty list for leaves: scalar types, enums, names that do not
    /// resolve to an indexed declaration, types already on `path`, and any type
    /// reached with no depth left.
    pub fn expand(
        &self,
        type_expression: &str,
        ctx: TypeContext,
        remaining_depth: usize,
        path: &HashSet<String>,
    ) -> Vec<FieldNode> {
        if remaining_depth == 0 {
            debug!("Depth budget exhausted at '{}'", type_expression);
            return Vec::new();
        }

        let expr = TypeExpr::parse(type_expression);
        let simple_name = expr.simple_name();

        if SCALAR_TYPES.contains(&simple_name) {
            return Vec::new();
        }

        if COLLECTION_TYPES.contains(&simple_name) || MAP_TYPES.contains(&simple_name) {
            if let Some(element) = expr.args.last() {
                return self.expand(element, ctx, remaining_depth - 1, path);
            }
        }

        let resolution = self.resolver.resolve(&expr.base, ctx.package, ctx.imports);
        let Some(qualified_name) = resolution.qualified_name() else {
            debug!("Leaving '{}' unexpanded: {:?}", expr.base, resolution);
            return Vec::new();
        };
        if path.contains(qualified_name) {
            debug!("Cycle through {} cut", qualified_name);
            return Vec::new();
        }
        let Some(declaration) = self.table.get(qualified_name) else {
            return Vec::new();
        };
        if declaration.is_enum {
            return Vec::new();
        }

        let mut child_path = path.clone();
        child_path.insert(qualified_name.to_string());

        let child_ctx = TypeContext {
            package: &declaration.package,
            imports: declaration.imports.as_ref(),
        };

        declaration
            .fields
            .iter()
            .map(|field| FieldNode {
                name: field.name.clone(),
                type_name: field.type_expression.clone(),
                required: field.required,
                description: field.description.clone(),
                children: self.expand(
                    &field.type_expression,
                    child_ctx,
                    remaining_depth - 1,
                    &child_path,
                ),
            })
            .collect()
    }
}
