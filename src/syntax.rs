//! Language-level model of a parsed Java compilation unit.
//!
//! This is the boundary between the front end ([`crate::parser`]) and the extraction
//! engine: everything downstream works on these plain structures and never touches
//! the tree-sitter tree.

use crate::annotation::Annotation;
use std::collections::HashMap;

/// One parsed source file
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    /// Declared package, empty for the root package
    pub package: String,
    /// Import declarations in source order
    pub imports: Vec<ImportDecl>,
    /// Top-level type declarations in source order
    pub types: Vec<TypeDecl>,
}

/// A single `import` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Dotted path without the trailing `.*`
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Record,
    Enum,
    Interface,
}

/// A class, record, enum or interface declaration
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub kind: TypeDeclKind,
    pub annotations: Vec<Annotation>,
    /// Instance and static fields; record components are lowered to fields
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    /// Member types declared in the body
    pub nested: Vec<TypeDecl>,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub name: String,
    /// Rendered type, e.g. `List<Item>` or `String[]`
    pub type_name: String,
    pub annotations: Vec<Annotation>,
    pub is_static: bool,
    /// 1-based line of the first token that is not part of an annotation
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    /// Rendered return type, `void` for void methods
    pub return_type: String,
    pub parameters: Vec<ParamDecl>,
    pub annotations: Vec<Annotation>,
    /// 1-based line of the first token that is not part of an annotation
    pub line: usize,
}

#[derive(Debug, Clone)]
pub struct ParamDecl {
    pub name: String,
    pub type_name: String,
    pub annotations: Vec<Annotation>,
}

impl CompilationUnit {
    /// Simple name -> qualified name for single-type imports.
    ///
    /// Wildcard and static imports are not mapped.
    pub fn import_map(&self) -> HashMap<String, String> {
        self.imports
            .iter()
            .filter(|import| !import.is_wildcard && !import.is_static)
            .filter_map(|import| {
                let simple = import.path.rsplit('.').next()?;
                Some((simple.to_string(), import.path.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_map_skips_wildcard_and_static() {
        let unit = CompilationUnit {
            package: "com.acme".to_string(),
            imports: vec![
                ImportDecl {
                    path: "com.acme.dto.User".to_string(),
                    is_static: false,
                    is_wildcard: false,
                },
                ImportDecl {
                    path: "java.util".to_string(),
                    is_static: false,
                    is_wildcard: true,
                },
                ImportDecl {
                    path: "org.junit.Assert.assertEquals".to_string(),
                    is_static: true,
                    is_wildcard: false,
                },
            ],
            types: Vec::new(),
        };

        let map = unit.import_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("User").map(String::as_str), Some("com.acme.dto.User"));
    }
}
