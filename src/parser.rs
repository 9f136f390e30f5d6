use crate::annotation::Annotation;
use crate::error::{Error, Result};
use crate::syntax::{
    CompilationUnit, FieldDecl, ImportDecl, MethodDecl, ParamDecl, TypeDecl, TypeDeclKind,
};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use tree_sitter::{Node, Parser};

/// Java front end.
///
/// The `AstParser` uses `tree-sitter-java` to parse source text and lowers the concrete
/// syntax tree into a [`CompilationUnit`]: package, imports, and type declarations with
/// their annotations, fields, methods and parameters. Nothing downstream sees the
/// tree-sitter tree.
///
/// # Example
///
/// ```no_run
/// use api_doc_from_source::parser::AstParser;
/// use std::path::Path;
///
/// let parsed = AstParser::parse_file(Path::new("."), Path::new("src/UserController.java")).unwrap();
/// println!("Parsed {} types", parsed.unit.types.len());
/// ```
pub struct AstParser;

/// A successfully parsed Java file.
#[derive(Debug)]
pub struct ParsedFile {
    /// Path to the source file as it was read
    pub path: PathBuf,
    /// Path relative to the project root, used for directory-based classification
    pub relative_path: PathBuf,
    /// Raw source text, kept for doc-comment association
    pub source: String,
    /// The lowered compilation unit
    pub unit: CompilationUnit,
}

impl AstParser {
    /// Parses a single Java source file.
    ///
    /// Invalid UTF-8 is replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The file contains invalid Java syntax
    pub fn parse_file(root: &Path, path: &Path) -> Result<ParsedFile> {
        debug!("Parsing file: {}", path.display());

        let bytes = fs::read(path).map_err(|source| Error::ReadError {
            file: path.to_path_buf(),
            source,
        })?;
        let source = String::from_utf8_lossy(&bytes).into_owned();

        let relative_path = path.strip_prefix(root).unwrap_or(path);
        let mut parsed = Self::parse_source(relative_path, source)?;
        parsed.path = path.to_path_buf();

        debug!("Successfully parsed file: {}", path.display());
        Ok(parsed)
    }

    /// Parses Java source text that did not come from disk.
    ///
    /// `path` is used both as the file path and the project-relative path.
    pub fn parse_source(path: &Path, source: String) -> Result<ParsedFile> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_java::LANGUAGE.into())?;

        let tree = parser.parse(&source, None).ok_or_else(|| Error::ParseError {
            file: path.to_path_buf(),
            message: "parser produced no syntax tree".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let line = first_error(root)
                .map(|node| node.start_position().row + 1)
                .unwrap_or(1);
            return Err(Error::ParseError {
                file: path.to_path_buf(),
                message: format!("syntax error near line {}", line),
            });
        }

        let unit = Lowering { source: &source }.compilation_unit(root);

        Ok(ParsedFile {
            path: path.to_path_buf(),
            relative_path: path.to_path_buf(),
            source,
            unit,
        })
    }

    /// Parses multiple Java source files, continuing even if some fail.
    ///
    /// Files that fail to parse are logged as warnings. One result is returned per
    /// input path, in input order.
    pub fn parse_files(root: &Path, paths: &[PathBuf]) -> Vec<Result<ParsedFile>> {
        debug!("Parsing {} files", paths.len());

        let results: Vec<Result<ParsedFile>> = paths
            .iter()
            .map(|path| match Self::parse_file(root, path) {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    Err(e)
                }
            })
            .collect();

        let success_count = results.iter().filter(|r| r.is_ok()).count();
        debug!(
            "Parsing complete: {} succeeded, {} failed",
            success_count,
            results.len() - success_count
        );

        results
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.has_error() {
            if let Some(found) = first_error(child) {
                return Some(found);
            }
        }
    }
    None
}

fn is_comment(kind: &str) -> bool {
    matches!(kind, "line_comment" | "block_comment")
}

fn is_annotation(kind: &str) -> bool {
    matches!(kind, "annotation" | "marker_annotation")
}

fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Lowers a tree-sitter-java tree into the [`CompilationUnit`] model
struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    fn text(&self, node: Node) -> &'s str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn compilation_unit(&self, root: Node) -> CompilationUnit {
        let mut unit = CompilationUnit::default();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_declaration" => unit.package = self.package_name(child),
                "import_declaration" => unit.imports.push(self.import(child)),
                _ => {
                    if let Some(decl) = self.type_decl(child) {
                        unit.types.push(decl);
                    }
                }
            }
        }

        unit
    }

    fn package_name(&self, node: Node) -> String {
        let mut cursor = node.walk();
        let name = node
            .named_children(&mut cursor)
            .find(|child| matches!(child.kind(), "scoped_identifier" | "identifier"))
            .map(|child| compact(self.text(child)))
            .unwrap_or_default();
        name
    }

    fn import(&self, node: Node) -> ImportDecl {
        let mut import = ImportDecl {
            path: String::new(),
            is_static: false,
            is_wildcard: false,
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => import.is_static = true,
                "asterisk" => import.is_wildcard = true,
                "scoped_identifier" | "identifier" => import.path = compact(self.text(child)),
                _ => {}
            }
        }

        import
    }

    fn type_decl(&self, node: Node) -> Option<TypeDecl> {
        let kind = match node.kind() {
            "class_declaration" => TypeDeclKind::Class,
            "record_declaration" => TypeDeclKind::Record,
            "enum_declaration" => TypeDeclKind::Enum,
            "interface_declaration" => TypeDeclKind::Interface,
            _ => return None,
        };
        let name = self.text(node.child_by_field_name("name")?).to_string();

        let mut decl = TypeDecl {
            name,
            kind,
            annotations: self.annotations(modifiers_of(node)),
            fields: Vec::new(),
            methods: Vec::new(),
            nested: Vec::new(),
        };

        if kind == TypeDeclKind::Record {
            if let Some(components) = node.child_by_field_name("parameters") {
                decl.fields = self
                    .parameters(components)
                    .into_iter()
                    .map(|param| FieldDecl {
                        name: param.name,
                        type_name: param.type_name,
                        annotations: param.annotations,
                        is_static: false,
                        line: param.line,
                    })
                    .collect();
            }
        }

        if let Some(body) = node.child_by_field_name("body") {
            self.members(body, &mut decl);
        }

        Some(decl)
    }

    fn members(&self, body: Node, decl: &mut TypeDecl) {
        let mut cursor = body.walk();
        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "field_declaration" => decl.fields.extend(self.fields(child)),
                "method_declaration" => {
                    if let Some(method) = self.method(child) {
                        decl.methods.push(method);
                    }
                }
                // enum constants are followed by an optional body with regular members
                "enum_body_declarations" => self.members(child, decl),
                _ => {
                    if let Some(nested) = self.type_decl(child) {
                        decl.nested.push(nested);
                    }
                }
            }
        }
    }

    fn fields(&self, node: Node) -> Vec<FieldDecl> {
        let Some(type_node) = node.child_by_field_name("type") else {
            return Vec::new();
        };
        let base_type = self.render_type(type_node);
        let modifiers = modifiers_of(node);
        let annotations = self.annotations(modifiers);
        let is_static = modifiers.is_some_and(|m| has_keyword(m, "static"));
        let line = declaration_line(node, type_node);

        let mut cursor = node.walk();
        let fields: Vec<FieldDecl> = node
            .children_by_field_name("declarator", &mut cursor)
            .filter_map(|declarator| {
                let name = self.text(declarator.child_by_field_name("name")?).to_string();
                let type_name = match declarator.child_by_field_name("dimensions") {
                    Some(dims) => format!("{}{}", base_type, self.dimensions(dims)),
                    None => base_type.clone(),
                };
                Some(FieldDecl {
                    name,
                    type_name,
                    annotations: annotations.clone(),
                    is_static,
                    line,
                })
            })
            .collect();
        fields
    }

    fn method(&self, node: Node) -> Option<MethodDecl> {
        let name = self.text(node.child_by_field_name("name")?).to_string();
        let type_node = node.child_by_field_name("type")?;

        let mut return_type = self.render_type(type_node);
        if let Some(dims) = node.child_by_field_name("dimensions") {
            return_type.push_str(&self.dimensions(dims));
        }

        let parameters = node
            .child_by_field_name("parameters")
            .map(|params| {
                self.parameters(params)
                    .into_iter()
                    .map(|param| ParamDecl {
                        name: param.name,
                        type_name: param.type_name,
                        annotations: param.annotations,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(MethodDecl {
            name,
            return_type,
            parameters,
            annotations: self.annotations(modifiers_of(node)),
            line: declaration_line(node, type_node),
        })
    }

    /// Formal parameters and record components share this shape
    fn parameters(&self, node: Node) -> Vec<LoweredParam> {
        let mut params = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "formal_parameter" => {
                    let (Some(type_node), Some(name_node)) = (
                        child.child_by_field_name("type"),
                        child.child_by_field_name("name"),
                    ) else {
                        continue;
                    };
                    let mut type_name = self.render_type(type_node);
                    if let Some(dims) = child.child_by_field_name("dimensions") {
                        type_name.push_str(&self.dimensions(dims));
                    }
                    params.push(LoweredParam {
                        name: self.text(name_node).to_string(),
                        type_name,
                        annotations: self.annotations(modifiers_of(child)),
                        line: declaration_line(child, type_node),
                    });
                }
                "spread_parameter" => {
                    if let Some(param) = self.spread_parameter(child) {
                        params.push(param);
                    }
                }
                _ => {}
            }
        }

        params
    }

    fn spread_parameter(&self, node: Node) -> Option<LoweredParam> {
        let mut type_node = None;
        let mut name = None;

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "modifiers" => {}
                "variable_declarator" => {
                    name = child
                        .child_by_field_name("name")
                        .map(|n| self.text(n).to_string());
                }
                kind if !is_comment(kind) && type_node.is_none() => type_node = Some(child),
                _ => {}
            }
        }

        let type_node = type_node?;
        Some(LoweredParam {
            name: name?,
            type_name: format!("{}[]", self.render_type(type_node)),
            annotations: self.annotations(modifiers_of(node)),
            line: declaration_line(node, type_node),
        })
    }

    fn annotations(&self, modifiers: Option<Node>) -> Vec<Annotation> {
        let Some(modifiers) = modifiers else {
            return Vec::new();
        };

        let mut cursor = modifiers.walk();
        let annotations: Vec<Annotation> = modifiers
            .children(&mut cursor)
            .filter(|child| is_annotation(child.kind()))
            .filter_map(|child| self.annotation(child))
            .collect();
        annotations
    }

    fn annotation(&self, node: Node) -> Option<Annotation> {
        let name = compact(self.text(node.child_by_field_name("name")?));
        let mut annotation = Annotation::marker(name);

        if let Some(arguments) = node.child_by_field_name("arguments") {
            let mut cursor = arguments.walk();
            for argument in arguments.named_children(&mut cursor) {
                match argument.kind() {
                    "element_value_pair" => {
                        let key = argument
                            .child_by_field_name("key")
                            .map(|key| self.text(key).to_string())
                            .unwrap_or_default();
                        let values = argument
                            .child_by_field_name("value")
                            .map(|value| self.element_values(value))
                            .unwrap_or_default();
                        annotation.attributes.push((key, values));
                    }
                    kind if is_comment(kind) => {}
                    _ => annotation
                        .attributes
                        .push(("value".to_string(), self.element_values(argument))),
                }
            }
        }

        Some(annotation)
    }

    /// Literal values of an annotation element, arrays flattened
    fn element_values(&self, node: Node) -> Vec<String> {
        match node.kind() {
            "element_value_array_initializer" => {
                let mut cursor = node.walk();
                let values: Vec<String> = node
                    .named_children(&mut cursor)
                    .filter(|child| !is_comment(child.kind()))
                    .flat_map(|child| self.element_values(child))
                    .collect();
                values
            }
            "string_literal" => vec![self.text(node).trim_matches('"').to_string()],
            // RequestMethod.GET -> GET
            "field_access" => node
                .child_by_field_name("field")
                .map(|field| vec![self.text(field).to_string()])
                .unwrap_or_default(),
            kind if is_annotation(kind) => Vec::new(),
            _ => vec![self.text(node).trim().to_string()],
        }
    }

    fn render_type(&self, node: Node) -> String {
        match node.kind() {
            "generic_type" => {
                let mut base = String::new();
                let mut args = Vec::new();

                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    match child.kind() {
                        "type_arguments" => args = self.type_arguments(child),
                        kind if is_comment(kind) => {}
                        _ => base = self.render_type(child),
                    }
                }

                if args.is_empty() {
                    base
                } else {
                    format!("{}<{}>", base, args.join(", "))
                }
            }
            "array_type" => {
                let element = node
                    .child_by_field_name("element")
                    .map(|element| self.render_type(element))
                    .unwrap_or_default();
                let dims = node
                    .child_by_field_name("dimensions")
                    .map(|dims| self.dimensions(dims))
                    .unwrap_or_default();
                format!("{}{}", element, dims)
            }
            "annotated_type" => {
                let mut cursor = node.walk();
                let inner = node
                    .named_children(&mut cursor)
                    .filter(|child| !is_annotation(child.kind()) && !is_comment(child.kind()))
                    .last();
                inner
                    .map(|inner| self.render_type(inner))
                    .unwrap_or_default()
            }
            _ => compact(self.text(node)),
        }
    }

    fn type_arguments(&self, node: Node) -> Vec<String> {
        let mut args = Vec::new();

        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                // `? extends Foo` renders as its bound, a bare `?` is dropped
                "wildcard" => {
                    let mut inner_cursor = child.walk();
                    let bound = child
                        .named_children(&mut inner_cursor)
                        .filter(|n| {
                            !is_annotation(n.kind()) && !is_comment(n.kind()) && n.kind() != "super"
                        })
                        .last();
                    if let Some(bound) = bound {
                        args.push(self.render_type(bound));
                    }
                }
                kind if is_comment(kind) => {}
                _ => args.push(self.render_type(child)),
            }
        }

        args
    }

    fn dimensions(&self, node: Node) -> String {
        "[]".repeat(self.text(node).matches('[').count())
    }
}

/// Intermediate shape shared by formal parameters and record components
struct LoweredParam {
    name: String,
    type_name: String,
    annotations: Vec<Annotation>,
    line: usize,
}

fn modifiers_of(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let modifiers = node
        .children(&mut cursor)
        .find(|child| child.kind() == "modifiers");
    modifiers
}

fn has_keyword(modifiers: Node, keyword: &str) -> bool {
    let mut cursor = modifiers.walk();
    let found = modifiers
        .children(&mut cursor)
        .any(|child| child.kind() == keyword);
    found
}

/// 1-based line of the first token of `node` that is not part of an annotation
fn declaration_line(node: Node, type_node: Node) -> usize {
    if let Some(modifiers) = modifiers_of(node) {
        let mut cursor = modifiers.walk();
        let first_keyword = modifiers
            .children(&mut cursor)
            .find(|child| !is_annotation(child.kind()) && !is_comment(child.kind()));
        if let Some(keyword) = first_keyword {
            return keyword.start_position().row + 1;
        }
    }
    type_node.start_position().row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::AnnotationKind;
    use crate::extractor::HttpMethod;
    use std::io::Write;
    use tempfile::TempDir;

    fn parse(code: &str) -> ParsedFile {
        AstParser::parse_source(Path::new("Test.java"), code.to_string())
            .expect("Failed to parse test code")
    }

    /// Helper function to create a temporary file with content
    fn create_temp_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file_path
    }

    #[test]
    fn test_package_and_imports() {
        let parsed = parse(
            r#"
            package com.acme.web;

            import com.acme.dto.UserDto;
            import java.util.*;
            import static org.springframework.http.HttpStatus.OK;

            public class A {}
        "#,
        );

        let unit = &parsed.unit;
        assert_eq!(unit.package, "com.acme.web");
        assert_eq!(unit.imports.len(), 3);
        assert_eq!(unit.imports[0].path, "com.acme.dto.UserDto");
        assert!(!unit.imports[0].is_wildcard);
        assert_eq!(unit.imports[1].path, "java.util");
        assert!(unit.imports[1].is_wildcard);
        assert!(unit.imports[2].is_static);
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name, "A");
    }

    #[test]
    fn test_fields_with_generics_and_arrays() {
        let parsed = parse(
            r#"
            public class Order {
                private static final long serialVersionUID = 1L;
                @NotNull
                private Long id;
                private List<Item> items;
                private Map<String, List<Item>> groups;
                private String[] tags;
                private int a, b[];
                private List<? extends Item> bounded;
            }
        "#,
        );

        let order = &parsed.unit.types[0];
        let fields: Vec<(&str, &str)> = order
            .fields
            .iter()
            .map(|f| (f.name.as_str(), f.type_name.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("serialVersionUID", "long"),
                ("id", "Long"),
                ("items", "List<Item>"),
                ("groups", "Map<String, List<Item>>"),
                ("tags", "String[]"),
                ("a", "int"),
                ("b", "int[]"),
                ("bounded", "List<Item>"),
            ]
        );
        assert!(order.fields[0].is_static);
        assert!(!order.fields[1].is_static);
        assert_eq!(order.fields[1].annotations[0].kind(), AnnotationKind::Required);
    }

    #[test]
    fn test_declaration_line_skips_annotations() {
        let parsed = parse(
            "public class A {\n    @NotNull\n    @Schema(description = \"x\")\n    private Long id;\n    @GetMapping(\"/a\") public String get() { return null; }\n}\n",
        );

        let a = &parsed.unit.types[0];
        assert_eq!(a.fields[0].line, 4);
        assert_eq!(a.methods[0].line, 5);
    }

    #[test]
    fn test_annotation_attributes() {
        let parsed = parse(
            r#"
            @RestController
            @RequestMapping("/api")
            public class C {
                @RequestMapping(path = {"/a", "/b"}, method = {RequestMethod.GET, RequestMethod.POST})
                public String both() { return ""; }

                @GetMapping
                public String plain(@RequestParam(value = "q", required = false) String query) { return ""; }
            }
        "#,
        );

        let c = &parsed.unit.types[0];
        assert_eq!(c.annotations.len(), 2);
        assert_eq!(c.annotations[0].kind(), AnnotationKind::Controller);
        assert_eq!(c.annotations[1].first_value(&["path", "value"]), Some("/api"));

        let both = &c.methods[0].annotations[0];
        assert_eq!(both.values(&["path", "value"]), vec!["/a", "/b"]);
        assert_eq!(both.values(&["method"]), vec!["GET", "POST"]);

        let plain = &c.methods[1];
        assert_eq!(plain.annotations[0].kind(), AnnotationKind::Mapping(HttpMethod::Get));
        assert!(plain.annotations[0].attributes.is_empty());
        assert_eq!(plain.parameters.len(), 1);
        assert_eq!(plain.parameters[0].name, "query");
        assert_eq!(plain.parameters[0].type_name, "String");
        let param_ann = &plain.parameters[0].annotations[0];
        assert_eq!(param_ann.first_value(&["value", "name"]), Some("q"));
        assert_eq!(param_ann.flag("required"), Some(false));
    }

    #[test]
    fn test_nested_enum_and_record() {
        let parsed = parse(
            r#"
            public class Outer {
                public static class Inner { private String v; }
                public enum Status { ACTIVE, INACTIVE; private int code; }
                public record Point(int x, @NotNull Integer y) {}
            }
        "#,
        );

        let outer = &parsed.unit.types[0];
        assert_eq!(outer.nested.len(), 3);
        assert_eq!(outer.nested[0].name, "Inner");
        assert_eq!(outer.nested[1].kind, TypeDeclKind::Enum);
        assert_eq!(outer.nested[1].fields.len(), 1);
        let point = &outer.nested[2];
        assert_eq!(point.kind, TypeDeclKind::Record);
        assert_eq!(point.fields.len(), 2);
        assert_eq!(point.fields[1].name, "y");
        assert_eq!(point.fields[1].type_name, "Integer");
        assert_eq!(point.fields[1].annotations.len(), 1);
    }

    #[test]
    fn test_method_return_types() {
        let parsed = parse(
            r#"
            public class C {
                public void a() {}
                public ResponseEntity<List<User>> b() { return null; }
                public java.util.Optional<User> c() { return null; }
            }
        "#,
        );

        let methods = &parsed.unit.types[0].methods;
        assert_eq!(methods[0].return_type, "void");
        assert_eq!(methods[1].return_type, "ResponseEntity<List<User>>");
        assert_eq!(methods[2].return_type, "java.util.Optional<User>");
    }

    #[test]
    fn test_parse_invalid_java_file() {
        let result = AstParser::parse_source(
            Path::new("Broken.java"),
            "public class Broken { private int x = ; ".to_string(),
        );

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to parse Java syntax"));
    }

    #[test]
    fn test_parse_nonexistent_file() {
        let result = AstParser::parse_file(Path::new("/"), Path::new("/nonexistent/File.java"));

        assert!(result.is_err());
        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read file"));
    }

    #[test]
    fn test_parse_file_sets_relative_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = create_temp_file(&temp_dir, "src/com/acme/A.java", "package com.acme; class A {}");

        let parsed = AstParser::parse_file(temp_dir.path(), &file).unwrap();
        assert_eq!(parsed.path, file);
        assert_eq!(parsed.relative_path, PathBuf::from("src/com/acme/A.java"));
        assert_eq!(parsed.unit.package, "com.acme");
    }

    #[test]
    fn test_parse_files_batch() {
        let temp_dir = TempDir::new().unwrap();

        let file1 = create_temp_file(&temp_dir, "A.java", "class A {}");
        let file2 = create_temp_file(&temp_dir, "B.java", "class B { int x; }");
        let file3 = create_temp_file(&temp_dir, "C.java", "class C { void broken( { }");

        let results = AstParser::parse_files(temp_dir.path(), &[file1, file2, file3]);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(results[1].is_ok());
        assert!(results[2].is_err());
    }
}
