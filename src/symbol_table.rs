use crate::annotation::{self, Annotation, AnnotationKind};
use crate::doc_index::DocIndex;
use crate::parser::ParsedFile;
use crate::syntax::{FieldDecl, MethodDecl, TypeDecl, TypeDeclKind};
use log::{debug, info};
use std::collections::{BTreeSet, HashMap};
use std::path::{Component, Path};
use std::sync::Arc;

/// Simple name -> qualified name, scoped to one compilation unit
pub type ImportMap = HashMap<String, String>;

/// Placeholder for fields and parameters without any documentation
pub const DEFAULT_DESCRIPTION: &str = "TODO";

/// A declared class, record or enum
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    /// Dotted package + nesting path, unique within a run
    pub qualified_name: String,
    pub package: String,
    pub imports: Arc<ImportMap>,
    /// Instance fields in declaration order (empty for enums)
    pub fields: Vec<FieldDeclaration>,
    pub is_enum: bool,
}

/// One member of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub name: String,
    /// Type as written in source, e.g. `List<Item>`
    pub type_expression: String,
    pub required: bool,
    pub description: String,
}

/// A type whose methods are exposed as HTTP endpoints
#[derive(Debug, Clone)]
pub struct ControllerInfo {
    pub qualified_name: String,
    pub package: String,
    pub imports: Arc<ImportMap>,
    /// Class-level path prefix, empty when the controller has none
    pub base_path: String,
    /// Methods in declaration order
    pub methods: Vec<MethodDecl>,
    /// Doc comments of the controller's source file
    pub docs: Arc<DocIndex>,
}

impl ControllerInfo {
    pub fn simple_name(&self) -> &str {
        self.qualified_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.qualified_name)
    }
}

/// Whole-program index of declared types.
///
/// Built once by [`SymbolTable::build`] and read-only afterwards: the resolver and
/// the field expander only ever borrow it.
#[derive(Debug, Default)]
pub struct SymbolTable {
    types: HashMap<String, TypeDeclaration>,
    simple_names: HashMap<String, Vec<String>>,
    controllers: Vec<ControllerInfo>,
}

impl SymbolTable {
    /// Walk every parsed file once and index all declared types.
    ///
    /// Controllers whose source path (relative to the project root) runs through a
    /// directory named in `exclude_dirs` are indexed as types but not collected as
    /// route containers.
    pub fn build(files: &[ParsedFile], exclude_dirs: &BTreeSet<String>) -> Self {
        let mut builder = SymbolTableBuilder {
            table: SymbolTable::default(),
            exclude_dirs,
        };
        for file in files {
            builder.add_file(file);
        }

        let table = builder.table;
        info!(
            "Indexed {} types ({} simple names), {} controllers",
            table.types.len(),
            table.simple_names.len(),
            table.controllers.len()
        );
        table
    }

    /// Look up a declaration by qualified name
    pub fn get(&self, qualified_name: &str) -> Option<&TypeDeclaration> {
        self.types.get(qualified_name)
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.types.contains_key(qualified_name)
    }

    /// All qualified names sharing a simple name
    pub fn candidates(&self, simple_name: &str) -> &[String] {
        self.simple_names
            .get(simple_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn qualified_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Route containers in file and declaration order
    pub fn controllers(&self) -> &[ControllerInfo] {
        &self.controllers
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Per-file context shared by every declaration of a compilation unit
struct FileContext<'f> {
    package: &'f str,
    imports: Arc<ImportMap>,
    docs: Arc<DocIndex>,
    controller_eligible: bool,
}

struct SymbolTableBuilder<'c> {
    table: SymbolTable,
    exclude_dirs: &'c BTreeSet<String>,
}

impl SymbolTableBuilder<'_> {
    fn add_file(&mut self, file: &ParsedFile) {
        debug!("Indexing types in {}", file.path.display());

        let ctx = FileContext {
            package: &file.unit.package,
            imports: Arc::new(file.unit.import_map()),
            docs: Arc::new(DocIndex::build(&file.source)),
            controller_eligible: !in_excluded_dir(&file.relative_path, self.exclude_dirs),
        };

        for decl in &file.unit.types {
            self.register(decl, &[], &ctx);
        }
    }

    fn register(&mut self, decl: &TypeDecl, enclosing: &[&str], ctx: &FileContext) {
        let mut nesting = enclosing.to_vec();
        nesting.push(&decl.name);
        let local_name = nesting.join(".");
        let qualified_name = if ctx.package.is_empty() {
            local_name
        } else {
            format!("{}.{}", ctx.package, local_name)
        };

        match decl.kind {
            // interfaces only contribute to the nesting path of their member types
            TypeDeclKind::Interface => {}
            TypeDeclKind::Enum => self.insert(&decl.name, TypeDeclaration {
                qualified_name: qualified_name.clone(),
                package: ctx.package.to_string(),
                imports: Arc::clone(&ctx.imports),
                fields: Vec::new(),
                is_enum: true,
            }),
            TypeDeclKind::Class | TypeDeclKind::Record => {
                let fields = decl
                    .fields
                    .iter()
                    .filter(|field| !field.is_static)
                    .map(|field| field_declaration(field, &ctx.docs))
                    .collect();
                self.insert(&decl.name, TypeDeclaration {
                    qualified_name: qualified_name.clone(),
                    package: ctx.package.to_string(),
                    imports: Arc::clone(&ctx.imports),
                    fields,
                    is_enum: false,
                });

                if decl.kind == TypeDeclKind::Class
                    && annotation::has_kind(&decl.annotations, &AnnotationKind::Controller)
                {
                    if ctx.controller_eligible {
                        self.add_controller(decl, qualified_name, ctx);
                    } else {
                        debug!("Ignoring controller {} in excluded directory", qualified_name);
                    }
                }
            }
        }

        for nested in &decl.nested {
            self.register(nested, &nesting, ctx);
        }
    }

    /// Last declaration wins for a repeated qualified name
    fn insert(&mut self, simple_name: &str, declaration: TypeDeclaration) {
        let qualified_name = declaration.qualified_name.clone();
        debug!("Registered type {}", qualified_name);

        let bucket = self
            .table
            .simple_names
            .entry(simple_name.to_string())
            .or_default();
        if !bucket.contains(&qualified_name) {
            bucket.push(qualified_name.clone());
        }
        self.table.types.insert(qualified_name, declaration);
    }

    fn add_controller(&mut self, decl: &TypeDecl, qualified_name: String, ctx: &FileContext) {
        let base_path = decl
            .annotations
            .iter()
            .find(|a| a.kind() == AnnotationKind::RequestMapping)
            .and_then(|a| a.first_value(&["path", "value"]))
            .unwrap_or_default()
            .to_string();

        debug!("Found controller {} (base path '{}')", qualified_name, base_path);
        self.table.controllers.push(ControllerInfo {
            qualified_name,
            package: ctx.package.to_string(),
            imports: Arc::clone(&ctx.imports),
            base_path,
            methods: decl.methods.clone(),
            docs: Arc::clone(&ctx.docs),
        });
    }
}

fn field_declaration(field: &FieldDecl, docs: &DocIndex) -> FieldDeclaration {
    FieldDeclaration {
        name: field.name.clone(),
        type_expression: field.type_name.clone(),
        required: is_required(&field.annotations),
        description: schema_description(&field.annotations)
            .or_else(|| docs.get(field.line))
            .unwrap_or(DEFAULT_DESCRIPTION)
            .to_string(),
    }
}

/// Validation markers, or a schema annotation declaring the field required
fn is_required(annotations: &[Annotation]) -> bool {
    annotations.iter().any(|a| match a.kind() {
        AnnotationKind::Required => true,
        AnnotationKind::Schema => {
            a.flag("required") == Some(true) || a.first_value(&["requiredMode"]) == Some("REQUIRED")
        }
        _ => false,
    })
}

fn schema_description(annotations: &[Annotation]) -> Option<&str> {
    annotations
        .iter()
        .filter(|a| a.kind() == AnnotationKind::Schema)
        .find_map(|a| a.first_value(&["value", "description", "title"]))
}

fn in_excluded_dir(relative_path: &Path, exclude_dirs: &BTreeSet<String>) -> bool {
    relative_path.parent().is_some_and(|dir| {
        dir.components().any(|component| match component {
            Component::Normal(name) => exclude_dirs.contains(name.to_string_lossy().as_ref()),
            _ => false,
        })
    })
}
