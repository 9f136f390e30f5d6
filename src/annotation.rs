//! Annotation model shared by the front end and the extraction engine.
//!
//! Every annotation found on a declaration is lowered once into an [`Annotation`]
//! (name + ordered key/values). Extraction code never matches on raw annotation
//! text; it asks for the [`AnnotationKind`] and reads attributes through
//! [`Annotation::first_value`] / [`Annotation::values`], so the lookup order for
//! attributes like `path` vs `value` is spelled out as a key list at each call site.

use crate::extractor::HttpMethod;

/// A single annotation as it appears on a class, field, method or parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Annotation name as written, without the `@` (may be qualified)
    pub name: String,
    /// Attributes in source order. `@X("a")` is stored under the key `value`;
    /// array initializers contribute one entry per element.
    pub attributes: Vec<(String, Vec<String>)>,
}

/// The closed set of annotation kinds the extractor cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationKind {
    /// `@RestController`, `@Controller` and any other `*Controller` marker
    Controller,
    /// `@GetMapping`, `@PostMapping`, ... with their fixed verb
    Mapping(HttpMethod),
    /// `@RequestMapping`, verb taken from the `method` attribute
    RequestMapping,
    /// Bean validation markers that make a field required
    Required,
    /// `@ApiModelProperty` / `@Schema`
    Schema,
    /// `@ApiOperation` / `@Operation`
    Operation,
    /// `@ApiParam` / `@Parameter`
    ParamDoc,
    PathVariable,
    RequestParam,
    RequestHeader,
    RequestBody,
    ModelAttribute,
    Other,
}

impl Annotation {
    /// Create an annotation without attributes (a marker annotation)
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Builder-style helper used by the front end and tests
    pub fn with_attribute(mut self, key: impl Into<String>, values: Vec<String>) -> Self {
        self.attributes.push((key.into(), values));
        self
    }

    /// The last dotted segment of the name (`org.x.GetMapping` -> `GetMapping`)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Classify this annotation
    pub fn kind(&self) -> AnnotationKind {
        let name = self.simple_name();
        match name {
            "GetMapping" => AnnotationKind::Mapping(HttpMethod::Get),
            "PostMapping" => AnnotationKind::Mapping(HttpMethod::Post),
            "PutMapping" => AnnotationKind::Mapping(HttpMethod::Put),
            "DeleteMapping" => AnnotationKind::Mapping(HttpMethod::Delete),
            "PatchMapping" => AnnotationKind::Mapping(HttpMethod::Patch),
            "RequestMapping" => AnnotationKind::RequestMapping,
            "NotNull" | "NotBlank" | "NotEmpty" => AnnotationKind::Required,
            "ApiModelProperty" | "Schema" => AnnotationKind::Schema,
            "ApiOperation" | "Operation" => AnnotationKind::Operation,
            "ApiParam" | "Parameter" => AnnotationKind::ParamDoc,
            "PathVariable" => AnnotationKind::PathVariable,
            "RequestParam" => AnnotationKind::RequestParam,
            "RequestHeader" => AnnotationKind::RequestHeader,
            "RequestBody" => AnnotationKind::RequestBody,
            "ModelAttribute" => AnnotationKind::ModelAttribute,
            _ if name.ends_with("Controller") => AnnotationKind::Controller,
            _ => AnnotationKind::Other,
        }
    }

    /// Values of the first key in `keys` that carries at least one non-empty value.
    pub fn values(&self, keys: &[&str]) -> Vec<&str> {
        for key in keys {
            let values: Vec<&str> = self
                .attributes
                .iter()
                .filter(|(k, _)| k == key)
                .flat_map(|(_, v)| v.iter().map(|s| s.trim()))
                .filter(|s| !s.is_empty())
                .collect();
            if !values.is_empty() {
                return values;
            }
        }
        Vec::new()
    }

    /// First non-empty value of the first key in `keys` that has one.
    pub fn first_value(&self, keys: &[&str]) -> Option<&str> {
        self.values(keys).into_iter().next()
    }

    /// Boolean attribute: `Some(true)` only for a case-insensitive `true`.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.first_value(&[key])
            .map(|value| value.eq_ignore_ascii_case("true"))
    }
}

/// Find the first annotation of the given kind
pub fn find_kind<'a>(annotations: &'a [Annotation], kind: &AnnotationKind) -> Option<&'a Annotation> {
    annotations.iter().find(|a| &a.kind() == kind)
}

/// Whether any annotation has the given kind
pub fn has_kind(annotations: &[Annotation], kind: &AnnotationKind) -> bool {
    find_kind(annotations, kind).is_some()
}
