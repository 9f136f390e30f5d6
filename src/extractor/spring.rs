use crate::annotation::{self, Annotation, AnnotationKind};
use crate::extractor::{
    join_paths, BodyShape, EndpointEntry, Handler, HttpMethod, RequestShape, RouteExtractor,
    RESPONSE_PLACEHOLDER,
};
use crate::field_expander::{FieldExpander, FieldNode, TypeContext};
use crate::symbol_table::{ControllerInfo, SymbolTable, DEFAULT_DESCRIPTION};
use crate::syntax::{MethodDecl, ParamDecl};
use crate::type_resolver::TypeExpr;
use log::{debug, info};
use std::collections::BTreeMap;

/// Return types unwrapped one level to their first type argument
const RESPONSE_WRAPPERS: &[&str] = &["ResponseEntity", "HttpEntity"];

/// Spring MVC endpoint extractor
pub struct SpringExtractor {
    max_depth: usize,
}

impl SpringExtractor {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl RouteExtractor for SpringExtractor {
    fn extract_endpoints(&self, table: &SymbolTable) -> Vec<EndpointEntry> {
        let expander = FieldExpander::new(table, self.max_depth);
        let mut endpoints = Vec::new();

        for controller in table.controllers() {
            debug!("Extracting endpoints from {}", controller.qualified_name);
            for method in &controller.methods {
                endpoints.extend(method_endpoints(controller, method, &expander));
            }
        }

        info!(
            "Extracted {} endpoints from {} controllers",
            endpoints.len(),
            table.controllers().len()
        );
        endpoints
    }
}

/// All endpoints of one handler method; empty when it carries no routing annotation
fn method_endpoints(
    controller: &ControllerInfo,
    method: &MethodDecl,
    expander: &FieldExpander,
) -> Vec<EndpointEntry> {
    let routes = route_pairs(&method.annotations);
    if routes.is_empty() {
        return Vec::new();
    }

    let ctx = TypeContext {
        package: &controller.package,
        imports: controller.imports.as_ref(),
    };

    let request = request_shape(controller, method, expander, ctx);
    let response_type = response_type(&method.return_type);
    let response = BodyShape {
        fields: expander.expand_root(&response_type, ctx),
        type_name: response_type,
    };
    let summary = summary(controller, method);
    let handler = Handler {
        class: controller.qualified_name.clone(),
        method: method.name.clone(),
    };

    routes
        .into_iter()
        .map(|(verb, path)| {
            let path = join_paths(&controller.base_path, &path);
            debug!("Found endpoint: {} {} -> {}", verb, path, method.name);
            EndpointEntry {
                method: verb,
                path,
                summary: summary.clone(),
                tags: Vec::new(),
                auth: String::new(),
                handler: handler.clone(),
                request: request.clone(),
                responses: BTreeMap::from([(RESPONSE_PLACEHOLDER.to_string(), response.clone())]),
            }
        })
        .collect()
}

/// (verb, path) pairs in annotation order
fn route_pairs(annotations: &[Annotation]) -> Vec<(HttpMethod, String)> {
    let mut pairs = Vec::new();

    for ann in annotations {
        let verbs = match ann.kind() {
            AnnotationKind::Mapping(verb) => vec![verb],
            AnnotationKind::RequestMapping => {
                let verbs: Vec<HttpMethod> = ann
                    .values(&["method"])
                    .into_iter()
                    .filter_map(|name| {
                        let verb = HttpMethod::parse(name);
                        if verb.is_none() {
                            debug!("Ignoring unknown request method '{}'", name);
                        }
                        verb
                    })
                    .collect();
                if verbs.is_empty() {
                    vec![HttpMethod::Any]
                } else {
                    verbs
                }
            }
            _ => continue,
        };

        let mut paths = ann.values(&["path", "value"]);
        if paths.is_empty() {
            paths.push("");
        }

        for verb in verbs {
            for path in &paths {
                pairs.push((verb, path.to_string()));
            }
        }
    }

    pairs
}

fn request_shape(
    controller: &ControllerInfo,
    method: &MethodDecl,
    expander: &FieldExpander,
    ctx: TypeContext,
) -> RequestShape {
    let mut request = RequestShape::default();

    for param in &method.parameters {
        let annotations = &param.annotations;

        if let Some(binding) = annotation::find_kind(annotations, &AnnotationKind::PathVariable) {
            request.path_params.push(parameter_node(param, binding, true));
        } else if let Some(binding) =
            annotation::find_kind(annotations, &AnnotationKind::RequestParam)
        {
            let required = binding.flag("required").unwrap_or(true);
            request.query_params.push(parameter_node(param, binding, required));
        } else if let Some(binding) =
            annotation::find_kind(annotations, &AnnotationKind::RequestHeader)
        {
            let required = binding.flag("required").unwrap_or(true);
            request.headers.push(parameter_node(param, binding, required));
        } else if annotation::has_kind(annotations, &AnnotationKind::RequestBody)
            || annotation::has_kind(annotations, &AnnotationKind::ModelAttribute)
        {
            request.body = Some(BodyShape {
                type_name: param.type_name.clone(),
                fields: expander.expand_root(&param.type_name, ctx),
            });
        } else {
            debug!(
                "Ignoring unbound parameter '{}' of {}.{}",
                param.name, controller.qualified_name, method.name
            );
        }
    }

    request
}

fn parameter_node(param: &ParamDecl, binding: &Annotation, required: bool) -> FieldNode {
    FieldNode {
        name: binding
            .first_value(&["value", "name"])
            .unwrap_or(param.name.as_str())
            .to_string(),
        type_name: param.type_name.clone(),
        required,
        description: param_description(&param.annotations).to_string(),
        children: Vec::new(),
    }
}

fn param_description(annotations: &[Annotation]) -> &str {
    annotations
        .iter()
        .filter(|a| a.kind() == AnnotationKind::ParamDoc)
        .find_map(|a| a.first_value(&["value", "description", "name"]))
        .unwrap_or(DEFAULT_DESCRIPTION)
}

fn response_type(return_type: &str) -> String {
    let expr = TypeExpr::parse(return_type);
    if RESPONSE_WRAPPERS.contains(&expr.simple_name()) {
        if let Some(inner) = expr.args.first() {
            return inner.clone();
        }
    }
    return_type.to_string()
}

/// `<Controller> - <text>`, text from the operation annotation, the doc comment or the method name
fn summary(controller: &ControllerInfo, method: &MethodDecl) -> String {
    let text = method
        .annotations
        .iter()
        .filter(|a| a.kind() == AnnotationKind::Operation)
        .find_map(|a| a.first_value(&["value", "summary", "notes"]))
        .or_else(|| controller.docs.get(method.line))
        .unwrap_or(method.name.as_str());

    format!("{} - {}", controller.simple_name(), text)
}
