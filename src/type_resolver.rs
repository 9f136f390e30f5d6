use crate::symbol_table::{ImportMap, SymbolTable};
use log::debug;

/// A type expression split into its base name and generic arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeExpr {
    /// Base name without generic arguments or array suffixes
    pub base: String,
    /// Top-level generic arguments, each still in source form
    pub args: Vec<String>,
}

impl TypeExpr {
    /// Parse `Map<String, List<Item>>[]` into base `Map` and args
    /// `["String", "List<Item>"]`.
    pub fn parse(expression: &str) -> Self {
        let expression = expression.trim();

        let (base, args) = match (expression.find('<'), expression.rfind('>')) {
            (Some(open), Some(close)) if open < close => (
                &expression[..open],
                split_top_level(&expression[open + 1..close]),
            ),
            _ => (expression, Vec::new()),
        };

        let base = base.trim().trim_end_matches("[]").trim().to_string();
        Self { base, args }
    }

    /// Last dotted segment of the base name
    pub fn simple_name(&self) -> &str {
        self.base.rsplit('.').next().unwrap_or(&self.base)
    }
}

/// Split on commas that are not nested inside `<...>`
fn split_top_level(args: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in args.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&args[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&args[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

/// Outcome of resolving a name from a given source context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(String),
    /// Several declarations share the name and nothing disambiguates them
    Ambiguous(usize),
    Unresolved,
}

impl Resolution {
    /// The qualified name, treating ambiguity as failure
    pub fn qualified_name(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(name) => Some(name),
            Resolution::Ambiguous(_) | Resolution::Unresolved => None,
        }
    }
}

/// Best-effort name resolution against a built [`SymbolTable`].
///
/// Mirrors how Java resolves a simple name: explicit imports first, then the
/// referencing package. When neither applies, a name that is unique across the
/// whole project is accepted.
pub struct TypeResolver<'a> {
    table: &'a SymbolTable,
}

impl<'a> TypeResolver<'a> {
    pub fn new(table: &'a SymbolTable) -> Self {
        Self { table }
    }

    /// Resolve `type_name` as seen from a file in `package` with `imports`
    pub fn resolve(&self, type_name: &str, package: &str, imports: &ImportMap) -> Resolution {
        let type_name = type_name.trim();
        if type_name.is_empty() {
            return Resolution::Unresolved;
        }

        let resolution = if type_name.contains('.') {
            self.resolve_dotted(type_name, package)
        } else {
            self.resolve_simple(type_name, package, imports)
        };

        debug!("Resolved '{}' in package '{}' -> {:?}", type_name, package, resolution);
        resolution
    }

    fn resolve_dotted(&self, type_name: &str, package: &str) -> Resolution {
        if self.table.contains(type_name) {
            return Resolution::Resolved(type_name.to_string());
        }

        // Outer.Inner written from inside the declaring package
        if !package.is_empty() {
            let local = format!("{}.{}", package, type_name);
            if self.table.contains(&local) {
                return Resolution::Resolved(local);
            }
        }

        let suffix = format!(".{}", type_name);
        let matches: Vec<&str> = self
            .table
            .qualified_names()
            .filter(|name| name.ends_with(&suffix))
            .collect();
        match matches.as_slice() {
            [] => Resolution::Unresolved,
            [single] => Resolution::Resolved(single.to_string()),
            many => Resolution::Ambiguous(many.len()),
        }
    }

    fn resolve_simple(&self, type_name: &str, package: &str, imports: &ImportMap) -> Resolution {
        // an import wins even when its target is outside the scanned sources
        if let Some(imported) = imports.get(type_name) {
            return Resolution::Resolved(imported.clone());
        }

        let same_package = if package.is_empty() {
            type_name.to_string()
        } else {
            format!("{}.{}", package, type_name)
        };
        if self.table.contains(&same_package) {
            return Resolution::Resolved(same_package);
        }

        match self.table.candidates(type_name) {
            [] => Resolution::Unresolved,
            [single] => Resolution::Resolved(single.clone()),
            many => Resolution::Ambiguous(many.len()),
        }
    }
}
