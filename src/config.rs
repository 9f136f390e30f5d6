use std::collections::BTreeSet;

/// Directory names whose controllers are outbound clients, not route containers
pub const DEFAULT_EXCLUDE_DIRS: [&str; 3] = ["client", "feign", "interface"];

/// Default maximum depth of expanded field trees
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Settings consumed by the scanner and the extraction engine
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Glob patterns a file must match (any); empty means `**/*.java`
    pub include: Vec<String>,
    /// Glob patterns that drop a file (any)
    pub exclude: Vec<String>,
    /// Controllers under a directory with one of these names are ignored
    pub exclude_dirs: BTreeSet<String>,
    /// Depth budget for field expansion
    pub max_depth: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            include: Vec::new(),
            exclude: Vec::new(),
            exclude_dirs: DEFAULT_EXCLUDE_DIRS.iter().map(|d| d.to_string()).collect(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
