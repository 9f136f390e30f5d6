use crate::glob::GlobPattern;
use anyhow::{bail, Result};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names that hold build output or dependencies when found outside a `src` tree
const SKIPPED_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

/// Include pattern used when none is configured
pub const DEFAULT_INCLUDE: &str = "**/*.java";

/// File scanner for traversing project directories.
///
/// The `FileScanner` recursively walks through a project directory to find all Java source
/// files. It automatically skips hidden directories (those starting with `.`) and build output
/// directories such as `target` and `build`. A directory below a `src` directory is never
/// treated as build output, so packages like `com.acme.build` are still scanned. Entries are
/// visited in file-name order, so the result is the same on every run.
///
/// # Example
///
/// ```no_run
/// use api_doc_from_source::scanner::FileScanner;
/// use std::path::PathBuf;
///
/// let scanner = FileScanner::new(PathBuf::from("./my-service"))
///     .with_filters(&["src/main/**".to_string()], &["**/test/**".to_string()]);
/// let result = scanner.scan().unwrap();
/// println!("Found {} Java files", result.java_files.len());
/// ```
pub struct FileScanner {
    root_path: PathBuf,
    include: Vec<GlobPattern>,
    exclude: Vec<GlobPattern>,
}

/// Result of directory scanning operation.
///
/// Contains the list of discovered Java files and any warnings encountered during scanning.
pub struct ScanResult {
    /// Paths of all kept `.java` files, in walk order
    pub java_files: Vec<PathBuf>,
    /// Warning messages for any issues encountered (e.g., inaccessible directories)
    pub warnings: Vec<String>,
}

impl FileScanner {
    /// Creates a new `FileScanner` for the specified root directory with the default filters.
    pub fn new(root_path: PathBuf) -> Self {
        Self {
            root_path,
            include: vec![GlobPattern::new(DEFAULT_INCLUDE)],
            exclude: Vec::new(),
        }
    }

    /// Restrict the scan with include and exclude globs.
    ///
    /// An empty include list keeps the default `**/*.java`.
    pub fn with_filters(mut self, include: &[String], exclude: &[String]) -> Self {
        let include = GlobPattern::compile_all(include);
        if !include.is_empty() {
            self.include = include;
        }
        self.exclude = GlobPattern::compile_all(exclude);
        self
    }

    /// Scans the directory tree and collects all `.java` files that pass the filters.
    ///
    /// Patterns are matched against the file path relative to the root. If any directories
    /// or files cannot be accessed, warnings are logged and added to the result, but scanning
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns an error if the root directory itself cannot be read.
    pub fn scan(&self) -> Result<ScanResult> {
        let mut java_files = Vec::new();
        let mut warnings = Vec::new();

        let walker = WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // Don't filter the root directory itself
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }

                let dir_name = e.file_name().to_string_lossy();
                if dir_name.starts_with('.') {
                    return false;
                }
                !SKIPPED_DIRS.contains(&dir_name.as_ref()) || self.inside_source_tree(e.path())
            });

        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    let is_java = path.extension().and_then(|s| s.to_str()) == Some("java");
                    if entry.file_type().is_file() && is_java && self.accepts(path) {
                        java_files.push(path.to_path_buf());
                    }
                }
                Err(e) if e.depth() == 0 => {
                    bail!("Failed to read project root {}: {}", self.root_path.display(), e);
                }
                Err(e) => {
                    // Record warning for inaccessible directories/files
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scan of {} found {} Java files",
            self.root_path.display(),
            java_files.len()
        );
        Ok(ScanResult {
            java_files,
            warnings,
        })
    }

    /// Whether a directory sits below a `src` directory of the project
    fn inside_source_tree(&self, dir: &Path) -> bool {
        let relative = dir.strip_prefix(&self.root_path).unwrap_or(dir);
        relative
            .parent()
            .is_some_and(|parent| parent.components().any(|c| c.as_os_str() == "src"))
    }

    fn accepts(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root_path).unwrap_or(path);

        if !self.include.iter().any(|p| p.matches_path(relative)) {
            debug!("Not included: {}", relative.display());
            return false;
        }
        if self.exclude.iter().any(|p| p.matches_path(relative)) {
            debug!("Excluded: {}", relative.display());
            return false;
        }
        true
    }
}
