use crate::config::{ExtractionConfig, DEFAULT_MAX_DEPTH};
use crate::extractor::spring::SpringExtractor;
use crate::extractor::RouteExtractor;
use crate::inventory::{Inventory, InventoryBuilder};
use crate::parser::{AstParser, ParsedFile};
use crate::scanner::FileScanner;
use crate::serializer::{render_markdown, serialize_json, serialize_yaml, write_to_file};
use crate::symbol_table::SymbolTable;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// API Doc From Source - Build an HTTP endpoint inventory from Spring controllers
#[derive(Parser, Debug)]
#[command(name = "api-doc-from-source")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to the Java project directory
    #[arg(value_name = "PROJECT_PATH")]
    pub project_path: PathBuf,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output_path: Option<PathBuf>,

    /// Comma-separated glob patterns a source file must match (default: **/*.java)
    #[arg(long = "include", value_name = "GLOBS", value_delimiter = ',')]
    pub include: Vec<String>,

    /// Comma-separated glob patterns of source files to skip
    #[arg(long = "exclude", value_name = "GLOBS", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma-separated directory names whose controllers are ignored (default: client,feign,interface)
    #[arg(long = "exclude-dirs", value_name = "NAMES", value_delimiter = ',')]
    pub exclude_dirs: Option<Vec<String>>,

    /// Maximum depth of expanded field trees
    #[arg(long = "max-depth", value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Service name (defaults to the project directory name)
    #[arg(long = "service", value_name = "NAME")]
    pub service: Option<String>,

    /// Base URL recorded in the inventory
    #[arg(long = "base-url", value_name = "URL", default_value = "")]
    pub base_url: String,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
    /// Markdown document
    Markdown,
}

impl CliArgs {
    /// Extraction settings derived from the command line
    pub fn extraction_config(&self) -> ExtractionConfig {
        let mut config = ExtractionConfig {
            include: non_blank(&self.include),
            exclude: non_blank(&self.exclude),
            max_depth: self.max_depth,
            ..ExtractionConfig::default()
        };
        if let Some(dirs) = &self.exclude_dirs {
            config.exclude_dirs = non_blank(dirs).into_iter().collect();
        }
        config
    }

    /// The explicit service name, else the project directory name
    pub fn service_name(&self) -> String {
        if let Some(service) = &self.service {
            return service.clone();
        }
        let resolved = self
            .project_path
            .canonicalize()
            .unwrap_or_else(|_| self.project_path.clone());
        resolved
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn non_blank(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    // Validate project path exists
    if !args.project_path.exists() {
        anyhow::bail!(
            "Project path does not exist: {}",
            args.project_path.display()
        );
    }

    // Validate project path is a directory
    if !args.project_path.is_dir() {
        anyhow::bail!(
            "Project path is not a directory: {}",
            args.project_path.display()
        );
    }

    info!("Project path: {}", args.project_path.display());
    info!("Output format: {:?}", args.output_format);
    if let Some(ref output) = args.output_path {
        info!("Output file: {}", output.display());
    } else {
        info!("Output: stdout");
    }

    Ok(args)
}

/// Scan, parse, index and extract: the whole pipeline up to the assembled inventory.
///
/// Files that cannot be read or parsed are skipped. A project without controllers
/// yields an inventory with no endpoints.
///
/// # Errors
///
/// Returns an error if the project root cannot be read.
pub fn build_inventory(
    root: &Path,
    config: &ExtractionConfig,
    service: &str,
    base_url: &str,
) -> Result<Inventory> {
    // Step 1: Scan directory for Java files
    info!("Scanning project directory...");
    let scan_result = FileScanner::new(root.to_path_buf())
        .with_filters(&config.include, &config.exclude)
        .scan()?;

    info!("Found {} Java files", scan_result.java_files.len());
    if scan_result.java_files.is_empty() {
        warn!("No Java files found in the project directory");
    }

    // Step 2: Parse files, skipping the ones that fail
    info!("Parsing Java files...");
    let parsed_files: Vec<ParsedFile> = AstParser::parse_files(root, &scan_result.java_files)
        .into_iter()
        .filter_map(|result| result.ok())
        .collect();
    info!(
        "Successfully parsed {} of {} files",
        parsed_files.len(),
        scan_result.java_files.len()
    );

    // Step 3: Index every declared type
    info!("Building symbol table...");
    let table = SymbolTable::build(&parsed_files, &config.exclude_dirs);

    // Step 4: Extract endpoints
    info!("Extracting endpoints...");
    let endpoints = SpringExtractor::new(config.max_depth).extract_endpoints(&table);
    if endpoints.is_empty() {
        warn!("No endpoints found in the project");
    }

    Ok(InventoryBuilder::new(service)
        .with_base_url(base_url)
        .add_endpoints(endpoints)
        .build())
}

/// Render an inventory in the requested format
pub fn render(inventory: &Inventory, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => serialize_json(inventory),
        OutputFormat::Yaml => serialize_yaml(inventory),
        OutputFormat::Markdown => Ok(render_markdown(inventory)),
    }
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    info!("Starting endpoint inventory generation...");

    let config = args.extraction_config();
    debug!("Extraction config: {:?}", config);

    let service = args.service_name();
    let inventory = build_inventory(&args.project_path, &config, &service, &args.base_url)?;

    info!("Serializing to {:?} format...", args.output_format);
    let content = render(&inventory, args.output_format)?;

    if let Some(output_path) = &args.output_path {
        info!("Writing output to: {}", output_path.display());
        write_to_file(&content, output_path)?;
        info!("Successfully wrote inventory to {}", output_path.display());
    } else {
        println!("{}", content);
    }

    info!("Generation complete!");
    info!("Summary:");
    info!("  - Service: {}", inventory.service);
    info!("  - Endpoints found: {}", inventory.endpoints.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&["api-doc-from-source", "/tmp/project"]);

        assert_eq!(args.project_path, PathBuf::from("/tmp/project"));
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(args.output_path.is_none());
        assert!(!args.verbose);

        let config = args.extraction_config();
        assert!(config.include.is_empty());
        assert!(config.exclude.is_empty());
        assert_eq!(config.max_depth, 5);
        assert_eq!(
            config.exclude_dirs.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["client", "feign", "interface"]
        );
    }

    #[test]
    fn test_comma_separated_lists() {
        let args = args(&[
            "api-doc-from-source",
            "/tmp/project",
            "--include",
            "src/main/**,api/**",
            "--exclude",
            "**/test/**",
            "--exclude-dirs",
            "remote, ,legacy",
            "--max-depth",
            "3",
            "-f",
            "markdown",
        ]);

        let config = args.extraction_config();
        assert_eq!(config.include, vec!["src/main/**", "api/**"]);
        assert_eq!(config.exclude, vec!["**/test/**"]);
        assert_eq!(
            config.exclude_dirs.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["legacy", "remote"]
        );
        assert_eq!(config.max_depth, 3);
        assert_eq!(args.output_format, OutputFormat::Markdown);
    }

    #[test]
    fn test_empty_exclude_dirs_disables_exclusion() {
        let args = args(&["api-doc-from-source", "/tmp/project", "--exclude-dirs", ""]);
        assert!(args.extraction_config().exclude_dirs.is_empty());
    }

    #[test]
    fn test_service_name() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("order-service");
        fs::create_dir(&project).unwrap();

        let path = project.to_string_lossy().to_string();
        let defaulted = args(&["api-doc-from-source", path.as_str()]);
        assert_eq!(defaulted.service_name(), "order-service");

        let named = args(&["api-doc-from-source", path.as_str(), "--service", "orders"]);
        assert_eq!(named.service_name(), "orders");
    }

    #[test]
    fn test_validation_rejects_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing").to_string_lossy().to_string();

        let result = parse_args_from_parsed(args(&["api-doc-from-source", missing.as_str()]));
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_validation_rejects_file_path() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("pom.xml");
        fs::write(&file, "<project/>").unwrap();

        let path = file.to_string_lossy().to_string();
        let result = parse_args_from_parsed(args(&["api-doc-from-source", path.as_str()]));
        assert!(result.unwrap_err().to_string().contains("not a directory"));
    }

    #[test]
    fn test_run_writes_output_file() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("demo");
        fs::create_dir_all(project.join("src")).unwrap();
        fs::write(
            project.join("src/PingController.java"),
            "@RestController public class PingController { @GetMapping(\"/ping\") public String ping() { return \"pong\"; } }",
        )
        .unwrap();
        let output = temp_dir.path().join("out/api.json");

        let project_arg = project.to_string_lossy().to_string();
        let output_arg = output.to_string_lossy().to_string();
        let args = args(&["api-doc-from-source", project_arg.as_str(), "-o", output_arg.as_str()]);
        run(args).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["service"], "demo");
        assert_eq!(written["endpoints"][0]["path"], "/ping");
        assert_eq!(written["endpoints"][0]["summary"], "PingController - ping");
    }
}
