//! API Doc From Source - command-line tool for building an endpoint inventory.
//!
//! This binary scans a Java project, finds Spring controllers and writes every HTTP
//! endpoint they expose, with request and response field trees, as JSON, YAML or
//! Markdown.
//!
//! # Usage
//!
//! ```bash
//! api-doc-from-source [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write the JSON inventory to a file:
//! ```bash
//! api-doc-from-source ./order-service -o api.json
//! ```
//!
//! Render Markdown for the main sources only:
//! ```bash
//! api-doc-from-source ./order-service -f markdown --include 'src/main/**' -o API.md
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! api-doc-from-source ./order-service -v
//! ```

use anyhow::Result;
use api_doc_from_source::cli;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // Parse once to read the verbose flag, then validate after the logger is up
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("API Doc From Source starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Endpoint inventory generation completed successfully");

    Ok(())
}
