//! API Doc From Source - HTTP endpoint inventories from Java web projects.
//!
//! This library builds a machine-readable inventory of the endpoints a Spring service
//! exposes by analyzing its Java sources statically. For every handler method it records
//! the verb, the full path, a summary, the request bindings and the request/response
//! field trees, expanded recursively across every type declared in the project.
//!
//! # Architecture
//!
//! 1. [`scanner`] - Walks the project tree for `.java` files, filtered by [`glob`] patterns
//! 2. [`parser`] - Parses Java with tree-sitter and lowers it into the [`syntax`] model
//! 3. [`symbol_table`] - Indexes every declared type once, and collects controllers
//! 4. [`type_resolver`] - Resolves a type name from the file that mentions it
//! 5. [`field_expander`] - Expands a type into a bounded, cycle-free field tree
//! 6. [`extractor`] - Turns controller methods into endpoint entries
//! 7. [`inventory`] - Assembles the final document
//! 8. [`serializer`] - Writes it as JSON, YAML or Markdown
//!
//! # Example Usage
//!
//! ```no_run
//! use api_doc_from_source::{
//!     config::ExtractionConfig,
//!     extractor::{spring::SpringExtractor, RouteExtractor},
//!     inventory::InventoryBuilder,
//!     parser::AstParser,
//!     scanner::FileScanner,
//!     serializer::serialize_json,
//!     symbol_table::SymbolTable,
//! };
//! use std::path::PathBuf;
//!
//! let root = PathBuf::from("./order-service");
//! let config = ExtractionConfig::default();
//!
//! // Scan and parse
//! let scan_result = FileScanner::new(root.clone()).scan().unwrap();
//! let parsed_files: Vec<_> = AstParser::parse_files(&root, &scan_result.java_files)
//!     .into_iter()
//!     .filter_map(|r| r.ok())
//!     .collect();
//!
//! // Index and extract
//! let table = SymbolTable::build(&parsed_files, &config.exclude_dirs);
//! let endpoints = SpringExtractor::new(config.max_depth).extract_endpoints(&table);
//!
//! // Assemble and serialize
//! let inventory = InventoryBuilder::new("order-service").add_endpoints(endpoints).build();
//! println!("{}", serialize_json(&inventory).unwrap());
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete CLI application.

pub mod annotation;
pub mod cli;
pub mod config;
pub mod doc_index;
pub mod error;
pub mod extractor;
pub mod field_expander;
pub mod glob;
pub mod inventory;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod symbol_table;
pub mod syntax;
pub mod type_resolver;
