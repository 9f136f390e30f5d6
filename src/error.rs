use std::path::PathBuf;

/// Result type alias for the Java front end
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for reading and parsing source files.
///
/// Every variant is recoverable at the pipeline level: the offending file is skipped
/// and extraction continues with the remaining files.
#[derive(Debug)]
pub enum Error {
    ReadError { file: PathBuf, source: std::io::Error },
    ParseError { file: PathBuf, message: String },
    GrammarError(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ReadError { file, source } => {
                write!(f, "Failed to read file {}: {}", file.display(), source)
            }
            Error::ParseError { file, message } => {
                write!(f, "Failed to parse Java syntax in file {}: {}", file.display(), message)
            }
            Error::GrammarError(msg) => write!(f, "Failed to load Java grammar: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<tree_sitter::LanguageError> for Error {
    fn from(err: tree_sitter::LanguageError) -> Self {
        Error::GrammarError(err.to_string())
    }
}
