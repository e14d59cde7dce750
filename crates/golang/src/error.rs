use std::path::PathBuf;
use thiserror::Error;

/// Result type for Go loading operations
pub type Result<T> = std::result::Result<T, GoError>;

/// Errors that abort loading a Go program
#[derive(Error, Debug)]
pub enum GoError {
    /// Failed to read a file or directory
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No go.mod above the working directory
    #[error("go.mod not found in {} or any parent directory", .0.display())]
    NoModule(PathBuf),

    /// go.mod without a module directive
    #[error("Invalid go.mod at {}: missing module directive", .0.display())]
    InvalidModule(PathBuf),

    /// Pattern matched nothing loadable
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Directory named explicitly contains no Go files
    #[error("No Go files in {}", .0.display())]
    NoGoFiles(PathBuf),

    /// Parser reported a syntax error
    #[error("Syntax error: {file}:{line}:{column}")]
    Syntax {
        file: String,
        line: usize,
        column: usize,
    },

    /// Two package clauses in one directory
    #[error("Found packages {first} and {second} in {}", dir.display())]
    MixedPackages {
        dir: PathBuf,
        first: String,
        second: String,
    },

    /// Tree-sitter error
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),
}

impl GoError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn tree_sitter(msg: impl Into<String>) -> Self {
        Self::TreeSitter(msg.into())
    }
}
