use symgraph_graph::GraphError;
use thiserror::Error;

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewerError>;

#[derive(Error, Debug)]
pub enum ViewerError {
    /// Graph could not be embedded into the page
    #[error("Failed to embed graph: {0}")]
    Embed(#[from] GraphError),
}
