use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Invalid graph JSON: {0}")]
    Json(#[from] serde_json::Error),
}
