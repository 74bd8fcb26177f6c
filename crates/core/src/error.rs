use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Batch parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
