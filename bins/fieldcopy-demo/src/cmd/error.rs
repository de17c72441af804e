use fieldcopy::{CopyError, PartialFailure};

use super::domain::Target;

#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    #[error("config: {0}")]
    Config(String),

    #[error("copy: {0}")]
    Copy(#[from] CopyError),

    #[error("batch: {0}")]
    Batch(#[from] PartialFailure<Target>),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}
