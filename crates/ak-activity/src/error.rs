use ak_core::AkError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("activity name already in use: {0}")]
    NameInUse(String),

    #[error("kernel error: {0}")]
    Core(#[from] AkError),
}

pub type ActivityResult<T> = Result<T, ActivityError>;
