use crate::engine::EngineError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid semantic tree: {message}")]
    InvalidTree { message: String },

    #[error("semantic tree JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid view config: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("semantic engine not ready after {attempts} attempts")]
    EngineNotReady { attempts: u32 },
}
