use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShowquizError {
    #[error("No database at {0}. Run 'showquiz init' first.")]
    NotInitialized(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ShowquizError {
    pub fn validation(message: impl Into<String>) -> Self {
        ShowquizError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        ShowquizError::NotFound(what.into())
    }

    /// Errors the caller caused (bad input, unknown id), as opposed to store failures.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ShowquizError::Validation(_) | ShowquizError::NotFound(_)
        )
    }
}

impl From<rusqlite::Error> for ShowquizError {
    fn from(e: rusqlite::Error) -> Self {
        ShowquizError::Storage(format!("SQLite error: {}", e))
    }
}

pub type Result<T> = std::result::Result<T, ShowquizError>;
