use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShabdError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Text cannot be empty")]
    EmptyInput,

    #[error("No training data found; add training pairs before rebuilding")]
    MissingCorpus,

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Malformed training pair: {0}")]
    MalformedPair(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Worker task failed: {0}")]
    Task(String),
}

impl ShabdError {
    /// Stable identifier for the error, used in service responses
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::EmptyInput => "empty_input",
            Self::MissingCorpus => "missing_corpus",
            Self::Persistence(_) => "persistence",
            Self::MalformedPair(_) => "malformed_pair",
            Self::Config(_) => "config",
            Self::FileNotFound(_) => "file_not_found",
            Self::Task(_) => "task",
        }
    }
}

pub type Result<T> = std::result::Result<T, ShabdError>;
