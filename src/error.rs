use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Dockerfile not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read file: {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Dockerfile is empty")]
    EmptyInput,

    #[error("No valid instructions found in Dockerfile")]
    NoInstructions,

    #[error("Parse error at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Optimizer service error: {0}")]
    Optimizer(String),
}

impl AuditError {
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        AuditError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
