//! Error types for KBQ Core

use thiserror::Error;

use crate::query::Mode;

#[derive(Error, Debug)]
pub enum KbqError {
    #[error("Unsupported operation for {mode} mode: {operation}")]
    UnsupportedOperation { mode: Mode, operation: &'static str },

    #[error("Unknown FTS mode: [{0}]")]
    UnknownFtsEngine(String),

    #[error("{message} while running query:\n{query}")]
    QueryEvaluation { message: String, query: String },

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid IRI <{iri}>: {message}")]
    InvalidIri { iri: String, message: String },
}

impl KbqError {
    /// Attach the query text to a failure raised while talking to a repository.
    pub fn while_running(self, query: &str) -> Self {
        match self {
            KbqError::QueryEvaluation { .. } => self,
            KbqError::Repository(message) => KbqError::QueryEvaluation {
                message,
                query: query.to_string(),
            },
            other => KbqError::QueryEvaluation {
                message: other.to_string(),
                query: query.to_string(),
            },
        }
    }

    /// True for errors raised while constructing a query, as opposed to running one.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            KbqError::UnsupportedOperation { .. }
                | KbqError::UnknownFtsEngine(_)
                | KbqError::Config(_)
                | KbqError::InvalidIri { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, KbqError>;
