//! Error types for Nestegg

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Input to a prompt builder or loader is insufficient; nothing was sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// The AI endpoint answered with a failure or an unusable body
    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl Error {
    /// True for failures reaching or talking to the AI endpoint
    pub fn is_external_service(&self) -> bool {
        matches!(self, Error::ExternalService(_) | Error::Http(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
