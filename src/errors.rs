use thiserror::Error;

/// Failures raised while talking to the banking API.
///
/// Business rejections (`success: false`, non-2xx with an `error` field) are
/// not errors; they come back as regular values from [`crate::api::BankApi`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("server answered with HTTP {0}")]
    Status(u16),
    #[error("invalid API URL `{0}`")]
    InvalidUrl(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors raised while loading, editing, or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Fatal errors that end the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("failed to start async runtime: {0}")]
    Runtime(std::io::Error),
}
