use thiserror::Error;

#[derive(Debug, Error)]
pub enum DotnetmanError {
    #[error("Environment variable '{0}' is not set")]
    MissingEnv(&'static str),

    #[error("Invalid version config: {0}")]
    Validation(String),

    #[error("{command} exited with {status}")]
    Subprocess { command: String, status: String },

    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("'{0}' is not a major.minor.patch version")]
    Parse(String),
}

impl DotnetmanError {
    pub fn network(url: &str, reason: impl ToString) -> Self {
        Self::Network {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
