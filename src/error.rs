use thiserror::Error;

/// Errors that can occur while answering a player-equivalence request.
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse { provider: String, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    /// Whether the failure happened on the remote model side of the call.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Error::Http(_)
                | Error::Serialization(_)
                | Error::Provider { .. }
                | Error::MalformedResponse { .. }
        )
    }

    /// Whether the remote call gave up waiting for a response.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_timeout())
    }
}
