use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Server is not running on {addr}: {source}")]
    UnreachableServer {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Wraps an I/O failure or elapsed deadline as a recoverable connection error.
    pub fn connection(cause: impl std::fmt::Display) -> Self {
        Self::Connection(cause.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
