use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving and dispatching a documentation lookup.
#[derive(Error, Debug)]
pub enum LookupError {
    /// The resolved text is empty or spans more than one line
    #[error("Invalid selection.")]
    InvalidSelection,

    /// A configured base URL could not be parsed
    #[error("Invalid base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The user config file exists but could not be read or parsed
    #[error("Failed to load config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, LookupError>;

impl LookupError {
    /// Whether the error should be shown to the user rather than only logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::InvalidSelection)
    }
}
