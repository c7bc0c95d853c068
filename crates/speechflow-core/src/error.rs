//! Error types for the Speechflow segmentation engine.
//!
//! Segmentation itself never fails on text content. Errors only come from
//! constructing a session with bad configuration, loading configuration
//! from disk, or addressing a session that no longer exists.

/// Result type alias for Speechflow operations
pub type SpeechflowResult<T> = Result<T, SpeechflowError>;

/// Main error type for Speechflow operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechflowError {
    /// Configuration values are out of range
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message describing the offending value
        message: String,
    },

    /// Configuration text could not be decoded
    #[error("Configuration parse error: {message}")]
    ConfigParse {
        /// Error message from the decoder
        message: String,
    },

    /// File I/O error
    #[error("File I/O error: {message}")]
    FileError {
        /// Error message describing the file operation failure
        message: String,
    },

    /// Session id not present in the registry
    #[error("Session '{session_id}' not found")]
    SessionNotFound {
        /// The session id that was looked up
        session_id: String,
    },
}

impl SpeechflowError {
    /// Create a new invalid configuration error
    #[must_use]
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create a new configuration parse error
    #[must_use]
    pub fn config_parse<S: Into<String>>(message: S) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Create a new file error
    #[must_use]
    pub fn file<S: Into<String>>(message: S) -> Self {
        Self::FileError {
            message: message.into(),
        }
    }

    /// Create a new session not found error
    #[must_use]
    pub fn session_not_found<S: Into<String>>(session_id: S) -> Self {
        Self::SessionNotFound {
            session_id: session_id.into(),
        }
    }

    /// Check if this error is due to invalid user input
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration { .. } | Self::ConfigParse { .. }
        )
    }

    /// Get the error category for logging
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration { .. } => "configuration",
            Self::ConfigParse { .. } => "config_parse",
            Self::FileError { .. } => "file",
            Self::SessionNotFound { .. } => "session",
        }
    }
}

impl From<std::io::Error> for SpeechflowError {
    fn from(err: std::io::Error) -> Self {
        Self::file(err.to_string())
    }
}

impl From<toml::de::Error> for SpeechflowError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_parse(err.to_string())
    }
}
