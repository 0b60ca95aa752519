//! Error types for textsplit.

use thiserror::Error;

/// Result type alias using SplitError.
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while configuring or running a splitter.
///
/// Oversized chunks are not errors: they are reported as
/// [`OversizeDiagnostic`](crate::OversizeDiagnostic)s next to the output.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Splitter configuration violates an invariant.
    #[error("Invalid splitter configuration: {message}")]
    InvalidConfig { message: String },

    /// No separator table exists for the requested language tag.
    #[error("Unsupported language: {tag}")]
    UnsupportedLanguage { tag: String },

    /// Unknown splitting strategy name.
    #[error("Unsupported strategy: {name}")]
    UnsupportedStrategy { name: String },

    /// A boundary pattern failed to compile.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Tokenizer backend failure.
    #[error("Tokenizer error: {message}")]
    Tokenizer { message: String },

    /// Input contains a special token the caller did not allow.
    #[error("Text contains disallowed special token: {token}")]
    DisallowedSpecialToken { token: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl SplitError {
    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unsupported language error.
    pub fn unsupported_language(tag: impl Into<String>) -> Self {
        Self::UnsupportedLanguage { tag: tag.into() }
    }

    /// Create a tokenizer error.
    pub fn tokenizer(message: impl Into<String>) -> Self {
        Self::Tokenizer {
            message: message.into(),
        }
    }

    /// Create a configuration file error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error is raised before any splitting happens.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::UnsupportedLanguage { .. }
                | Self::UnsupportedStrategy { .. }
                | Self::InvalidPattern { .. }
                | Self::Config { .. }
        )
    }

    /// Get a stable error code, used by the CLI's JSON error output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "INVALID_CONFIG",
            Self::UnsupportedLanguage { .. } => "UNSUPPORTED_LANGUAGE",
            Self::UnsupportedStrategy { .. } => "UNSUPPORTED_STRATEGY",
            Self::InvalidPattern { .. } => "INVALID_PATTERN",
            Self::Tokenizer { .. } => "TOKENIZER_ERROR",
            Self::DisallowedSpecialToken { .. } => "DISALLOWED_SPECIAL_TOKEN",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Config { .. } => "CONFIG_ERROR",
        }
    }
}
