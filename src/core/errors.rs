//! CLN-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, CleanError>;

/// Top-level error type for the entry expiration cleaner.
#[derive(Debug, Error)]
pub enum CleanError {
    #[error("[CLN-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CLN-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[CLN-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CLN-1101] {details}")]
    InvalidArgument { details: String },

    #[error("[CLN-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[CLN-2102] store failure in {context}: {details}")]
    Store {
        context: &'static str,
        details: String,
    },

    #[error("[CLN-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CleanError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CLN-1001",
            Self::MissingConfig { .. } => "CLN-1002",
            Self::ConfigParse { .. } => "CLN-1003",
            Self::InvalidArgument { .. } => "CLN-1101",
            Self::Serialization { .. } => "CLN-2101",
            Self::Store { .. } => "CLN-2102",
            Self::Io { .. } => "CLN-3002",
        }
    }

    /// Whether the failure was caused by operator input rather than the environment.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. }
                | Self::MissingConfig { .. }
                | Self::ConfigParse { .. }
                | Self::InvalidArgument { .. }
        )
    }

    /// Convenience constructor for argument failures.
    #[must_use]
    pub fn invalid_argument(details: impl Into<String>) -> Self {
        Self::InvalidArgument {
            details: details.into(),
        }
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for CleanError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store {
            context: "rusqlite",
            details: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for CleanError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for CleanError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
