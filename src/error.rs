use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or configuring a vortex field.
#[derive(Debug, Error)]
pub enum VortexError {
    /// A configuration value violates a precondition of the animator.
    #[error("invalid config `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("invalid color {0:?}: expected #rgb, #rrggbb or #rrggbbaa")]
    Color(String),

    #[error("failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown preset {0:?} (expected default, landing or dashboard)")]
    UnknownPreset(String),
}

impl VortexError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
