//! Error types for scene loading and rendering.

use crate::{ArchiveError, ConfigError};
use thiserror::Error;
use xmg_codec::XmgError;

/// Errors that can occur while loading or drawing scene elements.
#[derive(Debug, Error)]
pub enum SceneError {
    /// The archive has no member with this name; nothing was decoded.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The archive failed for another reason.
    #[error("Archive error: {0}")]
    Archive(#[from] ArchiveError),

    /// The member was found but is not a valid XMG stream.
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: XmgError,
    },

    /// The render target rejected a surface.
    #[error("Rendering failed: {0}")]
    Render(#[from] anyhow::Error),

    /// Scene configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl SceneError {
    /// Returns true if a named resource was missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The decode error behind this failure, if any.
    #[must_use]
    pub fn decode_error(&self) -> Option<&XmgError> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Lift an archive error, promoting a missing member to [`SceneError::NotFound`].
    pub(crate) fn from_archive(err: ArchiveError) -> Self {
        match err {
            ArchiveError::NotFound(name) => Self::NotFound(name),
            other => Self::Archive(other),
        }
    }
}
