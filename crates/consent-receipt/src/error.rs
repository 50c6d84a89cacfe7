//! Error types for the consent receipt crate
//!
//! Label and receipt derivation never fail. Errors only arise at the edges:
//! - Parsing raw keys and drafts supplied by the interaction layer
//! - Loading configuration
//! - Handing the receipt to a file sink

use std::path::PathBuf;

/// Main consent error type
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    /// Route key not in `now|later|anon`
    #[error("unknown route: '{0}'")]
    UnknownRoute(String),

    /// Timing key not in `now|end|custom`
    #[error("unknown notify timing: '{0}'")]
    UnknownTiming(String),

    /// Contact key not in `counsellor|parent|lead`
    #[error("unknown contact: '{0}'")]
    UnknownContact(String),

    /// Expiry draft is not a number
    #[error("invalid expiry draft: '{0}' is not a number")]
    InvalidExpiryDraft(String),

    /// Receipt identifier is malformed or out of range
    #[error("invalid receipt id: '{0}' (expected CL-CR-##### in 10000..=99999)")]
    InvalidReceiptId(String),

    /// Sink failed to write the receipt
    #[error("io error exporting {path}: {source}")]
    Export {
        /// Where the receipt was being written
        path: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// Export file name is not a single plain file name
    #[error("invalid export file name: '{0}' (must be a bare file name)")]
    InvalidFileName(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// JSON serialization failed
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ConsentError {
    /// Create export error for path
    pub fn export_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Export {
            path: path.into(),
            source,
        }
    }

    /// Check if error came from parsing interaction input
    #[inline]
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownRoute(_)
                | Self::UnknownTiming(_)
                | Self::UnknownContact(_)
                | Self::InvalidExpiryDraft(_)
                | Self::InvalidReceiptId(_)
        )
    }
}
