// crates/content-gate-client/src/error.rs
// ============================================================================
// Module: Platform API Errors
// Description: Structured errors for content platform calls.
// Purpose: Carry a machine-inspectable message for signature rewriting.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Platform failures keep the upstream message text intact: the handler layer
//! rewrites known failure signatures by substring matching, so the message
//! must survive the trip through this type unmodified.

use thiserror::Error;

/// Content platform call failure.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The platform rejected the request.
    #[error("{message}")]
    Upstream {
        /// HTTP status code reported by the platform.
        status: u16,
        /// Raw upstream message text, preserved for signature matching.
        message: String,
    },
    /// The request never produced a platform response.
    #[error("platform transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Returns the raw message text used for signature matching.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Upstream {
                message, ..
            } => message.clone(),
            Self::Transport(message) => message.clone(),
        }
    }
}
