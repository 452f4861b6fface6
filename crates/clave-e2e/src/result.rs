//! Result and error types for Clave.

use thiserror::Error;

/// Result type for Clave operations
pub type ClaveResult<T> = Result<T, ClaveError>;

/// Errors that can occur in Clave
#[derive(Debug, Error)]
pub enum ClaveError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser or driver launch failure. Fatal: aborts the run.
    #[error("Failed to provision browser: {message}")]
    Provisioning {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Script evaluation error
    #[error("Script evaluation failed: {message}")]
    Script {
        /// Error message
        message: String,
    },

    /// A wait that is a hard precondition ran out of budget
    #[error("Element wait timed out after {ms}ms")]
    ElementTimeout {
        /// Wait budget in milliseconds
        ms: u64,
    },

    /// Input simulation error
    #[error("Input simulation failed: {message}")]
    Input {
        /// Error message
        message: String,
    },

    /// Clipboard read failure
    #[error("Clipboard read failed: {message}")]
    Clipboard {
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A scenario check failed
    #[error("Assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
