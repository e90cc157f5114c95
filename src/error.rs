//! Error types for the deck rendering pipeline

use serde::Serialize;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy of one deck-generation request.
///
/// Every variant is terminal for the whole request: there are no automatic
/// retries and partial decks are never returned. The orchestrator's only
/// recovery duty on any of these is releasing the browser session.
#[derive(Error, Debug)]
pub enum Error {
    /// Input rejected before any session was acquired
    #[error("invalid request: {0}")]
    Validation(String),

    /// The browser process or tab failed to start
    #[error("browser session failed to start: {0}")]
    BrowserLaunch(String),

    /// A slide's load signal never fired within the configured bound
    #[error("slide {index} did not finish loading within {timeout_ms}ms")]
    RenderTimeout { index: usize, timeout_ms: u64 },

    /// A slide's capture failed for a reason other than timeout
    #[error("slide {index} failed to render: {detail}")]
    RenderContent { index: usize, detail: String },

    /// PDF composition failed after all slides rendered
    #[error("PDF assembly failed: {0}")]
    Assembly(String),

    /// Infrastructure fault outside the pipeline taxonomy
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Stable machine-readable kind, for logging and boundary dispatch.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::BrowserLaunch(_) => "browser_launch",
            Error::RenderTimeout { .. } => "render_timeout",
            Error::RenderContent { .. } => "render_content",
            Error::Assembly(_) => "assembly",
            Error::Other(_) => "other",
        }
    }

    /// Build the structured payload exposed to external callers.
    ///
    /// `details` carries the raw internal failure text and is only populated
    /// when the caller opted into verbose diagnostics; the default payload
    /// exposes the stable human-readable message alone.
    pub fn to_payload(&self, verbose_diagnostics: bool) -> ErrorPayload {
        ErrorPayload {
            error: "Failed to generate PDF".to_string(),
            kind: self.kind().to_string(),
            details: verbose_diagnostics.then(|| self.to_string()),
        }
    }
}

/// Structured failure payload for the boundary layer.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    /// Human-readable failure indicator
    pub error: String,
    /// Machine-readable failure kind
    pub kind: String,
    /// Raw diagnostic detail, present only in verbose-diagnostics mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
