//! Typed errors for the outreach library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Expected failure modes (network trouble, missing data, empty search
//! results) never cross component boundaries as errors - collaborators
//! return sentinel "no result" values instead. The variants here cover
//! the failures a stage genuinely needs to distinguish: durable-store
//! trouble, provider-level errors (distinct from "zero results"),
//! mailbox trouble, and missing configuration.

use thiserror::Error;

/// Errors raised by a ledger store implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem operation failed
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding/decoding failed at the file level
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised by a search provider.
///
/// An `Err` is a provider-level failure and is explicitly distinguishable
/// from an `Ok` page with zero results - the discovery chain escalates to
/// the next tier on `Err`, but stops paginating on an empty page.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Transport failed (connect, timeout, TLS)
    #[error("provider transport error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider answered with an error payload or non-success status
    #[error("provider API error: {message}")]
    Api { message: String },

    /// Response body could not be interpreted
    #[error("provider response parse error: {0}")]
    Parse(String),
}

/// Errors raised by mail collaborators.
#[derive(Debug, Error)]
pub enum MailError {
    /// Transport failed
    #[error("mail transport error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Mail service answered with an error status
    #[error("mail API error: {message}")]
    Api { message: String },
}

/// Top-level error for pipeline stage invocations.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Durable store failed - fatal to the stage, previously-saved rows are intact
    #[error("ledger store failed: {0}")]
    Store(#[from] StoreError),

    /// A required credential or setting is absent - fatal to the stage only
    #[error("missing configuration: {0}")]
    Config(&'static str),

    /// Mailbox access failed at stage scope
    #[error("mailbox unavailable: {0}")]
    Mailbox(#[from] MailError),
}

/// Result type alias for stage operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type alias for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;
