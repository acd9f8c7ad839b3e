//! Error types for the assessai-grader library.
//!
//! Three distinct error types reflect three distinct failure modes:
//!
//! * [`GraderError`] — **Fatal**: the submission cannot be processed at all
//!   (no completion client configured, missing purpose, bad config).
//!   Returned as `Err(GraderError)` before the pipeline runs.
//!
//! * [`ExtractionError`] — **Recoverable**: the uploaded document could not
//!   be parsed. The pipeline degrades to an empty document text, surfaces a
//!   warning string on the output, and continues.
//!
//! * [`RequestError`] — **Recoverable**: the remote completion call failed
//!   (auth, rate limit, network, malformed response). The pipeline
//!   substitutes the fixed fallback feedback and completes with no grade.
//!
//! The separation keeps the recovery policy out of the stages themselves:
//! each stage reports what went wrong, and only the orchestrator in
//! [`crate::feedback`] decides what the user sees.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors: the submission was rejected before the pipeline ran,
/// or an output artifact could not be written.
#[derive(Debug, Error)]
pub enum GraderError {
    /// No completion client could be resolved from config or environment.
    #[error("No completion client configured.\n{hint}")]
    ProviderNotConfigured { hint: String },

    /// The assignment purpose was empty or whitespace-only.
    #[error("Please enter the purpose of the assignment.")]
    MissingPurpose,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Could not write the feedback artifact to disk.
    #[error("Failed to write feedback file '{path}': {source}")]
    ArtifactWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A recoverable document-extraction failure.
///
/// The orchestrator converts this into an empty document text plus a
/// warning string; it never aborts the submission.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The payload does not start with the `%PDF` magic bytes.
    #[error("not a PDF document (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    /// The PDF structure could not be parsed.
    #[error("malformed PDF: {detail}")]
    MalformedPdf { detail: String },

    /// The PDF is encrypted; no password handling is supported.
    #[error("PDF is encrypted")]
    Encrypted,
}

/// A recoverable completion-request failure.
///
/// The orchestrator converts this into the fixed fallback feedback string;
/// exactly one attempt is made, so none of these variants is ever retried.
#[derive(Debug, Clone, Error)]
pub enum RequestError {
    /// The API rejected the credentials (HTTP 401/403).
    #[error("authentication failed: {detail}")]
    Auth { detail: String },

    /// The API returned HTTP 429.
    #[error("rate limit exceeded")]
    RateLimit { retry_after_secs: Option<u64> },

    /// The API returned a non-success status not covered above.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The request never completed (DNS, TLS, connection reset, timeout).
    #[error("network error: {detail}")]
    Network { detail: String },

    /// The response body could not be interpreted as a chat completion.
    #[error("malformed response: {detail}")]
    MalformedResponse { detail: String },
}
