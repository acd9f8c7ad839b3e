//! Prompt and message constants for the feedback pipeline.
//!
//! Centralising every fixed string here serves two purposes:
//!
//! 1. **Single source of truth** — the grade marker appears in the prompt
//!    template *and* in the extraction regex; keeping the literal in one
//!    place makes it impossible for the two to drift apart silently.
//!
//! 2. **Testability** — unit tests can assert against the exact strings
//!    without spinning up a real completion endpoint.
//!
//! Callers can override the system prompt via
//! [`crate::config::FeedbackConfig::system_prompt`]; the constants here are
//! used only when no override is provided.

/// System instruction sent with every feedback request.
pub const SYSTEM_PROMPT: &str = "You are an experienced educator and autograder. \
Provide detailed feedback and assign points based on the assignment details. \
Ensure to include a final numerical grade as specified.";

/// Literal marker the model is instructed to emit before the numeric grade.
///
/// Matching is case-sensitive; [`crate::pipeline::grade`] scans for exactly
/// this prefix followed by an integer.
pub const GRADE_MARKER: &str = "Final Grade:";

/// Fixed feedback substituted when the completion request fails.
///
/// Shown verbatim to the user; contains no grade marker, so a degraded run
/// never produces a numeric grade.
pub const FALLBACK_FEEDBACK: &str =
    "Unable to generate feedback at this time. Please try again later.";

/// File name of the downloadable feedback artifact.
pub const ARTIFACT_FILENAME: &str = "assignment_feedback.txt";

/// Media type of the downloadable feedback artifact.
pub const ARTIFACT_MEDIA_TYPE: &str = "text/plain";
