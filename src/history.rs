//! In-process run history.
//!
//! The history is an audit trail for the surrounding session: one entry per
//! completed submission, insertion-ordered, append-only, gone when the
//! process exits. Nothing in the pipeline reads it back. It is owned by the
//! caller and passed into [`crate::feedback::generate`] rather than living
//! in a global, so concurrent sessions in a future host can each carry
//! their own.

use crate::request::AssignmentRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed submission: when it ran, what was graded, what came back.
///
/// Never edited after append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Time the submission was recorded.
    pub timestamp: DateTime<Utc>,
    /// Subject of the assignment.
    pub subject: String,
    /// Education level, as displayed.
    pub education_level: String,
    /// The full feedback text (including fallback text on degraded runs).
    pub feedback: String,
}

impl HistoryEntry {
    /// Record an entry for `request` with the produced `feedback`,
    /// timestamped now.
    pub fn record(request: &AssignmentRequest, feedback: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            subject: request.subject.clone(),
            education_level: request.education_level.to_string(),
            feedback: feedback.into(),
        }
    }
}

/// Append-only, insertion-ordered log of past submissions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunHistory {
    entries: Vec<HistoryEntry>,
}

impl RunHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry to the end of the log.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// All entries, oldest first.
    pub fn read_all(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
