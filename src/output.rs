//! Output types: the feedback result, its run envelope, and the
//! downloadable artifact.

use crate::error::GraderError;
use crate::prompts::{ARTIFACT_FILENAME, ARTIFACT_MEDIA_TYPE};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Feedback produced for one submission.
///
/// Produced once per request and never mutated: the text shown on screen,
/// the bytes written to the download artifact, and the text appended to the
/// run history are all this same string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackResult {
    /// Raw feedback text from the model (or the fixed fallback string).
    pub feedback: String,

    /// Numeric grade extracted from the feedback text, if the model emitted
    /// the grade marker. Not bounds-checked: a value above 100 is shown
    /// as-is.
    pub grade: Option<u32>,
}

impl FeedbackResult {
    /// Package the feedback text as a downloadable plain-text artifact.
    ///
    /// The payload is byte-for-byte the feedback text.
    pub fn artifact(&self) -> DownloadArtifact {
        DownloadArtifact {
            filename: ARTIFACT_FILENAME,
            media_type: ARTIFACT_MEDIA_TYPE,
            data: self.feedback.clone().into_bytes(),
        }
    }
}

/// Full result of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackOutput {
    /// The feedback text and extracted grade.
    pub result: FeedbackResult,

    /// Warning to surface when document extraction failed and the prompt was
    /// built without document text. `None` when extraction succeeded or no
    /// PDF was supplied.
    pub extraction_warning: Option<String>,

    /// True when the completion request failed and the fixed fallback
    /// feedback was substituted. A degraded run never carries a grade.
    pub degraded: bool,

    /// Timing and token accounting for the run.
    pub stats: FeedbackStats,
}

/// Statistics about a feedback run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackStats {
    /// Wall-clock duration of the whole pipeline in milliseconds.
    pub total_duration_ms: u64,
    /// Wall-clock duration of the completion request in milliseconds.
    pub request_duration_ms: u64,
    /// Prompt tokens reported by the service (0 on a degraded run).
    pub prompt_tokens: u32,
    /// Completion tokens reported by the service (0 on a degraded run).
    pub completion_tokens: u32,
}

/// A downloadable artifact: filename, media type, and payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadArtifact {
    pub filename: &'static str,
    pub media_type: &'static str,
    pub data: Vec<u8>,
}

impl DownloadArtifact {
    /// Write the artifact to `path` atomically (temp file + rename) so a
    /// crash mid-write never leaves a partial file behind.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<(), GraderError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(|e| {
                    GraderError::ArtifactWriteFailed {
                        path: path.to_path_buf(),
                        source: e,
                    }
                })?;
            }
        }

        let tmp_path = path.with_extension("txt.tmp");
        tokio::fs::write(&tmp_path, &self.data)
            .await
            .map_err(|e| GraderError::ArtifactWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| GraderError::ArtifactWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }
}
