//! Submission value objects: assignment metadata and the uploaded document.
//!
//! An [`AssignmentRequest`] is constructed fresh per submission through its
//! builder and never mutated afterwards. The builder re-checks the one
//! precondition the surrounding form layer is supposed to enforce (purpose
//! non-empty) so the pipeline can rely on it unconditionally.

use crate::error::GraderError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Education level of the submitting student.
///
/// Fixed set; rendered into the prompt via `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EducationLevel {
    Elementary,
    Middle,
    #[default]
    HighSchool,
    University,
    Bachelors,
    Masters,
    Postgraduate,
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EducationLevel::Elementary => "Elementary School",
            EducationLevel::Middle => "Middle School",
            EducationLevel::HighSchool => "High School",
            EducationLevel::University => "University",
            EducationLevel::Bachelors => "Bachelors degree",
            EducationLevel::Masters => "Masters degree",
            EducationLevel::Postgraduate => "Postgraduate",
        };
        f.write_str(s)
    }
}

/// Expected answer format of the assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnswerFormat {
    #[default]
    Mcq,
    Frq,
    CodeSubmission,
    Essay,
    ShortAnswer,
}

impl fmt::Display for AnswerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnswerFormat::Mcq => "MCQ",
            AnswerFormat::Frq => "FRQ",
            AnswerFormat::CodeSubmission => "Code Submission",
            AnswerFormat::Essay => "Essay",
            AnswerFormat::ShortAnswer => "Short Answer",
        };
        f.write_str(s)
    }
}

/// Immutable assignment metadata for one submission.
///
/// Built via [`AssignmentRequest::builder()`]. The two weights are clamped
/// to 0–100 independently; their sum is intentionally not constrained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Subject of the assignment (free text).
    pub subject: String,
    /// Education level of the student.
    pub education_level: EducationLevel,
    /// Purpose of the assignment (free text, never empty).
    pub purpose: String,
    /// Weight of answer correctness in percent (0–100).
    pub correctness_weight: u8,
    /// Weight of explanation quality in percent (0–100).
    pub explanation_weight: u8,
    /// Expected answer format.
    pub answer_format: AnswerFormat,
}

impl AssignmentRequest {
    /// Create a new builder with the default field values
    /// (High School, MCQ, both weights 50).
    pub fn builder() -> AssignmentRequestBuilder {
        AssignmentRequestBuilder::default()
    }
}

/// Builder for [`AssignmentRequest`].
#[derive(Debug, Default)]
pub struct AssignmentRequestBuilder {
    subject: String,
    education_level: EducationLevel,
    purpose: String,
    correctness_weight: Option<u8>,
    explanation_weight: Option<u8>,
    answer_format: AnswerFormat,
}

impl AssignmentRequestBuilder {
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn education_level(mut self, level: EducationLevel) -> Self {
        self.education_level = level;
        self
    }

    pub fn purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = purpose.into();
        self
    }

    pub fn correctness_weight(mut self, weight: u8) -> Self {
        self.correctness_weight = Some(weight.min(100));
        self
    }

    pub fn explanation_weight(mut self, weight: u8) -> Self {
        self.explanation_weight = Some(weight.min(100));
        self
    }

    pub fn answer_format(mut self, format: AnswerFormat) -> Self {
        self.answer_format = format;
        self
    }

    /// Build the request, rejecting an empty or whitespace-only purpose.
    pub fn build(self) -> Result<AssignmentRequest, GraderError> {
        if self.purpose.trim().is_empty() {
            return Err(GraderError::MissingPurpose);
        }
        Ok(AssignmentRequest {
            subject: self.subject,
            education_level: self.education_level,
            purpose: self.purpose,
            correctness_weight: self.correctness_weight.unwrap_or(50),
            explanation_weight: self.explanation_weight.unwrap_or(50),
            answer_format: self.answer_format,
        })
    }
}

/// An uploaded document: raw bytes plus the MIME type reported by the
/// upload layer.
///
/// Only `application/pdf` payloads are text-extracted; image uploads are
/// accepted but contribute no document text (OCR is out of scope).
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    mime_type: String,
}

impl Document {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Whether the upload layer declared this payload a PDF.
    pub fn is_pdf(&self) -> bool {
        self.mime_type == "application/pdf"
    }
}
