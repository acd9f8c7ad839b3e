//! # assessai-grader
//!
//! Automated assignment feedback and grading via LLM chat completions.
//!
//! Given assignment metadata and an optional uploaded document, the crate
//! builds a fixed feedback prompt, sends it to an OpenAI-compatible
//! chat-completion endpoint, and returns the response text together with a
//! numeric grade extracted from it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! submission
//!  │
//!  ├─ 1. Extract  pull page text out of a PDF upload (lopdf)
//!  ├─ 2. Prompt   render metadata + document text into the fixed template
//!  ├─ 3. Request  one chat-completion call (system + user message)
//!  ├─ 4. Grade    scan the reply for the first "Final Grade:" integer
//!  └─ 5. History  append the run to the in-process log
//! ```
//!
//! Failures degrade instead of aborting: an unreadable PDF yields a warning
//! and an empty document text; a failed completion call yields a fixed
//! fallback feedback with no grade. The only pre-pipeline errors are a
//! missing purpose and a missing API credential.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use assessai_grader::{
//!     generate, AssignmentRequest, Document, EducationLevel, FeedbackConfig, RunHistory,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let request = AssignmentRequest::builder()
//!         .subject("Mathematics")
//!         .education_level(EducationLevel::HighSchool)
//!         .purpose("Assess understanding of quadratic equations")
//!         .correctness_weight(60)
//!         .explanation_weight(40)
//!         .build()?;
//!
//!     let bytes = std::fs::read("submission.pdf")?;
//!     let document = Document::new(bytes, "application/pdf");
//!
//!     // API key read from OPENAI_API_KEY
//!     let config = FeedbackConfig::default();
//!     let mut history = RunHistory::new();
//!
//!     let output = generate(&request, Some(&document), &config, &mut history).await?;
//!     println!("{}", output.result.feedback);
//!     if let Some(grade) = output.result.grade {
//!         println!("Final Grade: {grade}/100");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `assessai` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! assessai-grader = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod feedback;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FeedbackConfig, FeedbackConfigBuilder, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{ExtractionError, GraderError, RequestError};
pub use feedback::{generate, generate_sync};
pub use history::{HistoryEntry, RunHistory};
pub use output::{DownloadArtifact, FeedbackOutput, FeedbackResult, FeedbackStats};
pub use pipeline::llm::{ChatMessage, Completion, CompletionClient, CompletionOptions, OpenAiClient};
pub use request::{AnswerFormat, AssignmentRequest, AssignmentRequestBuilder, Document, EducationLevel};
