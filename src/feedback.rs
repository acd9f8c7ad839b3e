//! Feedback generation entry points.
//!
//! One submission triggers one sequential pipeline run:
//! extract → build prompt → request → parse grade → append history.
//! The run is synchronous from the caller's point of view — the completion
//! request blocks the submission for its full duration and cannot be
//! cancelled once sent.
//!
//! ## Recovery policy
//!
//! Nothing past client resolution returns `Err`. A broken upload degrades
//! to an empty document text plus a warning; a failed completion call
//! degrades to the fixed fallback feedback with no grade. The submission
//! always completes and is always recorded in the history.

use crate::config::FeedbackConfig;
use crate::error::GraderError;
use crate::history::{HistoryEntry, RunHistory};
use crate::output::{FeedbackOutput, FeedbackResult, FeedbackStats};
use crate::pipeline::llm::{self, CompletionClient, OpenAiClient};
use crate::pipeline::{extract, grade, prompt};
use crate::prompts::{FALLBACK_FEEDBACK, SYSTEM_PROMPT};
use crate::request::{AssignmentRequest, Document};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate feedback for one assignment submission.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `request`  — assignment metadata, validated at construction
/// * `document` — the uploaded file, if any; only PDFs are text-extracted
/// * `config`   — service constants and client selection
/// * `history`  — caller-owned run log; one entry is appended per call
///
/// # Errors
/// Returns `Err(GraderError)` only when no completion client can be
/// resolved — every failure after that point is recovered into degraded
/// output (check `output.degraded` and `output.extraction_warning`).
pub async fn generate(
    request: &AssignmentRequest,
    document: Option<&Document>,
    config: &FeedbackConfig,
    history: &mut RunHistory,
) -> Result<FeedbackOutput, GraderError> {
    let total_start = Instant::now();
    info!("Generating feedback: subject='{}'", request.subject);

    let client = resolve_client(config)?;

    // ── Step 1: Extract document text ────────────────────────────────────
    let (document_text, extraction_warning) = match document {
        Some(doc) if doc.is_pdf() => match extract::extract_text(doc.bytes()) {
            Ok(text) => {
                debug!("Extracted {} bytes of document text", text.len());
                (text, None)
            }
            Err(e) => {
                warn!("Document extraction failed: {}", e);
                (String::new(), Some(format!("Error reading PDF file: {e}")))
            }
        },
        // Image uploads are accepted but carry no extractable text (no OCR).
        _ => (String::new(), None),
    };

    // ── Step 2: Build the prompt ─────────────────────────────────────────
    let user_prompt = prompt::build_prompt(request, &document_text);
    let system_prompt = config.system_prompt.as_deref().unwrap_or(SYSTEM_PROMPT);

    // ── Step 3: Request the completion (single attempt) ──────────────────
    let request_start = Instant::now();
    let (feedback, degraded, prompt_tokens, completion_tokens) =
        match llm::request_feedback(&client, system_prompt, &user_prompt, config).await {
            Ok(completion) => (
                completion.content,
                false,
                completion.prompt_tokens,
                completion.completion_tokens,
            ),
            Err(e) => {
                warn!("Feedback request failed: {}", e);
                (FALLBACK_FEEDBACK.to_string(), true, 0, 0)
            }
        };
    let request_duration_ms = request_start.elapsed().as_millis() as u64;

    // ── Step 4: Extract the grade ────────────────────────────────────────
    let grade = grade::extract_grade(&feedback);

    // ── Step 5: Record the run ───────────────────────────────────────────
    history.append(HistoryEntry::record(request, &feedback));

    let stats = FeedbackStats {
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        request_duration_ms,
        prompt_tokens,
        completion_tokens,
    };

    info!(
        "Feedback complete: degraded={}, grade={:?}, {}ms",
        degraded, grade, stats.total_duration_ms
    );

    Ok(FeedbackOutput {
        result: FeedbackResult { feedback, grade },
        extraction_warning,
        degraded,
        stats,
    })
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    request: &AssignmentRequest,
    document: Option<&Document>,
    config: &FeedbackConfig,
    history: &mut RunHistory,
) -> Result<FeedbackOutput, GraderError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| GraderError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(request, document, config, history))
}

/// Resolve the completion client, from most-specific to least-specific.
///
/// 1. **Pre-built client** (`config.client`) — the caller constructed it
///    entirely; used as-is. This is also the test seam.
///
/// 2. **Explicit API key** (`config.api_key`) — an [`OpenAiClient`] against
///    `config.base_url`.
///
/// 3. **Environment** (`OPENAI_API_KEY`) — credential provisioning is an
///    external concern, so the environment variable is the last resort
///    rather than a config field.
fn resolve_client(config: &FeedbackConfig) -> Result<Arc<dyn CompletionClient>, GraderError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }

    if let Some(ref key) = config.api_key {
        let client = OpenAiClient::new(key.clone()).with_base_url(config.base_url.clone());
        return Ok(Arc::new(client));
    }

    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        if !key.is_empty() {
            let client = OpenAiClient::new(key).with_base_url(config.base_url.clone());
            return Ok(Arc::new(client));
        }
    }

    Err(GraderError::ProviderNotConfigured {
        hint: "Set OPENAI_API_KEY, or provide FeedbackConfig::api_key, \
               or inject a client via FeedbackConfig::client."
            .to_string(),
    })
}
