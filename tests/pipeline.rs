//! End-to-end pipeline tests for assessai-grader.
//!
//! These tests run fully offline: the completion endpoint is replaced by a
//! scripted [`CompletionClient`] injected through `FeedbackConfig::client`,
//! and the PDF fixtures are built in memory with lopdf.

use assessai_grader::{
    generate, generate_sync, AnswerFormat, AssignmentRequest, ChatMessage, Completion,
    CompletionClient, CompletionOptions, Document, EducationLevel, FeedbackConfig, RequestError,
    RunHistory,
};
use async_trait::async_trait;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Object, Stream};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A completion client that returns a scripted reply (or failure) and
/// records every conversation it was asked to complete.
struct ScriptedClient {
    reply: Result<String, RequestError>,
    seen: Mutex<Vec<(Vec<ChatMessage>, CompletionOptions)>>,
}

impl ScriptedClient {
    fn replying(content: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(content.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(error: RequestError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(error),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn last_user_prompt(&self) -> String {
        let seen = self.seen.lock().unwrap();
        let (messages, _) = seen.last().expect("no request was recorded");
        messages
            .iter()
            .find(|m| m.role == "user")
            .expect("no user message in conversation")
            .content
            .clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<Completion, RequestError> {
        self.seen
            .lock()
            .unwrap()
            .push((messages.to_vec(), options.clone()));
        match &self.reply {
            Ok(content) => Ok(Completion {
                content: content.clone(),
                prompt_tokens: 120,
                completion_tokens: 80,
            }),
            Err(e) => Err(e.clone()),
        }
    }
}

fn config_with(client: Arc<ScriptedClient>) -> FeedbackConfig {
    FeedbackConfig::builder().client(client).build().unwrap()
}

fn request() -> AssignmentRequest {
    AssignmentRequest::builder()
        .subject("Mathematics")
        .education_level(EducationLevel::HighSchool)
        .purpose("Assess understanding of quadratic equations")
        .correctness_weight(60)
        .explanation_weight(40)
        .answer_format(AnswerFormat::Frq)
        .build()
        .unwrap()
}

/// Build a minimal well-formed PDF with one page per entry in `pages`.
fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let mut doc = lopdf::Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 24.into()]),
                Operation::new("Td", vec![100.into(), 600.into()]),
                Operation::new("Tj", vec![Object::string_literal(*page_text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// Mark a saved PDF as encrypted by adding a Standard security handler
/// dictionary (with dummy O/U entries) to the trailer and re-saving.
fn with_encrypt_trailer(bytes: &[u8]) -> Vec<u8> {
    let mut doc = lopdf::Document::load_mem(bytes).unwrap();
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::String(vec![0u8; 32], lopdf::StringFormat::Hexadecimal),
        "U" => Object::String(vec![0u8; 32], lopdf::StringFormat::Hexadecimal),
        "P" => -44,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        Object::Array(vec![
            Object::String(vec![1u8; 16], lopdf::StringFormat::Hexadecimal),
            Object::String(vec![1u8; 16], lopdf::StringFormat::Hexadecimal),
        ]),
    );

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

const GOOD_REPLY: &str = "Positive areas:\n\
- Clear setup of both equations\n\
- Correct use of the quadratic formula\n\n\
Could be improved:\n\
- Show the discriminant before simplifying\n\
- The sign error in step 3 flips the second root\n\
- Label which root answers the word problem\n\n\
Final Grade: 87/100";

// ── Success path ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_run_extracts_grade_and_records_history() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let document = Document::new(build_pdf(&["2x^2 + 3x - 2 = 0"]), "application/pdf");
    let output = generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();

    assert_eq!(output.result.feedback, GOOD_REPLY);
    assert_eq!(output.result.grade, Some(87));
    assert!(!output.degraded);
    assert!(output.extraction_warning.is_none());
    assert_eq!(output.stats.prompt_tokens, 120);
    assert_eq!(output.stats.completion_tokens, 80);

    assert_eq!(history.len(), 1);
    let entry = &history.read_all()[0];
    assert_eq!(entry.subject, "Mathematics");
    assert_eq!(entry.education_level, "High School");
    assert_eq!(entry.feedback, GOOD_REPLY);
}

#[tokio::test]
async fn prompt_carries_metadata_and_extracted_document_text() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let document = Document::new(build_pdf(&["Hello", "World"]), "application/pdf");
    generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();

    let prompt = client.last_user_prompt();
    assert!(prompt.contains("Subject: Mathematics"));
    assert!(prompt.contains("Education Level: High School"));
    assert!(prompt.contains("Correctness Weight: 60%"));
    assert!(prompt.contains("Explanation Weight: 40%"));
    assert!(prompt.contains("Answer Format: FRQ"));
    assert!(prompt.contains("Assignment Content (extracted from uploaded PDF):\nHello\nWorld\n"));

    // Service constants travel with the request.
    let seen = client.seen.lock().unwrap();
    let (messages, options) = seen.last().unwrap();
    assert_eq!(messages[0].role, "system");
    assert_eq!(options.model, "gpt-3.5-turbo");
    assert_eq!(options.max_tokens, 300);
    assert_eq!(options.temperature, 0.7);
}

#[tokio::test]
async fn identical_submissions_send_identical_prompts() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let document = Document::new(build_pdf(&["Same answer"]), "application/pdf");
    generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();
    let first = client.last_user_prompt();
    generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();
    let second = client.last_user_prompt();

    assert_eq!(first, second);
}

// ── Degraded paths ───────────────────────────────────────────────────────────

#[tokio::test]
async fn request_failure_yields_fallback_and_no_grade() {
    let client = ScriptedClient::failing(RequestError::Network {
        detail: "connection reset by peer".into(),
    });
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate(&request(), None, &config, &mut history)
        .await
        .unwrap();

    assert_eq!(
        output.result.feedback,
        "Unable to generate feedback at this time. Please try again later."
    );
    assert_eq!(output.result.grade, None);
    assert!(output.degraded);
    assert_eq!(output.stats.prompt_tokens, 0);

    // Degraded runs are still recorded.
    assert_eq!(history.len(), 1);
    assert_eq!(history.read_all()[0].feedback, output.result.feedback);
}

#[tokio::test]
async fn rate_limit_failure_degrades_the_same_way() {
    let client = ScriptedClient::failing(RequestError::RateLimit {
        retry_after_secs: Some(60),
    });
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate(&request(), None, &config, &mut history)
        .await
        .unwrap();
    assert!(output.degraded);
    assert_eq!(output.result.grade, None);
}

#[tokio::test]
async fn unreadable_pdf_degrades_to_warning_and_empty_text() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let document = Document::new(b"definitely not a pdf".to_vec(), "application/pdf");
    let output = generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();

    // The run completed against an empty document text.
    assert!(output.extraction_warning.is_some());
    assert!(!output.degraded);
    assert_eq!(output.result.grade, Some(87));
    assert!(!client.last_user_prompt().contains("Assignment Content"));
}

#[tokio::test]
async fn encrypted_pdf_degrades_to_warning_and_empty_text() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let bytes = with_encrypt_trailer(&build_pdf(&["locked submission"]));
    let document = Document::new(bytes, "application/pdf");
    let output = generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();

    // Encryption is an extraction failure, not a pipeline failure: the run
    // completes against an empty document text and surfaces a warning.
    let warning = output.extraction_warning.expect("expected a warning");
    assert!(warning.starts_with("Error reading PDF file:"));
    assert!(!output.degraded);
    assert_eq!(output.result.grade, Some(87));
    assert!(!client.last_user_prompt().contains("Assignment Content"));
}

#[tokio::test]
async fn image_upload_is_accepted_without_extraction() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(Arc::clone(&client));
    let mut history = RunHistory::new();

    let document = Document::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png");
    let output = generate(&request(), Some(&document), &config, &mut history)
        .await
        .unwrap();

    assert!(output.extraction_warning.is_none());
    assert!(!client.last_user_prompt().contains("Assignment Content"));
}

// ── Grade extraction through the pipeline ────────────────────────────────────

#[tokio::test]
async fn first_grade_marker_wins() {
    let client = ScriptedClient::replying("Final Grade: 5 ... Final Grade: 99");
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate(&request(), None, &config, &mut history)
        .await
        .unwrap();
    assert_eq!(output.result.grade, Some(5));
}

#[tokio::test]
async fn missing_marker_is_a_valid_outcome() {
    let client = ScriptedClient::replying("Nice work, but I forgot to grade it.");
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate(&request(), None, &config, &mut history)
        .await
        .unwrap();
    assert_eq!(output.result.grade, None);
    assert!(!output.degraded);
}

// ── History and artifact contracts ───────────────────────────────────────────

#[tokio::test]
async fn history_accumulates_in_submission_order() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(client);
    let mut history = RunHistory::new();

    let subjects = ["Mathematics", "English", "History", "Science", "Art"];
    for subject in subjects {
        let req = AssignmentRequest::builder()
            .subject(subject)
            .purpose("practice")
            .build()
            .unwrap();
        generate(&req, None, &config, &mut history).await.unwrap();
    }

    assert_eq!(history.len(), subjects.len());
    let seen: Vec<&str> = history
        .read_all()
        .iter()
        .map(|e| e.subject.as_str())
        .collect();
    assert_eq!(seen, subjects);
}

// Plain #[test]: generate_sync builds its own runtime, so it must not run
// inside an existing tokio runtime.
#[test]
fn generate_sync_matches_the_async_entry_point() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate_sync(&request(), None, &config, &mut history).unwrap();

    assert_eq!(output.result.feedback, GOOD_REPLY);
    assert_eq!(output.result.grade, Some(87));
    assert!(!output.degraded);
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn download_artifact_matches_displayed_feedback_byte_for_byte() {
    let client = ScriptedClient::replying(GOOD_REPLY);
    let config = config_with(client);
    let mut history = RunHistory::new();

    let output = generate(&request(), None, &config, &mut history)
        .await
        .unwrap();
    let artifact = output.result.artifact();

    assert_eq!(artifact.filename, "assignment_feedback.txt");
    assert_eq!(artifact.media_type, "text/plain");
    assert_eq!(artifact.data, output.result.feedback.as_bytes());
}
