//! CLI binary for assessai-grader.
//!
//! A thin shim over the library crate: collects the same form fields the
//! original submission page asked for, maps them to an `AssignmentRequest`
//! and `FeedbackConfig`, and prints the generated feedback.

use anyhow::{Context, Result};
use assessai_grader::{
    generate, AnswerFormat, AssignmentRequest, Document, EducationLevel, FeedbackConfig,
    RunHistory,
};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Grade a PDF submission
  assessai homework.pdf --subject "Mathematics" --purpose "Week 3 problem set"

  # Full metadata, save the feedback file
  assessai essay.pdf \
      --subject "English" --level university --format essay \
      --purpose "Argumentative essay on renewable energy" \
      --correctness 40 --explanation 60 \
      -o assignment_feedback.txt

  # Image upload (accepted, but no text is extracted)
  assessai worksheet.png --subject "History" --purpose "Timeline exercise"

  # Structured JSON output
  assessai homework.pdf -s "Science" -p "Lab report" --json

SUPPORTED UPLOADS:
  .pdf                 text is extracted and included in the prompt
  .png .jpg .jpeg      accepted as-is; no OCR, no extracted text

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY       API key for the completion endpoint
  ASSESSAI_MODEL       Override model ID (default: gpt-3.5-turbo)
  ASSESSAI_BASE_URL    OpenAI-compatible base URL

SETUP:
  1. Set API key:      export OPENAI_API_KEY=sk-...
  2. Grade:            assessai submission.pdf -s "Math" -p "Homework 1"

DISCLAIMER:
  This autograder provides automated feedback and should not replace
  human evaluation.
"#;

/// Automated assignment feedback and grading.
#[derive(Parser, Debug)]
#[command(
    name = "assessai",
    version,
    about = "Generate automated feedback and a grade for an assignment submission",
    long_about = "Generate automated, LLM-backed feedback for an assignment submission. \
Collects assignment metadata and an uploaded document (PDF or image), requests structured \
feedback from an OpenAI-compatible chat-completion endpoint, and prints the feedback \
alongside the extracted numeric grade.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Assignment file to grade (.pdf, .png, .jpg, .jpeg).
    file: PathBuf,

    /// Subject of the assignment.
    #[arg(short, long)]
    subject: String,

    /// Education level of the student.
    #[arg(long, value_enum, default_value = "high-school")]
    level: LevelArg,

    /// Purpose of the assignment.
    #[arg(short, long)]
    purpose: String,

    /// Correctness weight in percent (0–100).
    #[arg(long, default_value_t = 50,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    correctness: u8,

    /// Explanation weight in percent (0–100).
    #[arg(long, default_value_t = 50,
          value_parser = clap::value_parser!(u8).range(0..=100))]
    explanation: u8,

    /// Expected answer format.
    #[arg(long, value_enum, default_value = "mcq")]
    format: FormatArg,

    /// Completion model ID.
    #[arg(long, env = "ASSESSAI_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible base URL.
    #[arg(long, env = "ASSESSAI_BASE_URL")]
    base_url: Option<String>,

    /// Write the feedback text to this file.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output structured JSON (the full FeedbackOutput) instead of text.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the feedback itself.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum LevelArg {
    Elementary,
    Middle,
    HighSchool,
    University,
    Bachelors,
    Masters,
    Postgraduate,
}

impl From<LevelArg> for EducationLevel {
    fn from(v: LevelArg) -> Self {
        match v {
            LevelArg::Elementary => EducationLevel::Elementary,
            LevelArg::Middle => EducationLevel::Middle,
            LevelArg::HighSchool => EducationLevel::HighSchool,
            LevelArg::University => EducationLevel::University,
            LevelArg::Bachelors => EducationLevel::Bachelors,
            LevelArg::Masters => EducationLevel::Masters,
            LevelArg::Postgraduate => EducationLevel::Postgraduate,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FormatArg {
    Mcq,
    Frq,
    Code,
    Essay,
    ShortAnswer,
}

impl From<FormatArg> for AnswerFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Mcq => AnswerFormat::Mcq,
            FormatArg::Frq => AnswerFormat::Frq,
            FormatArg::Code => AnswerFormat::CodeSubmission,
            FormatArg::Essay => AnswerFormat::Essay,
            FormatArg::ShortAnswer => AnswerFormat::ShortAnswer,
        }
    }
}

/// Map a file extension to the MIME type the upload layer would report.
fn mime_for(path: &Path) -> Option<&'static str> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => Some("application/pdf"),
        Some("png") => Some("image/png"),
        Some("jpg") | Some("jpeg") => Some("image/jpeg"),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library logs go to stderr so piped feedback output stays clean.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Form-layer validation (before the pipeline runs) ─────────────────
    if cli.purpose.trim().is_empty() {
        anyhow::bail!("Please enter the purpose of the assignment.");
    }
    let mime = mime_for(&cli.file).with_context(|| {
        format!(
            "Unsupported file type '{}': upload a PDF or image (.pdf, .png, .jpg, .jpeg)",
            cli.file.display()
        )
    })?;
    let bytes = tokio::fs::read(&cli.file)
        .await
        .with_context(|| format!("Please upload a file (PDF or Image): {}", cli.file.display()))?;
    let document = Document::new(bytes, mime);

    let request = AssignmentRequest::builder()
        .subject(cli.subject.as_str())
        .education_level(cli.level.clone().into())
        .purpose(cli.purpose.as_str())
        .correctness_weight(cli.correctness)
        .explanation_weight(cli.explanation)
        .answer_format(cli.format.clone().into())
        .build()
        .context("Invalid assignment details")?;

    let mut builder = FeedbackConfig::builder();
    if let Some(ref model) = cli.model {
        builder = builder.model(model.as_str());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.as_str());
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let spinner = if !cli.quiet && !cli.no_progress && !cli.json {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Generating feedback…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let mut history = RunHistory::new();
    let output = generate(&request, Some(&document), &config, &mut history).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = output.context("Feedback generation failed")?;

    // ── Render results ───────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );
    } else {
        if let Some(ref warning) = output.extraction_warning {
            eprintln!("{} {}", yellow("⚠"), warning);
        }

        if !cli.quiet {
            println!("{}", bold("Assignment Feedback"));
            println!("{}", dim("───────────────────"));
        }
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.result.feedback.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.result.feedback.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        drop(handle);

        if let Some(grade) = output.result.grade {
            println!();
            println!("{}", bold(&format!("  Final Grade: {grade}/100")));
        }

        if !cli.quiet {
            if output.degraded {
                eprintln!("{} feedback service unavailable; showing fallback message", yellow("⚠"));
            } else {
                eprintln!(
                    "{} Feedback generated successfully.  {}",
                    green("✔"),
                    dim(&format!(
                        "{} tokens in / {} tokens out — {}ms",
                        output.stats.prompt_tokens,
                        output.stats.completion_tokens,
                        output.stats.total_duration_ms
                    ))
                );
            }
        }
    }

    // ── Save the artifact ────────────────────────────────────────────────
    if let Some(ref path) = cli.output {
        output
            .result
            .artifact()
            .write_to(path)
            .await
            .context("Failed to save feedback file")?;
        if !cli.quiet {
            eprintln!("{} saved {}", cyan("↓"), bold(&path.display().to_string()));
        }
    }

    Ok(())
}
