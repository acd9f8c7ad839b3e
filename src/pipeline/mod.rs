//! Pipeline stages for feedback generation.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap an
//! implementation (e.g. a different completion backend) without touching
//! the others.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ prompt ──▶ llm ──▶ grade
//! (lopdf)   (template)  (chat)  (regex)
//! ```
//!
//! 1. [`extract`] — pull newline-joined page text out of an uploaded PDF;
//!    failures degrade to empty text, they never abort the run
//! 2. [`prompt`]  — deterministically render assignment metadata and
//!    document text into the fixed feedback prompt
//! 3. [`llm`]     — send the two-message conversation to the completion
//!    endpoint; the only stage with network I/O, exactly one attempt
//! 4. [`grade`]   — scan the response for the first `Final Grade:` integer

pub mod extract;
pub mod grade;
pub mod llm;
pub mod prompt;
