//! Prompt construction: assignment metadata to the fixed feedback prompt.
//!
//! This stage is a pure function. Determinism matters here: identical
//! metadata and document text must yield byte-identical prompts, so that a
//! prompt regression shows up as a simple string diff in tests rather than
//! as drift in model behaviour.

use crate::prompts::GRADE_MARKER;
use crate::request::AssignmentRequest;
use std::fmt::Write;

/// Render the feedback prompt for one submission.
///
/// Every metadata field is embedded in a fixed template slot; the weights
/// are formatted as `"<N>%"`. The prompt always demands, verbatim, two
/// positive bullets, three improvement bullets (one addressing any detected
/// error in the submitted content), and a closing `Final Grade: XX/100`
/// line. The extracted document text block is appended only when
/// `document_text` is non-empty.
pub fn build_prompt(request: &AssignmentRequest, document_text: &str) -> String {
    let mut prompt = format!(
        "As an autograder, please provide detailed feedback on the following assignment submission.\n\
         \n\
         ASSIGNMENT DETAILS:\n\
         - Subject: {subject}\n\
         - Education Level: {level}\n\
         - Purpose of Assignment: {purpose}\n\
         - Correctness Weight: {correctness}%\n\
         - Explanation Weight: {explanation}%\n\
         - Answer Format: {format}\n\
         \n\
         Provide positive areas in 2 bullets.\n\
         Then provide what could be improved on in 3 bullets. If there is an error within what \
         the user gave such as an answer or explanation, one of these bullets should address this error.\n\
         At the end of your response, on a new line, please include: \"{marker} XX/100\" \
         (where XX is the numerical grade out of 100).\n",
        subject = request.subject,
        level = request.education_level,
        purpose = request.purpose,
        correctness = request.correctness_weight,
        explanation = request.explanation_weight,
        format = request.answer_format,
        marker = GRADE_MARKER,
    );

    if !document_text.is_empty() {
        // Infallible on String; the Result exists only to satisfy fmt::Write.
        let _ = write!(
            prompt,
            "\nAssignment Content (extracted from uploaded PDF):\n{document_text}\n"
        );
    }

    prompt
}
