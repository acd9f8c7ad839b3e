//! Grade extraction: scan feedback text for the first `Final Grade:` integer.
//!
//! The model is *asked* to close with the marker line, but free-form text
//! offers no guarantee — the marker may be reworded, dropped, or duplicated.
//! Absence is therefore a first-class outcome ([`None`]), never an error:
//! the feedback is still displayable, there is simply no numeric banner to
//! show with it.

use once_cell::sync::Lazy;
use regex::Regex;

// Case-sensitive on purpose: the prompt demands the marker verbatim, and a
// looser match would start accepting text the prompt never asked for.
static RE_GRADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"Final Grade:\s*(\d+)").unwrap());

/// Return the first integer following the `Final Grade:` marker, if any.
///
/// No upper bound is applied — a grade above 100 is reported as-is. A digit
/// run too large for `u32` counts as no grade.
pub fn extract_grade(feedback: &str) -> Option<u32> {
    RE_GRADE
        .captures(feedback)?
        .get(1)
        .and_then(|m| m.as_str().parse().ok())
}
