//! Document text extraction: uploaded PDF bytes to newline-joined page text.
//!
//! lopdf parses straight from memory, so the upload never touches disk.
//! The contract is deliberately loose where the input is loose: a page
//! whose content stream cannot be decoded contributes an empty line rather
//! than failing the document, because a partially extracted submission is
//! still worth grading. Only a structurally unreadable document (bad magic,
//! corrupt xref, encryption) is reported as an [`ExtractionError`] — and
//! even that is recovered by the orchestrator into empty document text
//! plus a warning.

use crate::error::ExtractionError;
use lopdf::Document;
use tracing::{debug, warn};

/// Extract the concatenated page text of a PDF payload.
///
/// Pages are visited in page order; each page's text is trimmed of trailing
/// whitespace and terminated with a single `'\n'`, so a two-page document
/// with page texts "Hello" and "World" yields `"Hello\nWorld\n"`.
pub fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !bytes.starts_with(b"%PDF") {
        let magic = bytes.iter().take(4).copied().collect();
        return Err(ExtractionError::NotAPdf { magic });
    }

    // lopdf may fail at load time on an encrypted document it cannot
    // decrypt with the empty password; report that as Encrypted rather
    // than as a structural failure.
    let doc = match Document::load_mem(bytes) {
        Ok(doc) => doc,
        Err(e) => {
            let detail = e.to_string();
            let lower = detail.to_ascii_lowercase();
            if lower.contains("crypt") || lower.contains("password") {
                return Err(ExtractionError::Encrypted);
            }
            return Err(ExtractionError::MalformedPdf { detail });
        }
    };

    if doc.is_encrypted() {
        return Err(ExtractionError::Encrypted);
    }

    let pages = doc.get_pages();
    debug!("Extracting text from {} pages", pages.len());

    let mut text = String::new();
    for (&page_num, _) in pages.iter() {
        match doc.extract_text(&[page_num]) {
            Ok(page_text) => {
                text.push_str(page_text.trim_end());
                text.push('\n');
            }
            Err(e) => {
                // Keep the page slot so the remaining pages stay in order.
                warn!("Page {}: text extraction failed: {}", page_num, e);
                text.push('\n');
            }
        }
    }

    Ok(text)
}
