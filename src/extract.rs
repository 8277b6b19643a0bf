//! PDF text extraction
//!
//! Wraps the pdf-extract crate with error handling for:
//! - Scanned/image-only pages (skipped, not fatal)
//! - PDFs where no page yields text (reported as an error, not as an
//!   empty document)
//! - Corrupted PDFs (the underlying parser can panic; panics are caught
//!   at this boundary and converted to errors)

use crate::error::{AnalyzerError, Result};
use std::panic::{self, AssertUnwindSafe};

/// Extract full text from PDF bytes.
///
/// Pages are read in document order and joined with a newline separator.
/// A page that yields no text (image-only or damaged) is skipped rather
/// than failing the whole document. If every page comes back empty the
/// result is an error: callers must never mistake "no usable text" for a
/// valid zero-length document.
pub fn extract_text_from_pdf(pdf_bytes: &[u8]) -> Result<String> {
    let pages = extract_pages(pdf_bytes)?;

    join_pages(&pages).ok_or_else(|| {
        AnalyzerError::Extraction(
            "no extractable text in any page (the PDF may be image-based or empty)".to_string(),
        )
    })
}

/// Pull per-page text out of the PDF bytes.
///
/// pdf-extract panics on some malformed input instead of returning an
/// error, so the call is wrapped in `catch_unwind`.
fn extract_pages(pdf_bytes: &[u8]) -> Result<Vec<String>> {
    let data = pdf_bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(AnalyzerError::Extraction(format!("PDF parse failed: {}", e))),
        Err(_) => Err(AnalyzerError::Extraction(
            "PDF parser panicked (malformed document)".to_string(),
        )),
    }
}

/// Join page texts with a newline, skipping pages with no visible text.
/// Returns None when every page is empty.
fn join_pages(pages: &[String]) -> Option<String> {
    let nonempty: Vec<&str> = pages
        .iter()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .collect();

    if nonempty.is_empty() {
        None
    } else {
        Some(nonempty.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_pages_keeps_page_order() {
        let pages = vec![
            "first page".to_string(),
            "second page".to_string(),
            "third page".to_string(),
        ];
        assert_eq!(
            join_pages(&pages),
            Some("first page\nsecond page\nthird page".to_string())
        );
    }

    #[test]
    fn join_pages_skips_textless_pages() {
        let pages = vec![
            "first page".to_string(),
            String::new(),
            "  \n ".to_string(),
            "last page".to_string(),
        ];
        assert_eq!(join_pages(&pages), Some("first page\nlast page".to_string()));
    }

    #[test]
    fn join_pages_all_empty_is_none() {
        let pages = vec![String::new(), "\n\n".to_string()];
        assert_eq!(join_pages(&pages), None);
        assert_eq!(join_pages(&[]), None);
    }

    #[test]
    fn malformed_data_returns_error() {
        let garbage = b"not a pdf at all";
        let result = extract_text_from_pdf(garbage);
        assert!(matches!(result, Err(AnalyzerError::Extraction(_))));
    }

    #[test]
    fn empty_pdf_header_returns_error() {
        // A minimal PDF header with no real content
        let data = b"%PDF-1.4\n%%EOF\n";
        assert!(extract_text_from_pdf(data).is_err());
    }
}
