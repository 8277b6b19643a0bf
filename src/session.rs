//! Session-scoped document state
//!
//! One [`DocumentSession`] per user. It owns the current document and the
//! last analysis; both live exactly as long as the session. A new upload
//! replaces the document wholesale and discards any stale analysis, and
//! nothing mutates a document's text after creation: every derived
//! artifact is a pure function of it (plus the model's output).

use crate::analyzer::Analyzer;
use crate::error::{AnalyzerError, Result};
use crate::extract;
use crate::prompts::ClauseType;
use std::fs;
use std::path::{Path, PathBuf};

/// Filename of the plain-text analysis download.
pub const ANALYSIS_FILENAME: &str = "ai_analysis.txt";

/// An uploaded PDF after successful text extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    text: String,
    size_bytes: usize,
}

impl UploadedDocument {
    /// Extracted text, page texts joined by newline
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Size of the original PDF in bytes
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Size of the original PDF in megabytes, for display
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Per-user context holding the current document and the last analysis.
#[derive(Debug, Default)]
pub struct DocumentSession {
    document: Option<UploadedDocument>,
    analysis: Option<String>,
}

impl DocumentSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_document(&self) -> bool {
        self.document.is_some()
    }

    pub fn document(&self) -> Option<&UploadedDocument> {
        self.document.as_ref()
    }

    /// Raw text of the last analysis, if one succeeded this session
    pub fn analysis(&self) -> Option<&str> {
        self.analysis.as_deref()
    }

    /// Discard the document and any analysis.
    pub fn clear(&mut self) {
        self.document = None;
        self.analysis = None;
    }

    /// Replace the session's document with a freshly extracted one.
    ///
    /// The previous document and analysis are discarded up front, so a
    /// failed extraction leaves the session empty rather than pointing at
    /// stale state.
    pub fn upload_pdf(&mut self, pdf_bytes: &[u8]) -> Result<()> {
        self.clear();
        let text = extract::extract_text_from_pdf(pdf_bytes)?;
        self.document = Some(UploadedDocument { text, size_bytes: pdf_bytes.len() });
        Ok(())
    }

    fn document_text(&self) -> Result<&str> {
        self.document
            .as_ref()
            .map(|d| d.text.as_str())
            .ok_or(AnalyzerError::NoDocument)
    }

    /// Summarize the current document and store the result as the
    /// session's analysis. A dispatch failure leaves the previous
    /// analysis untouched.
    pub async fn analyze(&mut self, analyzer: &Analyzer) -> Result<&str> {
        let raw = analyzer.summarize(self.document_text()?).await?;
        self.analysis = Some(raw);
        Ok(self.analysis.as_deref().unwrap_or_default())
    }

    /// Plain-language explanation of the current document. Not stored.
    pub async fn simplify(&self, analyzer: &Analyzer) -> Result<String> {
        analyzer.simplify(self.document_text()?).await
    }

    /// Answer a free-form question about the current document. Blank
    /// questions are rejected before any dispatch.
    pub async fn ask(&self, analyzer: &Analyzer, question: &str) -> Result<String> {
        analyzer.answer_question(self.document_text()?, question).await
    }

    /// Look up clauses of one category in the current document.
    pub async fn find_clauses(&self, analyzer: &Analyzer, clause_type: ClauseType) -> Result<String> {
        analyzer.find_clauses(self.document_text()?, clause_type).await
    }

    /// Write the last analysis to `ai_analysis.txt` in the given
    /// directory and return the full path.
    pub fn save_analysis(&self, dir: &Path) -> Result<PathBuf> {
        let analysis = self.analysis.as_deref().ok_or(AnalyzerError::NoAnalysis)?;
        let path = dir.join(ANALYSIS_FILENAME);
        fs::write(&path, analysis)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_client::{GeminiClient, GeminiConfig};

    fn demo_analyzer() -> Analyzer {
        Analyzer::new(GeminiClient::new(GeminiConfig::demo()))
    }

    fn session_with_text(text: &str) -> DocumentSession {
        DocumentSession {
            document: Some(UploadedDocument {
                text: text.to_string(),
                size_bytes: text.len(),
            }),
            analysis: None,
        }
    }

    #[test]
    fn test_failed_upload_clears_previous_state() {
        let mut session = session_with_text("old contract");
        session.analysis = Some("old analysis".to_string());

        let result = session.upload_pdf(b"not a pdf at all");
        assert!(matches!(result, Err(AnalyzerError::Extraction(_))));
        assert!(!session.has_document());
        assert!(session.analysis().is_none());
    }

    #[tokio::test]
    async fn test_operations_require_a_document() {
        let session = DocumentSession::new();
        let analyzer = demo_analyzer();

        assert!(matches!(
            session.simplify(&analyzer).await,
            Err(AnalyzerError::NoDocument)
        ));
        assert!(matches!(
            session.ask(&analyzer, "who signs?").await,
            Err(AnalyzerError::NoDocument)
        ));
    }

    #[tokio::test]
    async fn test_analyze_stores_result() {
        let mut session = session_with_text("some contract text");
        let analyzer = demo_analyzer();

        let raw = session.analyze(&analyzer).await.unwrap().to_string();
        assert!(raw.starts_with("**Document Analysis:**"));
        assert_eq!(session.analysis(), Some(raw.as_str()));
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let session = session_with_text("some contract text");
        let analyzer = demo_analyzer();

        assert!(matches!(
            session.ask(&analyzer, "").await,
            Err(AnalyzerError::EmptyQuestion)
        ));
    }

    #[test]
    fn test_save_analysis_roundtrip() {
        let mut session = session_with_text("contract");

        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            session.save_analysis(dir.path()),
            Err(AnalyzerError::NoAnalysis)
        ));

        session.analysis = Some("the full analysis text".to_string());
        let path = session.save_analysis(dir.path()).unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(ANALYSIS_FILENAME));
        assert_eq!(fs::read_to_string(path).unwrap(), "the full analysis text");
    }

    #[test]
    fn test_document_size_display() {
        let doc = UploadedDocument {
            text: "x".to_string(),
            size_bytes: 2 * 1024 * 1024,
        };
        assert!((doc.size_mb() - 2.0).abs() < f64::EPSILON);
    }
}
