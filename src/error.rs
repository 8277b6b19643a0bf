//! Error types for the analysis pipeline.
//!
//! One enum covers the whole pipeline: extraction, dispatch, and the
//! session-level validation failures. Every failure is terminal for the
//! user action that produced it; there is no retry layer.

/// All errors that can occur during extraction, dispatch, and session operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// PDF unreadable, or no page yielded any text. The session clears its
    /// document state when this is returned from an upload.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Transport or API-level failure from the model backend. The previous
    /// analysis, if any, is left untouched.
    #[error("model dispatch failed: {0}")]
    Dispatch(String),

    /// Blank question text; nothing was dispatched.
    #[error("question is empty")]
    EmptyQuestion,

    /// An operation that needs a document was called before a successful upload.
    #[error("no document loaded")]
    NoDocument,

    /// Saving the analysis was requested before any analysis was produced.
    #[error("no analysis available")]
    NoAnalysis,

    /// I/O error (reading input files, writing the analysis download).
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalyzerError>;
