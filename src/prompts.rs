//! Prompt templates for document analysis
//!
//! Four fixed templates, one per user action. Interpolation is literal
//! string concatenation of the document text (and, where present, the
//! question or clause name) into the template. Bounding the document to
//! the model's input window happens in the analyzer, not here.

/// Legal clause categories a user can query for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseType {
    Confidentiality,
    Termination,
    Liability,
    GoverningLaw,
    PaymentTerms,
    ForceMajeure,
}

impl ClauseType {
    pub const ALL: [ClauseType; 6] = [
        ClauseType::Confidentiality,
        ClauseType::Termination,
        ClauseType::Liability,
        ClauseType::GoverningLaw,
        ClauseType::PaymentTerms,
        ClauseType::ForceMajeure,
    ];

    /// Display name, as interpolated into prompts
    pub fn as_str(&self) -> &'static str {
        match self {
            ClauseType::Confidentiality => "Confidentiality",
            ClauseType::Termination => "Termination",
            ClauseType::Liability => "Liability",
            ClauseType::GoverningLaw => "Governing Law",
            ClauseType::PaymentTerms => "Payment Terms",
            ClauseType::ForceMajeure => "Force Majeure",
        }
    }

    /// Parse a user-supplied clause name. Accepts the display name in any
    /// case, with spaces or dashes ("Governing Law", "governing-law").
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', " ").trim() {
            "confidentiality" => Some(ClauseType::Confidentiality),
            "termination" => Some(ClauseType::Termination),
            "liability" => Some(ClauseType::Liability),
            "governing law" => Some(ClauseType::GoverningLaw),
            "payment terms" => Some(ClauseType::PaymentTerms),
            "force majeure" => Some(ClauseType::ForceMajeure),
            _ => None,
        }
    }
}

/// Summary prompt: asks for the four labeled outputs the section parser
/// knows how to display.
pub fn summarize_prompt(document_text: &str) -> String {
    format!(
        r#"
Analyze this legal document and provide:
1. Key Clauses: Most important sections
2. Parties: Who is involved and their roles
3. Risks: Potential issues or unfavorable terms
4. Obligations: Main duties and deadlines

Document: {}
"#,
        document_text
    )
}

/// Plain-language explanation prompt, no structural constraint.
pub fn simplify_prompt(document_text: &str) -> String {
    format!("Explain this legal document in very simple terms: {}", document_text)
}

/// Free-form question prompt over the document.
pub fn question_prompt(document_text: &str, question: &str) -> String {
    format!(
        "Based on this document: {}\n\nQuestion: {}\n\nAnswer:",
        document_text, question
    )
}

/// Clause lookup prompt for one named category.
pub fn find_clause_prompt(document_text: &str, clause_type: ClauseType) -> String {
    format!(
        "Find all {} clauses in this document: {}",
        clause_type.as_str(),
        document_text
    )
}
