//! Summary section parser
//!
//! Splits the raw summarize reply into labeled display sections by
//! sniffing the emphasis markers the model tends to emit. The format is
//! not a contract: classification keys on exact English header substrings
//! and the `**` delimiter, so the whole thing sits behind [`SummaryParser`].
//! A future structured-output contract (asking the model for a tagged
//! format) replaces the implementation without touching callers.

/// Marker that gates structured parsing. Absent means the reply is shown
/// as one unstructured block.
pub const KEY_CLAUSES_MARKER: &str = "**Key Clauses:**";

/// Emphasis delimiter the reply is split on.
const EMPHASIS: &str = "**";

/// Unlabeled fragments at or below this trimmed length are dropped.
const MIN_EXTRA_LEN: usize = 20;

/// Display label for one fragment of a structured summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLabel {
    KeyClauses,
    Parties,
    Risks,
    Obligations,
    /// Substantial fragment matching no known header
    Unlabeled,
}

impl SectionLabel {
    /// Heading shown above the fragment
    pub fn heading(&self) -> &'static str {
        match self {
            SectionLabel::KeyClauses => "Key Clauses",
            SectionLabel::Parties => "Parties Involved",
            SectionLabel::Risks => "Potential Risks",
            SectionLabel::Obligations => "Obligations",
            SectionLabel::Unlabeled => "Additional Notes",
        }
    }
}

/// One classified fragment, header prefix stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub label: SectionLabel,
    pub text: String,
}

/// Parse result: either classified fragments in reply order, or the whole
/// reply as one unstructured block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSummary {
    Sections(Vec<SummarySection>),
    Unstructured(String),
}

/// Interface for turning a raw summarize reply into display sections.
pub trait SummaryParser {
    fn parse(&self, raw: &str) -> ParsedSummary;
}

/// The marker-sniffing parser. Fragile by design: first matching header
/// wins in fixed order, duplicate headers produce duplicate sections, and
/// header text appearing mid-sentence still classifies the fragment.
pub struct MarkerSectionParser;

impl SummaryParser for MarkerSectionParser {
    fn parse(&self, raw: &str) -> ParsedSummary {
        if !raw.contains(KEY_CLAUSES_MARKER) {
            return ParsedSummary::Unstructured(raw.to_string());
        }

        let mut sections = Vec::new();
        for fragment in raw.split(EMPHASIS) {
            if fragment.trim().is_empty() {
                continue;
            }
            if fragment.contains("Key Clauses") {
                sections.push(strip_header(SectionLabel::KeyClauses, fragment, "Key Clauses:"));
            } else if fragment.contains("Parties Involved") {
                sections.push(strip_header(SectionLabel::Parties, fragment, "Parties Involved:"));
            } else if fragment.contains("Potential Risks") {
                sections.push(strip_header(SectionLabel::Risks, fragment, "Potential Risks:"));
            } else if fragment.contains("Obligations") {
                sections.push(strip_header(SectionLabel::Obligations, fragment, "Obligations:"));
            } else if fragment.trim().len() > MIN_EXTRA_LEN {
                sections.push(SummarySection {
                    label: SectionLabel::Unlabeled,
                    text: fragment.trim().to_string(),
                });
            }
        }

        ParsedSummary::Sections(sections)
    }
}

fn strip_header(label: SectionLabel, fragment: &str, prefix: &str) -> SummarySection {
    SummarySection {
        label,
        text: fragment.replace(prefix, "").trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> ParsedSummary {
        MarkerSectionParser.parse(raw)
    }

    #[test]
    fn test_unmarked_text_is_one_block() {
        let raw = "The agreement binds both parties to secrecy.";
        assert_eq!(parse(raw), ParsedSummary::Unstructured(raw.to_string()));
    }

    #[test]
    fn test_typical_model_reply_splits_in_order() {
        // The usual model layout: each header alone inside emphasis, the
        // body in the following fragment. Headers classify, bodies land
        // between them as extra content when long enough.
        let raw = "**Key Clauses:**\nConfidentiality and non-compete terms apply.\n\n\
                   **Parties Involved:**\nAcme Corp and the contractor.\n\n\
                   **Potential Risks:**\nUnlimited liability for breaches.\n\n\
                   **Obligations:**\nDeliver monthly reports on time.";
        let ParsedSummary::Sections(sections) = parse(raw) else {
            panic!("expected structured sections");
        };
        let labels: Vec<SectionLabel> = sections.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec![
                SectionLabel::KeyClauses,
                SectionLabel::Unlabeled,
                SectionLabel::Parties,
                SectionLabel::Unlabeled,
                SectionLabel::Risks,
                SectionLabel::Unlabeled,
                SectionLabel::Obligations,
                SectionLabel::Unlabeled,
            ]
        );
        assert_eq!(sections[1].text, "Confidentiality and non-compete terms apply.");
        assert_eq!(sections[7].text, "Deliver monthly reports on time.");
    }

    #[test]
    fn test_header_prefix_stripped_inside_fragment() {
        // When a whole "Header: body" run is emphasized, header and body
        // share a fragment and the prefix is stripped from the text.
        let raw = "**Key Clauses:**\nsummary of clauses goes here\n\
                   **Parties Involved: Acme Corp and Beta LLC**";
        let ParsedSummary::Sections(sections) = parse(raw) else {
            panic!("expected structured sections");
        };
        assert_eq!(sections[0].label, SectionLabel::KeyClauses);
        assert_eq!(sections[0].text, "");
        assert_eq!(sections[1].label, SectionLabel::Unlabeled);
        assert_eq!(sections[2].label, SectionLabel::Parties);
        assert_eq!(sections[2].text, "Acme Corp and Beta LLC");
    }

    #[test]
    fn test_short_unlabeled_fragments_dropped() {
        let raw = "**Key Clauses:**tiny**Parties Involved: Acme and Beta Corp**";
        let ParsedSummary::Sections(sections) = parse(raw) else {
            panic!("expected structured sections");
        };
        // "tiny" is below the keep threshold and vanishes
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, SectionLabel::KeyClauses);
        assert_eq!(sections[1].label, SectionLabel::Parties);
    }

    #[test]
    fn test_first_matching_header_wins() {
        // A fragment mentioning two headers classifies as the first in
        // source order, so Key Clauses beats Obligations.
        let raw = "**Key Clauses:**\n**Obligations overlap with Key Clauses in this draft**";
        let ParsedSummary::Sections(sections) = parse(raw) else {
            panic!("expected structured sections");
        };
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].label, SectionLabel::KeyClauses);
    }

    #[test]
    fn test_duplicate_headers_preserved_in_order() {
        let raw = "**Key Clauses:**\n**Key Clauses: second batch of clauses**";
        let ParsedSummary::Sections(sections) = parse(raw) else {
            panic!("expected structured sections");
        };
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].label, SectionLabel::KeyClauses);
        assert_eq!(sections[0].text, "");
        assert_eq!(sections[1].label, SectionLabel::KeyClauses);
        assert_eq!(sections[1].text, "second batch of clauses");
    }
}
