//! Citation token scanning.
//!
//! A citation token is `[` followed by 1 to [`MAX_ID_LEN`] characters that
//! are not `[`, `]` or newline, followed by `]`. Matches are leftmost-first
//! and non-overlapping. A nested `[` ends a candidate early, so `[a[b]` yields
//! the id `b`.
//!
//! Ids are the exact captured text. Surrounding whitespace is kept, so
//! `[ C1 ]` and `[C1]` are different ids in both extraction and tokenizing.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Longest citation id, in characters.
pub const MAX_ID_LEN: usize = 40;

/// One piece of an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Segment {
    /// Literal answer text between citation tokens
    Text { value: String },

    /// A citation token; `raw` keeps the brackets
    Citation { id: String, raw: String },
}

impl Segment {
    /// The exact slice of the answer this segment covers.
    pub fn as_source(&self) -> &str {
        match self {
            Segment::Text { value } => value,
            Segment::Citation { raw, .. } => raw,
        }
    }

    /// Citation id, if this is a citation segment.
    pub fn citation_id(&self) -> Option<&str> {
        match self {
            Segment::Citation { id, .. } => Some(id),
            Segment::Text { .. } => None,
        }
    }
}

fn citation_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&format!(r"\[([^\[\]\n]{{1,{}}})\]", MAX_ID_LEN))
            .expect("citation pattern is a valid regex")
    })
}

/// Iterate `(start, end, id)` for every citation token, in order.
fn citation_spans(text: &str) -> impl Iterator<Item = (usize, usize, &str)> {
    citation_pattern().captures_iter(text).filter_map(|caps| {
        let whole = caps.get(0)?;
        let id = caps.get(1)?;
        Some((whole.start(), whole.end(), id.as_str()))
    })
}

/// Extract citation ids in the order they first appear, without duplicates.
pub fn extract_citation_ids(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    citation_spans(text)
        .filter(|(_, _, id)| seen.insert(*id))
        .map(|(_, _, id)| id.to_string())
        .collect()
}

/// Split an answer into text and citation segments.
///
/// Every token occurrence becomes its own citation segment, repeated ids
/// included. Text segments are never empty.
pub fn tokenize_answer(text: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut last = 0;

    for (start, end, id) in citation_spans(text) {
        if start > last {
            out.push(Segment::Text {
                value: text[last..start].to_string(),
            });
        }

        out.push(Segment::Citation {
            id: id.to_string(),
            raw: text[start..end].to_string(),
        });
        last = end;
    }

    if last < text.len() {
        out.push(Segment::Text {
            value: text[last..].to_string(),
        });
    }

    out
}

/// Concatenate segments back into the answer they came from.
pub fn reconstruct(segments: &[Segment]) -> String {
    segments.iter().map(Segment::as_source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Segment {
        Segment::Text {
            value: value.to_string(),
        }
    }

    fn cite(id: &str) -> Segment {
        Segment::Citation {
            id: id.to_string(),
            raw: format!("[{}]", id),
        }
    }

    #[test]
    fn test_extract_dedupes_in_first_seen_order() {
        let s = "See [P7-C1] and again [P7-C1], also [C2].";
        assert_eq!(extract_citation_ids(s), vec!["P7-C1", "C2"]);
    }

    #[test]
    fn test_tokenize_mixed_answer() {
        let s = "See [P7-C1] and again [P7-C1], also [C2].";
        assert_eq!(
            tokenize_answer(s),
            vec![
                text("See "),
                cite("P7-C1"),
                text(" and again "),
                cite("P7-C1"),
                text(", also "),
                cite("C2"),
                text("."),
            ]
        );
    }

    #[test]
    fn test_adjacent_tokens_have_no_text_between() {
        assert_eq!(tokenize_answer("[A][B]"), vec![cite("A"), cite("B")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(extract_citation_ids("").is_empty());
        assert!(tokenize_answer("").is_empty());
    }

    #[test]
    fn test_plain_text_is_single_segment() {
        let s = "No citations here.";
        assert!(extract_citation_ids(s).is_empty());
        assert_eq!(tokenize_answer(s), vec![text(s)]);
    }

    #[test]
    fn test_unbalanced_bracket() {
        let s = "unbalanced [abc no close";
        assert!(extract_citation_ids(s).is_empty());
        assert_eq!(tokenize_answer(s), vec![text(s)]);
    }

    #[test]
    fn test_empty_brackets_are_text() {
        assert!(extract_citation_ids("a [] b").is_empty());
    }

    #[test]
    fn test_id_length_limit() {
        let at_limit = "x".repeat(MAX_ID_LEN);
        let over_limit = "x".repeat(MAX_ID_LEN + 1);

        assert_eq!(
            extract_citation_ids(&format!("[{}]", at_limit)),
            vec![at_limit.clone()]
        );

        let s = format!("before [{}] after", over_limit);
        assert!(extract_citation_ids(&s).is_empty());
        assert_eq!(tokenize_answer(&s), vec![text(&s)]);
    }

    #[test]
    fn test_limit_counts_characters_not_bytes() {
        let id = "é".repeat(MAX_ID_LEN);
        assert_eq!(extract_citation_ids(&format!("[{}]", id)), vec![id]);
    }

    #[test]
    fn test_nested_bracket_truncates_id() {
        assert_eq!(extract_citation_ids("[outer [inner] tail]"), vec!["inner"]);
        assert_eq!(
            tokenize_answer("[a[b]"),
            vec![text("[a"), cite("b")]
        );
    }

    #[test]
    fn test_newline_breaks_token() {
        assert!(extract_citation_ids("[P1\n-C1]").is_empty());
    }

    #[test]
    fn test_whitespace_is_part_of_id() {
        assert_eq!(extract_citation_ids("[C1] [ C1 ]"), vec!["C1", " C1 "]);
        assert_eq!(
            tokenize_answer("[ C1 ]"),
            vec![Segment::Citation {
                id: " C1 ".to_string(),
                raw: "[ C1 ]".to_string(),
            }]
        );
    }

    #[test]
    fn test_segments_serialize_with_kind_tag() {
        let json = serde_json::to_value(tokenize_answer("a [C1]")).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"kind": "text", "value": "a "},
                {"kind": "citation", "id": "C1", "raw": "[C1]"}
            ])
        );
    }

    #[test]
    fn test_reconstruct() {
        let s = "x [A] y [[B]] z [unclosed";
        assert_eq!(reconstruct(&tokenize_answer(s)), s);
    }

    #[test]
    fn test_pattern_compiles_with_id_limit() {
        assert_eq!(citation_pattern().as_str(), r"\[([^\[\]\n]{1,40})\]");
    }

    #[test]
    fn test_citation_id_accessor() {
        let segments = tokenize_answer("t [C9]");
        let ids: Vec<_> = segments.iter().filter_map(Segment::citation_id).collect();
        assert_eq!(ids, vec!["C9"]);
    }
}
