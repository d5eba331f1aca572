//! Terminal rendering of answers, citations and evidence.
//!
//! Everything here builds strings; commands decide where they go. Colour is
//! opt-in per call so output stays byte-stable in tests and pipes.

use colored::Colorize;
use intellirag_citations::{
    evidence_entries, format_page_label, format_source, CitationItem, CitationsMap, Segment,
};
use intellirag_client::{Confidence, QaResponse};
use serde_json::json;
use std::fmt::Write;

/// Shown in place of evidence for a cited id the service did not describe.
pub const NO_METADATA: &str = "No metadata available for this citation.";

/// Shown when an evidence entry carries no snippet.
pub const NO_SNIPPET: &str = "(no snippet provided)";

/// Rendering switches for the ask view.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Emit ANSI colour
    pub color: bool,

    /// Show every evidence entry, not only the cited ones
    pub all_evidence: bool,

    /// Append the raw retrieved context
    pub show_context: bool,
}

/// Answer text with citation tokens highlighted.
///
/// Without colour the output is the answer exactly as received.
pub fn render_answer(segments: &[Segment], citations: &CitationsMap, color: bool) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            Segment::Text { value } => out.push_str(value),
            Segment::Citation { id, raw } => {
                if !color {
                    out.push_str(raw);
                } else if citations.contains(id) {
                    out.push_str(&raw.cyan().bold().to_string());
                } else {
                    out.push_str(&raw.yellow().to_string());
                }
            }
        }
    }
    out
}

/// `Page <label> • <file>` line for one evidence item.
pub fn location_line(item: &CitationItem) -> String {
    format!(
        "Page {} • {}",
        format_page_label(Some(item)),
        format_source(item.source.as_deref())
    )
}

/// One line per distinct cited id with its location, or a notice when the
/// service returned no evidence for it.
pub fn render_cited_ids(ids: &[String], citations: &CitationsMap) -> String {
    let mut out = String::new();

    if ids.is_empty() {
        out.push_str("No citation tokens found in the answer text.\n");
        out.push_str(
            "If no citations appear, the document may not contain the answer or the prompt rules are not being followed.\n",
        );
        return out;
    }

    let _ = writeln!(
        out,
        "{} citation token(s) found in the answer text.",
        ids.len()
    );
    for id in ids {
        let detail = match citations.get(id) {
            Some(item) => location_line(item),
            None => NO_METADATA.to_string(),
        };
        let _ = writeln!(out, "  [{}]  {}", id, detail);
    }
    out
}

fn confidence_badge(confidence: Confidence, color: bool) -> String {
    let label = format!("Confidence: {}", confidence);
    if !color {
        return label;
    }
    match confidence {
        Confidence::High => label.green().bold().to_string(),
        Confidence::Medium => label.yellow().bold().to_string(),
        Confidence::Low => label.red().bold().to_string(),
    }
}

/// Evidence card for one citation id.
pub fn render_evidence_card(id: &str, item: &CitationItem, cited: bool, color: bool) -> String {
    let tag = format!("[{}]", id);
    let tag = if color { tag.bold().to_string() } else { tag };
    let marker = if cited { " (cited)" } else { "" };

    let mut out = String::new();
    let _ = writeln!(out, "{}{}  {}", tag, marker, location_line(item));
    for line in item.snippet.as_deref().unwrap_or(NO_SNIPPET).lines() {
        let _ = writeln!(out, "    {}", line);
    }
    out
}

fn heading(title: &str, color: bool) -> String {
    if color {
        title.bold().underline().to_string()
    } else {
        title.to_string()
    }
}

/// Full text view of a `/qa` response.
pub fn render_report(response: &QaResponse, options: RenderOptions) -> String {
    let empty = CitationsMap::new();
    let citations = response.citations.as_ref().unwrap_or(&empty);
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading("Answer", options.color));
    if response.answer.is_empty() {
        out.push_str("No answer returned.\n");
        return out;
    }

    let segments = intellirag_citations::tokenize_answer(&response.answer);
    let _ = writeln!(out, "{}", render_answer(&segments, citations, options.color));
    out.push('\n');

    let ids = intellirag_citations::extract_citation_ids(&response.answer);
    let _ = writeln!(out, "{}", heading("Citations referenced in answer", options.color));
    out.push_str(&render_cited_ids(&ids, citations));
    let _ = writeln!(
        out,
        "{}",
        confidence_badge(response.confidence_or_default(), options.color)
    );
    out.push('\n');

    if response.has_citations() {
        let shown = evidence_entries(citations, &ids, !options.all_evidence);
        let _ = writeln!(
            out,
            "{} (showing {} / {}, {})",
            heading("Evidence", options.color),
            shown.len(),
            citations.len(),
            if options.all_evidence { "all" } else { "cited" }
        );
        for (id, item) in shown {
            let cited = ids.iter().any(|cited| cited == id);
            out.push_str(&render_evidence_card(id, item, cited, options.color));
        }
    } else {
        let _ = writeln!(out, "{}", heading("Evidence", options.color));
        out.push_str("No citations returned.\n");
    }

    if options.show_context {
        out.push('\n');
        let _ = writeln!(out, "{}", heading("Context", options.color));
        let _ = writeln!(out, "{}", response.context);
    }

    out
}

/// Machine-readable view of a `/qa` response.
pub fn json_report(response: &QaResponse, options: RenderOptions) -> serde_json::Value {
    let empty = CitationsMap::new();
    let citations = response.citations.as_ref().unwrap_or(&empty);
    let ids = intellirag_citations::extract_citation_ids(&response.answer);

    let evidence: Vec<_> = evidence_entries(citations, &ids, !options.all_evidence)
        .into_iter()
        .map(|(id, item)| {
            json!({
                "id": id,
                "cited": ids.iter().any(|cited| cited == id),
                "page": format_page_label(Some(item)),
                "source": format_source(item.source.as_deref()),
                "snippet": item.snippet,
            })
        })
        .collect();

    let missing: Vec<&String> = ids.iter().filter(|id| !citations.contains(id)).collect();

    let mut output = json!({
        "answer": response.answer,
        "confidence": response.confidence_or_default(),
        "citationIds": ids,
        "missingEvidence": missing,
        "segments": intellirag_citations::tokenize_answer(&response.answer),
        "evidence": evidence,
        "evidenceTotal": citations.len(),
    });

    if options.show_context {
        output["context"] = json!(response.context);
    }

    output
}
