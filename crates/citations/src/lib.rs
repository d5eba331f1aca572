//! Citation handling for generated answers.
//!
//! Answers from the question-answering service carry bracketed citation
//! tokens such as `[C1]` or `[P7-C12]`. This crate:
//! - extracts the distinct citation ids in order of first appearance
//! - splits an answer into text and citation segments for rendering
//! - models the evidence map the service returns next to the answer
//!
//! # Example
//! ```
//! use intellirag_citations::{extract_citation_ids, tokenize_answer, Segment};
//!
//! let answer = "Vectors are indexed with HNSW [P7-C1].";
//! assert_eq!(extract_citation_ids(answer), vec!["P7-C1"]);
//!
//! let segments = tokenize_answer(answer);
//! assert_eq!(segments.len(), 3);
//! assert!(matches!(&segments[1], Segment::Citation { id, .. } if id == "P7-C1"));
//! ```

pub mod evidence;
pub mod tokenizer;

pub use evidence::{
    evidence_entries, format_page_label, format_source, CitationItem, CitationsMap, PageLabel,
    UNKNOWN,
};
pub use tokenizer::{extract_citation_ids, reconstruct, tokenize_answer, Segment, MAX_ID_LEN};
