//! Cite command handler.
//!
//! Runs the citation tokenizer over arbitrary text without contacting the
//! service. Useful for checking how an answer will be split.

use clap::Args;
use intellirag_citations::{extract_citation_ids, tokenize_answer, Segment};
use intellirag_core::{AppError, AppResult};
use std::fmt::Write;
use std::io::Read;
use std::path::PathBuf;

/// Extract citation tokens from answer text
#[derive(Args, Debug)]
pub struct CiteCommand {
    /// Answer text (reads stdin when neither TEXT nor --file is given)
    pub text: Option<String>,

    /// Read the answer text from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// List every segment instead of the distinct ids
    #[arg(long)]
    pub segments: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl CiteCommand {
    /// Execute the cite command.
    pub fn execute(&self) -> AppResult<()> {
        tracing::info!("Executing cite command");

        let text = self.read_text()?;
        let output = self.render(&text)?;
        if !output.is_empty() {
            println!("{}", output.trim_end());
        }

        Ok(())
    }

    fn read_text(&self) -> AppResult<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }

        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).map_err(|e| {
                AppError::Validation(format!("Failed to read {:?}: {}", path, e))
            });
        }

        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    }

    /// Render the tokenizer output for `text`.
    pub fn render(&self, text: &str) -> AppResult<String> {
        let ids = extract_citation_ids(text);
        tracing::debug!("Found {} distinct citation id(s)", ids.len());

        if self.json {
            let output = serde_json::json!({
                "citationIds": ids,
                "segments": tokenize_answer(text),
            });
            return Ok(serde_json::to_string_pretty(&output)?);
        }

        let mut out = String::new();
        if self.segments {
            for segment in tokenize_answer(text) {
                match segment {
                    Segment::Text { value } => {
                        let _ = writeln!(out, "text      {:?}", value);
                    }
                    Segment::Citation { id, .. } => {
                        let _ = writeln!(out, "citation  {}", id);
                    }
                }
            }
        } else {
            for id in ids {
                let _ = writeln!(out, "{}", id);
            }
        }
        Ok(out)
    }
}
