//! Ask command handler.
//!
//! Sends a question to `/qa` and renders the answer with its citations and
//! evidence.

use clap::Args;
use intellirag_client::{HttpBackend, QaRequest, RagBackend};
use intellirag_core::{config::AppConfig, AppError, AppResult};
use std::path::PathBuf;

use crate::render::{self, RenderOptions};

/// Shortest question accepted, in characters after trimming.
pub const MIN_QUESTION_CHARS: usize = 3;

/// Ask a question about the indexed documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Restrict retrieval to one indexed PDF (file name as uploaded)
    #[arg(short, long)]
    pub scope: Option<String>,

    /// Show every evidence entry, not only those cited in the answer
    #[arg(long)]
    pub all_evidence: bool,

    /// Print the raw retrieved context (debugging)
    #[arg(long)]
    pub show_context: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig, color: bool) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let backend = HttpBackend::from_config(config)?;
        let output = self.run(&backend, color).await?;
        println!("{}", output.trim_end());

        Ok(())
    }

    /// Ask through `backend` and return the rendered output.
    pub async fn run(&self, backend: &dyn RagBackend, color: bool) -> AppResult<String> {
        let question = self.read_question()?;

        let mut request = QaRequest::new(question);
        if let Some(scope) = self.scope.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            request = request.with_scope(scope);
        }

        tracing::info!(backend = backend.base_url(), "Calling /qa");
        let response = backend.ask_question(&request).await?;

        let options = RenderOptions {
            color: color && !self.json,
            all_evidence: self.all_evidence,
            show_context: self.show_context,
        };

        if self.json {
            let value = render::json_report(&response, options);
            Ok(serde_json::to_string_pretty(&value)?)
        } else {
            Ok(render::render_report(&response, options))
        }
    }

    /// Resolve and validate the question text.
    fn read_question(&self) -> AppResult<String> {
        let raw = match (&self.question, &self.file) {
            (Some(question), _) => question.clone(),
            (None, Some(path)) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Validation(format!("Failed to read question file {:?}: {}", path, e))
            })?,
            (None, None) => {
                return Err(AppError::Validation("No question provided".to_string()));
            }
        };

        validate_question(&raw)
    }
}

/// Trim a question and reject ones too short to be meaningful.
pub fn validate_question(raw: &str) -> AppResult<String> {
    let question = raw.trim();
    if question.chars().count() < MIN_QUESTION_CHARS {
        return Err(AppError::Validation(format!(
            "Question must be at least {} characters",
            MIN_QUESTION_CHARS
        )));
    }
    Ok(question.to_string())
}
