//! Upload command handler.
//!
//! Sends a PDF to `/index-pdf` so later questions can be answered from it.

use clap::Args;
use intellirag_client::{HttpBackend, IndexPdfResponse, PdfUpload, RagBackend};
use intellirag_core::{config::AppConfig, AppResult};
use std::fmt::Write;
use std::path::PathBuf;

/// Upload a PDF for indexing
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// Path to the PDF file
    pub path: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl UploadCommand {
    /// Execute the upload command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing upload command for {:?}", self.path);

        let backend = HttpBackend::from_config(config)?;
        let output = self.run(&backend).await?;
        println!("{}", output.trim_end());

        Ok(())
    }

    /// Upload through `backend` and return the rendered output.
    pub async fn run(&self, backend: &dyn RagBackend) -> AppResult<String> {
        let upload = PdfUpload::from_path(&self.path).await?;

        tracing::info!(backend = backend.base_url(), "Calling /index-pdf");
        let response = backend.index_pdf(&upload).await?;

        if self.json {
            let output = serde_json::json!({
                "file": upload.file_name,
                "summary": response.summary(),
                "response": response,
            });
            Ok(serde_json::to_string_pretty(&output)?)
        } else {
            Ok(render_summary(&upload.file_name, &response))
        }
    }
}

fn render_summary(file_name: &str, response: &IndexPdfResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", response.summary());
    let _ = writeln!(
        out,
        "  File: {}",
        response.filename.as_deref().unwrap_or(file_name)
    );
    if let Some(chunks) = response.chunks_indexed {
        let _ = writeln!(out, "  Chunks indexed: {}", chunks);
    }
    out
}
