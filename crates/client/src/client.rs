//! Backend abstraction.
//!
//! Commands talk to the service through [`RagBackend`] so that rendering and
//! validation can be exercised without a live server.

use intellirag_core::AppResult;

use crate::types::{IndexPdfResponse, PdfUpload, QaRequest, QaResponse};

/// Operations offered by the question-answering service.
///
/// Each call is a single round-trip. Implementations do not retry.
#[async_trait::async_trait]
pub trait RagBackend: Send + Sync {
    /// Base URL requests are sent to, for diagnostics.
    fn base_url(&self) -> &str;

    /// Ask a question against the indexed documents.
    async fn ask_question(&self, request: &QaRequest) -> AppResult<QaResponse>;

    /// Upload a PDF for indexing.
    async fn index_pdf(&self, upload: &PdfUpload) -> AppResult<IndexPdfResponse>;
}
