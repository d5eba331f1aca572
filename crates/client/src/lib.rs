//! Client for the IntelliRAG question-answering service.
//!
//! The service owns retrieval, generation and confidence scoring. This crate
//! only speaks its HTTP contract:
//! - `POST /qa` with a JSON question
//! - `POST /index-pdf` with a multipart PDF upload
//!
//! # Example
//! ```no_run
//! use intellirag_client::{HttpBackend, QaRequest, RagBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = HttpBackend::new("http://127.0.0.1:8000")?;
//! let response = backend.ask_question(&QaRequest::new("What is HNSW?")).await?;
//! println!("{}", response.answer);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error_body;
pub mod http;
pub mod types;

pub use client::RagBackend;
pub use error_body::extract_error_message;
pub use http::HttpBackend;
pub use types::{Confidence, IndexPdfResponse, PdfUpload, QaRequest, QaResponse};
