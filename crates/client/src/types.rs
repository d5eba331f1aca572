//! Request and response types for the service endpoints.

use intellirag_citations::CitationsMap;
use intellirag_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Body of `POST /qa`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaRequest {
    /// The question text
    pub question: String,

    /// Restrict retrieval to one indexed document; `None` searches all
    pub document_scope: Option<String>,
}

impl QaRequest {
    /// Create a request searching every indexed document.
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            document_scope: None,
        }
    }

    /// Restrict retrieval to a single document.
    pub fn with_scope(mut self, document: impl Into<String>) -> Self {
        self.document_scope = Some(document.into());
        self
    }
}

/// How well the answer is grounded in citations, as judged by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    #[default]
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a confidence label, ignoring case and surrounding whitespace.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body returned by `POST /qa`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QaResponse {
    /// Generated answer, possibly containing citation tokens
    #[serde(default)]
    pub answer: String,

    /// Raw retrieved context (debugging aid)
    #[serde(default)]
    pub context: String,

    /// Evidence keyed by citation id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<CitationsMap>,

    /// Unrecognised labels degrade to low instead of failing the response
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_confidence"
    )]
    pub confidence: Option<Confidence>,
}

fn lenient_confidence<'de, D>(deserializer: D) -> Result<Option<Confidence>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(label)) => match Confidence::parse(&label) {
            Some(confidence) => Some(confidence),
            None => {
                tracing::warn!("Unknown confidence {:?}, treating as low", label);
                Some(Confidence::Low)
            }
        },
        Some(other) => {
            tracing::warn!("Confidence is not a string ({}), treating as low", other);
            Some(Confidence::Low)
        }
    })
}

impl QaResponse {
    /// Confidence to display; an absent value counts as low.
    pub fn confidence_or_default(&self) -> Confidence {
        self.confidence.unwrap_or_default()
    }

    /// Whether the service returned any evidence entries.
    pub fn has_citations(&self) -> bool {
        self.citations.as_ref().is_some_and(|c| !c.is_empty())
    }
}

/// Body returned by `POST /index-pdf`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexPdfResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunks_indexed: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl IndexPdfResponse {
    /// Status line for the user: `message`, else `status`, else a default.
    pub fn summary(&self) -> &str {
        self.message
            .as_deref()
            .or(self.status.as_deref())
            .unwrap_or("Indexed successfully")
    }
}

/// A PDF ready to be sent to `/index-pdf`.
#[derive(Clone, PartialEq)]
pub struct PdfUpload {
    /// File name reported to the service
    pub file_name: String,

    /// File contents
    pub bytes: Vec<u8>,
}

impl fmt::Debug for PdfUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfUpload")
            .field("file_name", &self.file_name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl PdfUpload {
    /// Build an upload from in-memory contents.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> AppResult<Self> {
        let file_name = file_name.into();

        if !has_pdf_extension(&file_name) {
            return Err(AppError::Validation(format!(
                "Only PDF files are supported: {}",
                file_name
            )));
        }

        if bytes.is_empty() {
            return Err(AppError::Validation(format!("File is empty: {}", file_name)));
        }

        Ok(Self { file_name, bytes })
    }

    /// Read a PDF from disk.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| AppError::Validation(format!("Not a file path: {:?}", path)))?
            .to_string();

        if !has_pdf_extension(&file_name) {
            return Err(AppError::Validation(format!(
                "Only PDF files are supported: {}",
                file_name
            )));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            AppError::Validation(format!("Failed to read {:?}: {}", path, e))
        })?;

        tracing::debug!("Loaded {} ({} bytes)", file_name, bytes.len());

        Self::new(file_name, bytes)
    }
}

fn has_pdf_extension(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
