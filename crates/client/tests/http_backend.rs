//! HTTP backend tests against a one-shot local listener.
//!
//! Each test binds a listener on an ephemeral port, serves a single canned
//! response and hands back the raw request it received.

use std::time::Duration;

use intellirag_client::{Confidence, HttpBackend, PdfUpload, QaRequest, RagBackend};
use intellirag_core::AppError;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Backend that talks to the local listener directly, bypassing any proxy.
fn local_backend(base_url: impl Into<String>, timeout: Duration) -> HttpBackend {
    let client = reqwest::Client::builder()
        .no_proxy()
        .timeout(timeout)
        .build()
        .unwrap();
    HttpBackend::with_client(base_url, client)
}

/// Serve one response and return the request that was received.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf).to_string();
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let headers = text[..header_end].to_ascii_lowercase();

        if headers.contains("transfer-encoding: chunked") {
            if text.ends_with("0\r\n\r\n") {
                break;
            }
            continue;
        }

        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|value| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if buf.len() >= header_end + 4 + content_length {
            break;
        }
    }

    String::from_utf8_lossy(&buf).to_string()
}

#[tokio::test]
async fn ask_question_posts_json_and_parses_answer() {
    let body = r#"{
        "answer": "HNSW builds layered graphs [P7-C1][P8-C2].",
        "context": "retrieved chunks",
        "citations": {
            "P7-C1": {"page": 6, "page_label": "7", "source": "data/uploads/guide.pdf", "snippet": "layered graph"},
            "P8-C2": {"page": "8"}
        },
        "confidence": "high"
    }"#;
    let (base_url, server) = serve_once("200 OK", body).await;

    let backend = local_backend(format!("{}/", base_url), Duration::from_secs(10));
    let request = QaRequest::new("How does HNSW work?").with_scope("guide.pdf");
    let response = backend.ask_question(&request).await.unwrap();

    assert_eq!(response.confidence, Some(Confidence::High));
    let citations = response.citations.as_ref().unwrap();
    assert_eq!(citations.len(), 2);
    assert_eq!(
        citations.get("P7-C1").unwrap().snippet.as_deref(),
        Some("layered graph")
    );

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /qa HTTP/1.1"));
    assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(raw.contains(r#""question":"How does HNSW work?""#));
    assert!(raw.contains(r#""document_scope":"guide.pdf""#));
}

#[tokio::test]
async fn ask_question_surfaces_detail_message() {
    let (base_url, server) = serve_once(
        "400 Bad Request",
        r#"{"detail": "`question` must be a non-empty string."}"#,
    )
    .await;

    let backend = local_backend(base_url, Duration::from_secs(10));
    let err = backend
        .ask_question(&QaRequest::new("   "))
        .await
        .unwrap_err();

    match err {
        AppError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "`question` must be a non-empty string.");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn ask_question_joins_validation_messages() {
    let (base_url, server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"detail": [{"msg": "field required"}, {"msg": "str type expected"}]}"#,
    )
    .await;

    let backend = local_backend(base_url, Duration::from_secs(10));
    let err = backend.ask_question(&QaRequest::new("q?")).await.unwrap_err();

    assert_eq!(err.status(), Some(422));
    assert_eq!(err.to_string(), "field required, str type expected");
    server.await.unwrap();
}

#[tokio::test]
async fn malformed_success_body_is_serialization_error() {
    let (base_url, server) = serve_once("200 OK", "not json").await;

    let backend = local_backend(base_url, Duration::from_secs(10));
    let err = backend.ask_question(&QaRequest::new("q?")).await.unwrap_err();

    assert!(matches!(err, AppError::Serialization(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn index_pdf_sends_multipart_file_field() {
    let (base_url, server) = serve_once(
        "200 OK",
        r#"{"filename": "guide.pdf", "chunks_indexed": 12, "message": "PDF indexed successfully."}"#,
    )
    .await;

    let backend = local_backend(base_url, Duration::from_secs(10));
    let upload = PdfUpload::new("guide.pdf", b"%PDF-1.7 test".to_vec()).unwrap();
    let response = backend.index_pdf(&upload).await.unwrap();

    assert_eq!(response.chunks_indexed, Some(12));
    assert_eq!(response.summary(), "PDF indexed successfully.");

    let raw = server.await.unwrap();
    let lower = raw.to_ascii_lowercase();
    assert!(raw.starts_with("POST /index-pdf HTTP/1.1"));
    assert!(lower.contains("content-type: multipart/form-data; boundary="));
    assert!(lower.contains(r#"form-data; name="file"; filename="guide.pdf""#));
    assert!(lower.contains("content-type: application/pdf"));
    assert!(raw.contains("%PDF-1.7 test"));
}

#[tokio::test]
async fn index_pdf_error_without_json_uses_status() {
    let (base_url, server) = serve_once("500 Internal Server Error", "oops").await;

    let backend = local_backend(base_url, Duration::from_secs(10));
    let upload = PdfUpload::new("guide.pdf", vec![1, 2, 3]).unwrap();
    let err = backend.index_pdf(&upload).await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with status 500");
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let backend = local_backend(base_url, Duration::from_secs(10));
    let err = backend.ask_question(&QaRequest::new("q?")).await.unwrap_err();

    assert!(matches!(err, AppError::Network(_)));
}

#[tokio::test]
async fn slow_service_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let backend = local_backend(base_url, Duration::from_millis(200));
    let err = backend.ask_question(&QaRequest::new("q?")).await.unwrap_err();

    match err {
        AppError::Network(message) => assert!(message.contains("timed out")),
        other => panic!("expected Network error, got {:?}", other),
    }
    server.abort();
}
