//! HTTP clients against a one-shot local responder.

use std::time::Duration;

use docchat_core::auth::{AuthService, Credentials, RegisterRequest};
use docchat_core::search::SearchBackend;
use docchat_interaction::{ApiClient, HttpAuthService, HttpSearchBackend};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// What the responder saw.
struct Captured {
    request_line: String,
    body: String,
}

/// Serves exactly one request with `status` and `body`, returning the
/// base URL and a handle resolving to the captured request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut raw = Vec::new();
        let mut chunk = [0u8; 1024];
        let (head_end, content_length) = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            raw.extend_from_slice(&chunk[..n]);
            if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&raw[..pos]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .map(|v| v.trim().parse::<usize>().unwrap())
                    .unwrap_or(0);
                break (pos + 4, length);
            }
        };
        while raw.len() < head_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        let text = String::from_utf8_lossy(&raw).to_string();
        Captured {
            request_line: text.lines().next().unwrap_or_default().to_string(),
            body: text[head_end..].to_string(),
        }
    });

    (format!("http://{addr}"), handle)
}

fn api(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_search_parses_documents() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"documents":[{"file_name":"a.pdf","date":"2024-01-02","grade":"일반","accuracy":"87.5%","path":"/docs/a.pdf"},{"file_name":"b.pdf"}],"llm_response":"요약된 답변","result_count":2}"#,
    )
    .await;

    let backend = HttpSearchBackend::new(api(&url));
    let response = backend.search("예산 문서").await.unwrap();

    assert_eq!(response.llm_response, "요약된 답변");
    assert_eq!(response.count(), 2);
    assert_eq!(response.documents[0].accuracy, "87.5%");
    assert_eq!(response.documents[1].path, "");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /search/documents"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["question"], "예산 문서");
}

#[tokio::test]
async fn test_search_error_payload_is_backend_error() {
    let (url, server) = serve_once("200 OK", r#"{"error":"질문이 없습니다."}"#).await;

    let err = HttpSearchBackend::new(api(&url)).search("q").await.unwrap_err();

    assert!(err.is_backend());
    assert_eq!(err.user_message(), "❌ 질문이 없습니다.");
    server.await.unwrap();
}

#[tokio::test]
async fn test_search_numeric_error_is_not_a_result() {
    let (url, server) = serve_once("200 OK", r#"{"error":500}"#).await;

    let err = HttpSearchBackend::new(api(&url)).search("q").await.unwrap_err();

    assert!(err.is_backend());
    assert_eq!(err.user_message(), "❌ 500");
    server.await.unwrap();
}

#[tokio::test]
async fn test_search_server_error_is_transport_error() {
    let (url, server) = serve_once("500 Internal Server Error", "boom").await;

    let err = HttpSearchBackend::new(api(&url)).search("q").await.unwrap_err();

    assert!(err.is_transport());
    assert!(err.user_message().starts_with("❌ 오류 발생:"));
    server.await.unwrap();
}

#[tokio::test]
async fn test_search_malformed_body_is_transport_error() {
    let (url, server) = serve_once("200 OK", "not json").await;

    let err = HttpSearchBackend::new(api(&url)).search("q").await.unwrap_err();

    assert!(err.is_transport());
    server.await.unwrap();
}

#[tokio::test]
async fn test_search_unreachable_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = HttpSearchBackend::new(api(&url)).search("q").await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_login_forwards_credentials() {
    let (url, server) = serve_once("200 OK", r#"{"success":true,"message":"환영합니다"}"#).await;

    let auth = HttpAuthService::new(api(&url));
    let reply = auth
        .login(&Credentials::new("alice", "secret").unwrap())
        .await
        .unwrap();

    assert!(reply.success);
    assert_eq!(reply.message, "환영합니다");

    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /auth/login"));
    let sent: serde_json::Value = serde_json::from_str(&captured.body).unwrap();
    assert_eq!(sent["user_id"], "alice");
    assert_eq!(sent["password"], "secret");
}

#[tokio::test]
async fn test_rejected_login_is_not_an_error() {
    let (url, server) = serve_once("200 OK", r#"{"success":false,"message":"비밀번호가 틀렸습니다"}"#).await;

    let reply = HttpAuthService::new(api(&url))
        .login(&Credentials::new("alice", "wrong").unwrap())
        .await
        .unwrap();

    assert!(!reply.success);
    server.await.unwrap();
}

#[tokio::test]
async fn test_request_code_and_register_paths() {
    let (url, server) = serve_once("200 OK", r#"{"success":true}"#).await;
    let reply = HttpAuthService::new(api(&url)).request_code("bob").await.unwrap();
    assert!(reply.success);
    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /auth/request-code"));
    assert!(captured.body.contains("\"user_id\":\"bob\""));

    let (url, server) = serve_once("200 OK", r#"{"success":true,"message":"가입 완료"}"#).await;
    let request = RegisterRequest::new("bob", "1234", "pw").unwrap();
    let reply = HttpAuthService::new(api(&url)).register(&request).await.unwrap();
    assert_eq!(reply.message, "가입 완료");
    let captured = server.await.unwrap();
    assert!(captured.request_line.starts_with("POST /auth/register"));
    assert!(captured.body.contains("\"code\":\"1234\""));
}
