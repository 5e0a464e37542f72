use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use page_actions::analyze::client::{AnalyzeError, AnalyzerClient, actions_query};
use page_actions::dispatch::{
    error::DispatchError,
    executor::{Executor, HttpExecutor},
    request::ExecutionRequest,
};

// =========================================================================
// One-shot HTTP responder
// =========================================================================

/// Serve a single request with `body` and hand back the request body that
/// was received.
async fn serve_once(body: &'static str) -> (String, oneshot::Receiver<Value>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/endpoint", listener.local_addr().unwrap());
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request_body = read_request_body(&mut socket).await;
        let _ = tx.send(serde_json::from_str(&request_body).unwrap_or(Value::Null));

        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (url, rx)
}

async fn read_request_body(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                return String::from_utf8_lossy(&buf[header_end + 4..header_end + 4 + content_length])
                    .into_owned();
            }
        }
    }

    String::new()
}

/// An address nothing listens on.
async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/endpoint", addr)
}

fn click_request() -> ExecutionRequest {
    ExecutionRequest::Click {
        element_id: Some("buy".into()),
        element_label: "Buy".into(),
        element_description: "x".into(),
        element_importance: 5.0,
    }
}

// =========================================================================
// HttpExecutor
// =========================================================================

#[tokio::test]
async fn executor_posts_request_and_returns_body() {
    let (url, received) = serve_once(r#"{"success":true,"result":"Done"}"#).await;
    let executor = HttpExecutor::new(&url);

    let body = executor.execute(&click_request()).await.unwrap();
    assert_eq!(body, json!({ "success": true, "result": "Done" }));

    let sent = received.await.unwrap();
    assert_eq!(sent["action_type"], "click");
    assert_eq!(sent["element_id"], "buy");
    assert_eq!(sent["element_label"], "Buy");
    assert_eq!(sent["element_importance"], 5.0);
}

#[tokio::test]
async fn executor_non_json_body_is_a_network_failure() {
    let (url, _received) = serve_once("<html>oops</html>").await;
    let executor = HttpExecutor::new(&url);

    let err = executor.execute(&click_request()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Network(_)), "got {:?}", err);
}

#[tokio::test]
async fn executor_unreachable_is_a_network_failure() {
    let executor = HttpExecutor::new(&closed_endpoint().await);

    let err = executor.execute(&click_request()).await.unwrap_err();
    assert!(matches!(err, DispatchError::Network(_)), "got {:?}", err);
}

// =========================================================================
// AnalyzerClient
// =========================================================================

#[tokio::test]
async fn analyzer_returns_encoded_description() {
    let (url, received) = serve_once(
        r#"{"success":true,"data":{"elements":[{"id":"a","label":"A b","description":"","importance":1,"type":"click"}]}}"#,
    )
    .await;
    let client = AnalyzerClient::new(&url);

    let encoded = client.analyze("https://shop.example.com").await.unwrap();
    assert!(!encoded.contains(' '), "description is percent-encoded");

    let decoded = urlencoding::decode(&encoded).unwrap();
    let value: Value = serde_json::from_str(&decoded).unwrap();
    assert_eq!(value["elements"][0]["label"], "A b");

    assert!(actions_query(&encoded).starts_with("?actions="));
    assert_eq!(received.await.unwrap(), json!({ "link": "https://shop.example.com" }));
}

#[tokio::test]
async fn analyzer_rejection_carries_message() {
    let (url, _received) = serve_once(r#"{"success":false,"message":"page not reachable"}"#).await;
    let client = AnalyzerClient::new(&url);

    match client.analyze("https://x.example").await {
        Err(AnalyzeError::Rejected(message)) => assert_eq!(message, "page not reachable"),
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn analyzer_rejection_without_message_uses_default() {
    let (url, _received) = serve_once(r#"{"success":true,"data":null}"#).await;
    let client = AnalyzerClient::new(&url);

    match client.analyze("https://x.example").await {
        Err(AnalyzeError::Rejected(message)) => assert_eq!(message, "error analyzing the page"),
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn analyzer_unreachable_is_a_transport_error() {
    let client = AnalyzerClient::new(&closed_endpoint().await);

    assert!(matches!(
        client.analyze("https://x.example").await,
        Err(AnalyzeError::Transport(_))
    ));
}
