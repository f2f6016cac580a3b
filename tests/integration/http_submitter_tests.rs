//! HTTP submitter tests against a mock server

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::VoucherFactory;
    use crate::common::fixtures::settings;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use voucher_upload::config::{Credentials, EndpointConfig};
    use voucher_upload::core::sink::MemoryResultSink;
    use voucher_upload::{
        HttpSubmitter, RawOutcome, RunStatus, SharedControlSignal, Submitter, UploadEngine,
    };
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn endpoint(base_url: &str) -> EndpointConfig {
        let mut headers = BTreeMap::new();
        headers.insert("X-User-Type".to_string(), "advertiser".to_string());
        EndpointConfig {
            base_url: base_url.to_string(),
            credentials: Credentials::Basic {
                username: "u".to_string(),
                password: "p".to_string(),
            },
            headers,
            timeout_secs: 5,
            ..EndpointConfig::default()
        }
    }

    // ==================== Single Call Tests ====================

    #[tokio::test]
    async fn test_posts_voucher_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/offers/voucher-benefits"))
            .and(header("authorization", "Basic dTpw"))
            .and(header("content-type", "application/json"))
            .and(header("x-user-type", "advertiser"))
            .and(body_json(json!({
                "voucher_benefits": [{
                    "offer_id": "offer_42",
                    "voucher_type": "VOUCHER_TYPE_PERSONALISED",
                    "voucher_status": "VOUCHER_BENEFIT_STATUS_UNCLAIMED",
                    "voucher_value": 3000,
                    "expiry_date": 1767225600,
                    "voucher_code": "VCH-00003",
                    "rzp_commission": 150
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"created":1}"#))
            .expect(1)
            .mount(&server)
            .await;

        let submitter = assert_ok!(HttpSubmitter::new(&endpoint(&server.uri())));
        let raw = submitter.submit(&VoucherFactory::item(3)).await;

        assert_eq!(raw, RawOutcome::response(200, r#"{"created":1}"#));
    }

    #[tokio::test]
    async fn test_bearer_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer t0ken"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = endpoint(&server.uri());
        config.credentials = Credentials::Bearer {
            token: "t0ken".to_string(),
        };
        let submitter = assert_ok!(HttpSubmitter::new(&config));

        assert_eq!(submitter.submit(&VoucherFactory::item(1)).await.status(), Some(200));
    }

    #[tokio::test]
    async fn test_error_status_keeps_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("voucher_code already exists"))
            .mount(&server)
            .await;

        let submitter = assert_ok!(HttpSubmitter::new(&endpoint(&server.uri())));
        let raw = submitter.submit(&VoucherFactory::item(1)).await;

        assert_eq!(raw.status(), Some(422));
        assert_eq!(raw.body(), Some("voucher_code already exists"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_failure() {
        let submitter = assert_ok!(HttpSubmitter::new(&endpoint("http://127.0.0.1:1")));
        let raw = submitter.submit(&VoucherFactory::item(1)).await;

        assert!(matches!(raw, RawOutcome::Transport { .. }));
        assert!(!raw.error_text().is_empty());
    }

    /// Answer one request with `head` and a body shorter than its Content-Length
    async fn truncated_response_server(head: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length || n == 0 {
                        break;
                    }
                }
            }
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(b"partial").await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_unreadable_body_keeps_status() {
        let base_url =
            truncated_response_server("HTTP/1.1 502 Bad Gateway\r\nContent-Length: 100\r\n\r\n").await;

        let submitter = assert_ok!(HttpSubmitter::new(&endpoint(&base_url)));
        let raw = submitter.submit(&VoucherFactory::item(1)).await;

        assert_eq!(raw.status(), Some(502));
        assert!(
            raw.error_text().contains("could not be read"),
            "{}",
            raw.error_text()
        );
    }

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = endpoint("http://localhost");
        config.headers.insert("bad header".to_string(), "x".to_string());
        assert!(HttpSubmitter::new(&config).is_err());
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let submitter = assert_ok!(HttpSubmitter::new(&endpoint("https://api.example.com/")));
        assert_eq!(submitter.url(), "https://api.example.com/offers/voucher-benefits");
    }

    // ==================== Engine Over HTTP ====================

    #[tokio::test]
    async fn test_engine_retries_throttle_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(4)
            .mount(&server)
            .await;

        let submitter = Arc::new(assert_ok!(HttpSubmitter::new(&endpoint(&server.uri()))));
        let engine = UploadEngine::new(
            &settings(2, 50, 2),
            submitter,
            Arc::new(SharedControlSignal::default()),
        );
        let sink = MemoryResultSink::new();

        let result = assert_ok!(engine.run_and_persist(VoucherFactory::items(4), &sink).await);

        assert_eq!(result.status(), RunStatus::Completed);
        assert_eq!(result.successes().count(), 4);
        let retried: Vec<_> = result
            .entries()
            .iter()
            .filter(|e| e.outcome.attempt_count == 2)
            .collect();
        assert_eq!(retried.len(), 1);
        assert!(sink.failed().is_empty());
    }

    #[tokio::test]
    async fn test_engine_records_persistent_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .expect(3)
            .mount(&server)
            .await;

        let submitter = Arc::new(assert_ok!(HttpSubmitter::new(&endpoint(&server.uri()))));
        let engine = UploadEngine::new(
            &settings(1, 50, 10),
            submitter,
            Arc::new(SharedControlSignal::default()),
        );

        let result = engine.run(VoucherFactory::items(1)).await;

        let failure = result.failures().next().unwrap();
        assert_eq!(failure.outcome.attempt_count, 3);
        assert_eq!(failure.outcome.status_code, Some(500));
        assert_eq!(failure.outcome.error_message.as_deref(), Some("upstream exploded"));
    }
}
