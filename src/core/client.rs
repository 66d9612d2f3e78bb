//! Async translation client: one request, one classified outcome

use std::time::Duration;
use tracing::debug;

use crate::core::config::{ClientConfig, CredentialPlacement};
use crate::core::errors::{Result, TranslationFailure};
use crate::core::models::{TranslationRequest, TranslationResult};

/// Status text used when the code has neither a wire nor a standard reason phrase
pub const UNKNOWN_STATUS: &str = "Unknown Status";

/// Single-shot translation client
#[derive(Debug, Clone)]
pub struct TranslationClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl TranslationClient {
    /// Create a new translation client
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let timeout = Duration::from_millis(config.timeout_ms);
        // No idle connections are kept, so nothing survives between calls.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(0)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create from environment
    pub fn from_env() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()?;
        Self::new(config)
    }

    /// Transport configuration in use
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Translate a single request.
    ///
    /// The caller is expected to have rejected empty text already. No retries
    /// are performed; every failure comes back as a [`TranslationFailure`].
    pub async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResult> {
        if !request.has_credential() {
            debug!("Skipping request: credential missing or placeholder");
            return Err(TranslationFailure::MissingCredential);
        }

        let url = self.build_url(request)?;
        debug!(
            "Requesting translation {} -> {} ({} chars) from {}",
            request.source_lang,
            request.target_lang,
            request.text.chars().count(),
            url.host_str().unwrap_or_default()
        );

        let mut builder = self.client.get(url);
        if self.config.credential_placement == CredentialPlacement::Header {
            builder = builder.header(
                reqwest::header::AUTHORIZATION,
                format!("DeepL-Auth-Key {}", request.credential.trim()),
            );
        }

        let response = builder.send().await.map_err(TranslationFailure::network)?;

        let status = response.status();
        if !status.is_success() {
            debug!("Translation endpoint returned {}", status);
            return Err(TranslationFailure::HttpError {
                status: status.as_u16(),
                status_text: status_text(&response),
            });
        }

        let body = response.text().await.map_err(TranslationFailure::network)?;
        let result = parse_response(&request.text, &body);

        match &result {
            Ok(_) => debug!("Translation succeeded"),
            Err(e) => debug!("Translation failed: {}", e.kind()),
        }

        result
    }

    /// Build the endpoint URL with the request encoded as query parameters
    fn build_url(&self, request: &TranslationRequest) -> Result<url::Url> {
        let mut url = url::Url::parse(&self.config.endpoint).map_err(|e| {
            TranslationFailure::NetworkError {
                message: format!("invalid endpoint: {}", e),
            }
        })?;

        {
            let mut query = url.query_pairs_mut();
            if self.config.credential_placement == CredentialPlacement::Query {
                query.append_pair("auth_key", request.credential.trim());
            }
            query
                .append_pair("text", &request.text)
                .append_pair("source_lang", &request.source_lang)
                .append_pair("target_lang", &request.target_lang);
        }

        Ok(url)
    }
}

/// Reason phrase sent by the server, else the standard one for the code
fn status_text(response: &reqwest::Response) -> String {
    let status = response.status();
    response
        .extensions()
        .get::<hyper::ext::ReasonPhrase>()
        .and_then(|reason| std::str::from_utf8(reason.as_bytes()).ok())
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .or_else(|| status.canonical_reason())
        .unwrap_or(UNKNOWN_STATUS)
        .to_string()
}

/// Interpret a success body as `{"translations":[{"text": ...}]}`
fn parse_response(original_text: &str, body: &str) -> Result<TranslationResult> {
    let json: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| TranslationFailure::malformed(format!("body is not valid JSON: {}", e)))?;

    let translations = json
        .get("translations")
        .ok_or_else(|| TranslationFailure::malformed("missing field `translations`"))?
        .as_array()
        .ok_or_else(|| TranslationFailure::malformed("field `translations` is not a list"))?;

    let first = translations
        .first()
        .ok_or_else(|| TranslationFailure::malformed("`translations` list is empty"))?;

    let translated_text = first
        .get("text")
        .ok_or_else(|| TranslationFailure::malformed("missing field `translations[0].text`"))?
        .as_str()
        .ok_or_else(|| TranslationFailure::malformed("field `translations[0].text` is not a string"))?
        .to_string();

    let detected_source_lang = first
        .get("detected_source_language")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    Ok(TranslationResult {
        original_text: original_text.to_string(),
        translated_text,
        detected_source_lang,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::PLACEHOLDER_CREDENTIAL;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::get,
        Router,
    };
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio_test::{assert_err, assert_ok};

    /// What the stub endpoint saw
    #[derive(Debug, Clone, Default)]
    struct Seen {
        queries: Vec<HashMap<String, String>>,
        auth_headers: Vec<Option<String>>,
    }

    #[derive(Clone)]
    struct Stub {
        status: StatusCode,
        body: String,
        seen: Arc<Mutex<Seen>>,
    }

    async fn stub_handler(
        State(stub): State<Stub>,
        headers: HeaderMap,
        Query(query): Query<HashMap<String, String>>,
    ) -> (StatusCode, String) {
        {
            let mut seen = stub.seen.lock().unwrap();
            seen.queries.push(query);
            seen.auth_headers.push(
                headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .map(|s| s.to_string()),
            );
        }
        (stub.status, stub.body.clone())
    }

    /// Serve a canned response on a local port and return the endpoint URL
    async fn spawn_stub(status: StatusCode, body: &str) -> (String, Arc<Mutex<Seen>>) {
        let seen = Arc::new(Mutex::new(Seen::default()));
        let stub = Stub {
            status,
            body: body.to_string(),
            seen: seen.clone(),
        };
        let app = Router::new()
            .route("/v2/translate", get(stub_handler))
            .with_state(stub);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v2/translate", addr), seen)
    }

    /// Answer every connection with raw bytes, optionally stalling first
    async fn spawn_raw(response: &'static str, stall: Option<Duration>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 4096];
                    let _ = socket.read(&mut buf).await;
                    if let Some(stall) = stall {
                        tokio::time::sleep(stall).await;
                    }
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{}/v2/translate", addr)
    }

    fn client_for(endpoint: &str) -> TranslationClient {
        TranslationClient::new(ClientConfig {
            endpoint: endpoint.to_string(),
            timeout_ms: 5000,
            ..Default::default()
        })
        .unwrap()
    }

    fn request(text: &str) -> TranslationRequest {
        TranslationRequest::new(text, "en", "fr", "test-key:fx")
    }

    #[tokio::test]
    async fn test_translate_success() {
        let (endpoint, seen) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"Bonjour"}]}"#).await;
        let client = client_for(&endpoint);

        let result = assert_ok!(client.translate(&request("Hello")).await);
        assert_eq!(result.original_text, "Hello");
        assert_eq!(result.translated_text, "Bonjour");
        assert_eq!(result.detected_source_lang, None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.queries.len(), 1);
        let query = &seen.queries[0];
        assert_eq!(query.get("auth_key").map(String::as_str), Some("test-key:fx"));
        assert_eq!(query.get("source_lang").map(String::as_str), Some("en"));
        assert_eq!(query.get("target_lang").map(String::as_str), Some("fr"));
    }

    #[tokio::test]
    async fn test_translate_keeps_detected_language() {
        let (endpoint, _) = spawn_stub(
            StatusCode::OK,
            r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#,
        )
        .await;
        let client = client_for(&endpoint);

        let result = assert_ok!(client.translate(&request("Hello")).await);
        assert_eq!(result.translated_text, "Hallo");
        assert_eq!(result.detected_source_lang.as_deref(), Some("EN"));
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_call() {
        let (endpoint, seen) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"Bonjour"}]}"#).await;
        let client = client_for(&endpoint);

        for credential in ["", "   ", PLACEHOLDER_CREDENTIAL] {
            let request = TranslationRequest::new("Hello", "en", "fr", credential);
            let err = assert_err!(client.translate(&request).await);
            assert_eq!(err, TranslationFailure::MissingCredential);
        }

        assert!(seen.lock().unwrap().queries.is_empty());
    }

    #[tokio::test]
    async fn test_text_survives_url_encoding() {
        let (endpoint, seen) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"ok"}]}"#).await;
        let client = client_for(&endpoint);

        let samples = [
            "Hello",
            "a & b = c?",
            "100% sure #hashtag",
            "  leading and trailing  ",
            "line one\nline two\ttab",
            "plus+sign and spaces",
            "héllo wörld ñ 日本語 🙂",
            "auth_key=stolen&target_lang=de",
        ];

        for text in samples {
            assert_ok!(client.translate(&request(text)).await);
        }

        let seen = seen.lock().unwrap();
        let decoded: Vec<&str> = seen
            .queries
            .iter()
            .map(|q| q.get("text").map(String::as_str).unwrap_or_default())
            .collect();
        assert_eq!(decoded, samples);
        // Injected parameters stay inside the text value.
        assert!(seen
            .queries
            .iter()
            .all(|q| q.get("target_lang").map(String::as_str) == Some("fr")));
    }

    #[test]
    fn test_build_url_round_trip() {
        let client = client_for("https://api.example.com/v2/translate");
        let text = "Ça va? 1+1=2 & more";

        let url = assert_ok!(client.build_url(&request(text)));
        assert_eq!(url.scheme(), "https");

        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs.get("text").map(String::as_str), Some(text));
        assert_eq!(pairs.get("auth_key").map(String::as_str), Some("test-key:fx"));
    }

    #[tokio::test]
    async fn test_header_placement_keeps_key_out_of_url() {
        let (endpoint, seen) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"Bonjour"}]}"#).await;
        let client = TranslationClient::new(ClientConfig {
            endpoint,
            timeout_ms: 5000,
            credential_placement: CredentialPlacement::Header,
        })
        .unwrap();

        assert_ok!(client.translate(&request("Hello")).await);

        let seen = seen.lock().unwrap();
        assert!(!seen.queries[0].contains_key("auth_key"));
        assert_eq!(
            seen.auth_headers[0].as_deref(),
            Some("DeepL-Auth-Key test-key:fx")
        );
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Grab a free port, then close it so nothing is listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}/v2/translate", addr));
        let err = assert_err!(client.translate(&request("Hello")).await);

        match err {
            TranslationFailure::NetworkError { message } => {
                assert!(!message.contains("test-key"));
            }
            other => panic!("expected NetworkError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_http_error() {
        let (endpoint, _) = spawn_stub(StatusCode::UNAUTHORIZED, "").await;
        let client = client_for(&endpoint);

        let err = assert_err!(client.translate(&request("Hello")).await);
        assert_eq!(
            err,
            TranslationFailure::HttpError {
                status: 401,
                status_text: "Unauthorized".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (endpoint, seen) = spawn_stub(StatusCode::SERVICE_UNAVAILABLE, "busy").await;
        let client = client_for(&endpoint);

        let err = assert_err!(client.translate(&request("Hello")).await);
        assert_eq!(
            err,
            TranslationFailure::HttpError {
                status: 503,
                status_text: "Service Unavailable".to_string(),
            }
        );
        assert_eq!(seen.lock().unwrap().queries.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_translations_is_malformed() {
        let (endpoint, _) = spawn_stub(StatusCode::OK, r#"{"translations": []}"#).await;
        let client = client_for(&endpoint);

        let err = assert_err!(client.translate(&request("Hello")).await);
        assert_eq!(
            err,
            TranslationFailure::MalformedResponse {
                message: "`translations` list is empty".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_then_success_are_independent() {
        let (bad, _) = spawn_stub(StatusCode::OK, "garbled <html>").await;
        let (good, _) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"Bonjour"}]}"#).await;

        assert_err!(client_for(&bad).translate(&request("Hello")).await);
        let result = assert_ok!(client_for(&good).translate(&request("Hello")).await);
        assert_eq!(result.translated_text, "Bonjour");
    }

    #[test]
    fn test_parse_response_shapes() {
        let cases = [
            ("not json", "body is not valid JSON"),
            ("{}", "missing field `translations`"),
            (r#"{"translations": {"text": "x"}}"#, "is not a list"),
            (r#"{"translations": []}"#, "list is empty"),
            (r#"{"translations": [{}]}"#, "missing field `translations[0].text`"),
            (r#"{"translations": [{"text": 42}]}"#, "is not a string"),
        ];

        for (body, expected) in cases {
            match parse_response("Hello", body) {
                Err(TranslationFailure::MalformedResponse { message }) => {
                    assert!(message.contains(expected), "{} => {}", body, message);
                }
                other => panic!("{} => unexpected {:?}", body, other),
            }
        }
    }

    #[test]
    fn test_parse_response_never_invents_text() {
        for body in [r#"{"translations": []}"#, r#"{"translations": [{"txt": "x"}]}"#] {
            if let Ok(result) = parse_response("Hello", body) {
                panic!("fabricated result {:?}", result);
            }
        }
    }

    #[test]
    fn test_parse_response_uses_first_translation() {
        let body = r#"{"translations":[{"text":"Bonjour"},{"text":"Salut"}]}"#;
        let result = assert_ok!(parse_response("Hello", body));
        assert_eq!(
            result,
            TranslationResult {
                original_text: "Hello".to_string(),
                translated_text: "Bonjour".to_string(),
                detected_source_lang: None,
            }
        );
    }

    #[tokio::test]
    async fn test_nonstandard_status_has_text() {
        let status = StatusCode::from_u16(456).unwrap();
        let (endpoint, _) = spawn_stub(status, "").await;
        let client = client_for(&endpoint);

        match assert_err!(client.translate(&request("Hello")).await) {
            TranslationFailure::HttpError { status, status_text } => {
                assert_eq!(status, 456);
                assert!(!status_text.is_empty());
            }
            other => panic!("expected HttpError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wire_reason_phrase_is_kept() {
        let endpoint = spawn_raw(
            "HTTP/1.1 456 Quota Exceeded\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            None,
        )
        .await;
        let client = client_for(&endpoint);

        let err = assert_err!(client.translate(&request("Hello")).await);
        assert_eq!(
            err,
            TranslationFailure::HttpError {
                status: 456,
                status_text: "Quota Exceeded".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_timeout_is_network_error() {
        let endpoint = spawn_raw("", Some(Duration::from_secs(5))).await;
        let client = TranslationClient::new(ClientConfig {
            endpoint,
            timeout_ms: 200,
            ..Default::default()
        })
        .unwrap();

        match assert_err!(client.translate(&request("Hello")).await) {
            TranslationFailure::NetworkError { message } => {
                assert!(message.starts_with("request timed out"), "{}", message);
            }
            other => panic!("expected NetworkError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_body_is_network_error() {
        let endpoint = spawn_raw(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 100\r\n\r\n{\"translations\":[",
            None,
        )
        .await;
        let client = client_for(&endpoint);

        let err = assert_err!(client.translate(&request("Hello")).await);
        assert_eq!(err.kind(), "network_error");
    }

    #[tokio::test]
    async fn test_credential_is_sent_trimmed() {
        let (endpoint, seen) =
            spawn_stub(StatusCode::OK, r#"{"translations":[{"text":"Bonjour"}]}"#).await;
        let client = client_for(&endpoint);

        let padded = TranslationRequest {
            credential: "  test-key:fx \n".to_string(),
            ..request("Hello")
        };
        assert_ok!(client.translate(&padded).await);

        let seen = seen.lock().unwrap();
        assert_eq!(
            seen.queries[0].get("auth_key").map(String::as_str),
            Some("test-key:fx")
        );
    }
}
