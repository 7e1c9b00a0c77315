//! Turning the form into a request, sending it, and capturing the result.
//!
//! `Idle -> Building -> Executing -> Reading -> Done`. Any failure goes
//! straight to `Done` with the error text as the summary; nothing is retried.

use std::time::Instant;

use chrono::{DateTime, Local};
use reqwest::{
    Method, Url,
    header::{HeaderName, HeaderValue},
};
use thiserror::Error;

use crate::transport::{Transport, TransportError, WireRequest, WireResponse};

const SEPARATOR: &str = "--------------------";

/// Where the pipeline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Building,
    Executing,
    Reading,
    Done,
}

/// The raw field values at the moment of submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub method: String,
    pub url: String,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

/// Why a submission ended without a response.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("No URL found.\n")]
    NoUrl,
    #[error("{0}")]
    Encoding(#[from] serde_json::Error),
    #[error("{0}")]
    Construction(String),
    #[error("{0}")]
    Transport(#[from] TransportError),
    /// The background executor could not run the request.
    #[error("{0}")]
    Executor(String),
}

impl SubmitError {
    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            SubmitError::NoUrl | SubmitError::Encoding(_) | SubmitError::Construction(_) => {
                Stage::Building
            }
            SubmitError::Transport(_) | SubmitError::Executor(_) => Stage::Executing,
        }
    }
}

/// A received response, rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedResponse {
    pub status_code: u16,
    pub summary: String,
    pub body: String,
}

// ── Building ─────────────────────────────────────────────────────────

/// Add `https://` when the URL has no scheme separator.
pub fn normalize_url(url: &str) -> String {
    if url.contains("//") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// The whole body text as one JSON string value.
pub fn encode_body(text: &str) -> Result<Vec<u8>, SubmitError> {
    Ok(serde_json::to_vec(text)?)
}

/// Build the wire request from a snapshot.
///
/// An empty URL stops here before anything else is read.
pub fn prepare(snapshot: &RequestSnapshot) -> Result<WireRequest, SubmitError> {
    if snapshot.url.is_empty() {
        return Err(SubmitError::NoUrl);
    }

    let url = normalize_url(&snapshot.url);
    let body = encode_body(&snapshot.body)?;

    let method = Method::from_bytes(snapshot.method.as_bytes())
        .map_err(|e| SubmitError::Construction(format!("invalid method {:?}: {e}", snapshot.method)))?;
    Url::parse(&url).map_err(|e| SubmitError::Construction(format!("parse {url:?}: {e}")))?;

    let mut headers: Vec<(String, String)> = Vec::with_capacity(snapshot.headers.len());
    for (name, value) in &snapshot.headers {
        if name.is_empty() {
            continue;
        }
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SubmitError::Construction(format!("invalid header field name {name:?}")))?;
        HeaderValue::from_str(value).map_err(|_| {
            SubmitError::Construction(format!("invalid header field value for {name:?}"))
        })?;

        // Last write wins per name
        match headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value.clone(),
            None => headers.push((name.clone(), value.clone())),
        }
    }

    Ok(WireRequest {
        method,
        url,
        body,
        headers,
    })
}

// ── Capturing ────────────────────────────────────────────────────────

/// Render a response: status line, separator, sorted headers, separator,
/// then any body read error.
pub fn capture(response: WireResponse) -> CapturedResponse {
    let mut headers = response.headers;
    headers.sort_by(|a, b| {
        a.0.to_ascii_lowercase()
            .cmp(&b.0.to_ascii_lowercase())
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut summary = String::new();
    summary.push_str(&response.status_line);
    summary.push_str("\n\n");
    summary.push_str(SEPARATOR);
    summary.push('\n');
    for (name, value) in &headers {
        summary.push('\n');
        summary.push_str(name);
        summary.push_str(": ");
        summary.push_str(value);
    }
    summary.push_str("\n\n");
    summary.push_str(SEPARATOR);
    summary.push_str("\n\n");
    if let Some(err) = &response.read_error {
        summary.push_str(err);
    }

    CapturedResponse {
        status_code: response.status_code,
        summary,
        body: String::from_utf8_lossy(&response.body).to_string(),
    }
}

// ── Executing ────────────────────────────────────────────────────────

/// Send a prepared request and capture the response.
pub async fn execute<T: Transport>(
    transport: &T,
    request: WireRequest,
) -> Result<CapturedResponse, SubmitError> {
    tracing::info!(stage = ?Stage::Executing, method = %request.method, url = %request.url, "sending request");
    let response = transport.send(request).await.inspect_err(|e| {
        tracing::warn!(error = %e, "transport error");
    })?;

    tracing::debug!(stage = ?Stage::Reading, status = %response.status_line, bytes = response.body.len(), "response received");
    if let Some(err) = &response.read_error {
        tracing::warn!(error = %err, "response body read failed");
    }
    Ok(capture(response))
}

/// The whole pipeline: prepare, send, capture.
pub async fn submit<T: Transport>(
    transport: &T,
    snapshot: &RequestSnapshot,
) -> Result<CapturedResponse, SubmitError> {
    tracing::debug!(stage = ?Stage::Building, "building request");
    let request = prepare(snapshot)?;
    execute(transport, request).await
}

// ── Response state ───────────────────────────────────────────────────

/// What the response view shows.
///
/// Empty until the first submission; each submission overwrites the summary.
/// The body is only replaced when a response was actually received.
#[derive(Debug, Clone, Default)]
pub struct ResponseState {
    pub summary: String,
    pub body: String,
    pub status_code: Option<u16>,
    pub received_at: Option<DateTime<Local>>,
    pub elapsed_ms: Option<u128>,
}

impl ResponseState {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }

    /// Record the outcome of one submission started at `started`.
    pub fn apply(&mut self, outcome: Result<CapturedResponse, SubmitError>, started: Instant) {
        self.elapsed_ms = Some(started.elapsed().as_millis());
        self.received_at = Some(Local::now());
        match outcome {
            Ok(captured) => {
                tracing::info!(stage = ?Stage::Done, status = captured.status_code, "request complete");
                self.status_code = Some(captured.status_code);
                self.summary = captured.summary;
                self.body = captured.body;
            }
            Err(err) => {
                tracing::info!(stage = ?Stage::Done, failed = ?err.stage(), error = %err, "request failed");
                self.status_code = None;
                self.summary = err.to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and answers with a canned result.
    struct MockTransport {
        requests: Mutex<Vec<WireRequest>>,
        reply: Result<WireResponse, TransportError>,
    }

    impl MockTransport {
        fn replying(reply: Result<WireResponse, TransportError>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn ok() -> Self {
            Self::replying(Ok(WireResponse {
                status_line: "200 OK".to_string(),
                status_code: 200,
                headers: vec![("Content-Type".to_string(), "text/plain".to_string())],
                body: b"ok".to_vec(),
                read_error: None,
            }))
        }

        fn sent(&self) -> Vec<WireRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
            self.requests.lock().unwrap().push(request);
            self.reply.clone()
        }
    }

    fn snapshot(method: &str, url: &str, body: &str, headers: &[(&str, &str)]) -> RequestSnapshot {
        RequestSnapshot {
            method: method.to_string(),
            url: url.to_string(),
            body: body.to_string(),
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("example.com"), "https://example.com");
        assert_eq!(normalize_url("http://x"), "http://x");
        assert_eq!(normalize_url("//cdn.test/a"), "//cdn.test/a");
    }

    #[test]
    fn test_encode_body_as_json_string() {
        assert_eq!(encode_body("hi").unwrap(), b"\"hi\"");
        assert_eq!(
            encode_body("{\n  \"a\": 1\n}").unwrap(),
            br#""{\n  \"a\": 1\n}""#.to_vec()
        );
        assert_eq!(encode_body("").unwrap(), b"\"\"");
    }

    #[test]
    fn test_prepare_headers_last_write_wins() {
        let request = prepare(&snapshot(
            "GET",
            "x.test",
            "",
            &[("Accept", "a"), ("", "skipped"), ("X-One", "1"), ("accept", "b")],
        ))
        .unwrap();
        assert_eq!(
            request.headers,
            vec![
                ("Accept".to_string(), "b".to_string()),
                ("X-One".to_string(), "1".to_string())
            ]
        );
    }

    #[test]
    fn test_prepare_construction_errors() {
        let err = prepare(&snapshot("GET", "https://", "", &[])).unwrap_err();
        assert!(matches!(err, SubmitError::Construction(_)));
        assert_eq!(err.stage(), Stage::Building);

        let err = prepare(&snapshot("BAD METHOD", "x.test", "", &[])).unwrap_err();
        assert!(matches!(err, SubmitError::Construction(_)));

        let err = prepare(&snapshot("GET", "x.test", "", &[("bad name", "v")])).unwrap_err();
        assert!(matches!(err, SubmitError::Construction(_)));

        let err = prepare(&snapshot("GET", "x.test", "", &[("X-A", "line\nbreak")])).unwrap_err();
        assert!(matches!(err, SubmitError::Construction(_)));
    }

    #[tokio::test]
    async fn test_empty_url_never_reaches_transport() {
        let transport = MockTransport::ok();
        let mut state = ResponseState {
            body: "previous".to_string(),
            ..Default::default()
        };

        let outcome = submit(&transport, &snapshot("GET", "", "body", &[])).await;
        assert!(matches!(outcome, Err(SubmitError::NoUrl)));
        state.apply(outcome, Instant::now());

        assert!(transport.sent().is_empty());
        assert_eq!(SubmitError::NoUrl.to_string(), "No URL found.\n");
        assert_eq!(state.summary, "No URL found.\n");
        assert_eq!(state.body, "previous");
    }

    #[tokio::test]
    async fn test_scheme_added_before_sending() {
        let transport = MockTransport::ok();
        submit(&transport, &snapshot("GET", "example.com", "", &[]))
            .await
            .unwrap();
        submit(&transport, &snapshot("GET", "http://x", "", &[]))
            .await
            .unwrap();

        let urls: Vec<String> = transport.sent().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["https://example.com", "http://x"]);
    }

    #[tokio::test]
    async fn test_end_to_end_post() {
        let transport = MockTransport::ok();
        let outcome = submit(
            &transport,
            &snapshot("POST", "api.test/x", "hi", &[("X-Test", "1")]),
        )
        .await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].method, Method::POST);
        assert_eq!(sent[0].url, "https://api.test/x");
        assert_eq!(sent[0].body, b"\"hi\"");
        assert_eq!(
            sent[0].headers,
            vec![("X-Test".to_string(), "1".to_string())]
        );

        let mut state = ResponseState::default();
        state.apply(outcome, Instant::now());
        assert!(state.summary.contains("200 OK"));
        assert!(state.summary.contains("Content-Type: text/plain"));
        assert_eq!(state.body, "ok");
        assert_eq!(state.status_code, Some(200));
        assert!(state.received_at.is_some());
    }

    #[tokio::test]
    async fn test_transport_error_becomes_summary() {
        let transport = MockTransport::replying(Err(TransportError::new("dns error: no such host")));
        let mut state = ResponseState {
            body: "old".to_string(),
            ..Default::default()
        };
        let outcome = submit(&transport, &snapshot("GET", "nowhere.invalid", "", &[])).await;
        assert_eq!(outcome.as_ref().unwrap_err().stage(), Stage::Executing);
        state.apply(outcome, Instant::now());

        assert_eq!(state.summary, "dns error: no such host");
        assert_eq!(state.body, "old");
        assert_eq!(state.status_code, None);
    }

    #[test]
    fn test_capture_sorts_headers() {
        let captured = capture(WireResponse {
            status_line: "404 Not Found".to_string(),
            status_code: 404,
            headers: vec![
                ("X-Zeta".to_string(), "z".to_string()),
                ("content-length".to_string(), "0".to_string()),
                ("Date".to_string(), "today".to_string()),
            ],
            body: Vec::new(),
            read_error: None,
        });
        assert_eq!(
            captured.summary,
            "404 Not Found\n\n--------------------\n\ncontent-length: 0\nDate: today\nX-Zeta: z\n\n--------------------\n\n"
        );
        assert_eq!(captured.body, "");
    }

    #[test]
    fn test_capture_keeps_partial_body_on_read_error() {
        let captured = capture(WireResponse {
            status_line: "200 OK".to_string(),
            status_code: 200,
            headers: Vec::new(),
            body: b"part".to_vec(),
            read_error: Some("connection reset".to_string()),
        });
        assert!(captured.summary.ends_with("connection reset"));
        assert_eq!(captured.body, "part");
    }

    #[test]
    fn test_later_submission_overwrites_summary() {
        let mut state = ResponseState::default();
        assert!(state.is_empty());
        state.apply(
            Ok(CapturedResponse {
                status_code: 201,
                summary: "201 Created".to_string(),
                body: "first".to_string(),
            }),
            Instant::now(),
        );
        state.apply(Err(SubmitError::Construction("bad".to_string())), Instant::now());
        assert_eq!(state.summary, "bad");
        assert_eq!(state.body, "first");
    }
}
