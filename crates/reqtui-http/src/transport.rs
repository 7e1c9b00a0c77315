use std::future::Future;

use reqwest::Method;
use thiserror::Error;

/// A fully built request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    /// Normalized URL, exactly as typed plus any added scheme.
    pub url: String,
    pub body: Vec<u8>,
    /// Header pairs in form order, one entry per name.
    pub headers: Vec<(String, String)>,
}

/// What came back: status, headers and as much of the body as was read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireResponse {
    /// e.g. `200 OK`
    pub status_line: String,
    pub status_code: u16,
    /// One value per header name, in no particular order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    /// Set when reading the body failed part way.
    pub read_error: Option<String>,
}

/// The request never produced a response (DNS, connect, TLS...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Something that can send a [`WireRequest`].
pub trait Transport {
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<WireResponse, TransportError>> + Send;
}

/// The real network, through a default `reqwest::Client`.
///
/// No timeout, retry or redirect policy beyond the library defaults.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: WireRequest) -> Result<WireResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url.as_str())
            .body(request.body);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(error_chain(&e)))?;

        let status = response.status();
        let status_line = match status.canonical_reason() {
            Some(reason) => format!("{} {}", status.as_u16(), reason),
            None => status.as_u16().to_string(),
        };

        let headers: Vec<(String, String)> = response
            .headers()
            .keys()
            .filter_map(|name| {
                let value = response.headers().get(name)?;
                Some((
                    canonical_header_name(name.as_str()),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                ))
            })
            .collect();

        // Chunk by chunk so a failure keeps what was already read
        let mut body = Vec::new();
        let mut read_error = None;
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => body.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    read_error = Some(error_chain(&e));
                    break;
                }
            }
        }

        Ok(WireResponse {
            status_line,
            status_code: status.as_u16(),
            headers,
            body,
            read_error,
        })
    }
}

/// `content-type` -> `Content-Type`.
pub fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

/// reqwest errors hide the useful part (e.g. "dns error") in their sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
