//! HTTP transport shared by providers and the audio downloader
//!
//! Each provider owns a [`Transport`] and attaches its headers to the request
//! it builds, so no header state is shared between providers.

use std::time::Duration;

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use tracing::debug;

use crate::error::PronunciationError;

/// How a provider response status should be handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Parse the body
    Success,
    /// The provider has no audio for the term
    NoResults,
}

/// Map a response status to a classification or a transient failure
///
/// HTTP 404 is the providers' "no data" signal; every other non-success
/// status is a request failure.
///
/// # Errors
///
/// Returns `RequestFailed` for non-success statuses other than 404.
pub fn classify_status(status: StatusCode) -> Result<Classification, PronunciationError> {
    if status == StatusCode::NOT_FOUND {
        Ok(Classification::NoResults)
    } else if status.is_success() {
        Ok(Classification::Success)
    } else {
        Err(PronunciationError::RequestFailed(format!("HTTP {status}")))
    }
}

/// A fully received HTTP response
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: Bytes,
}

impl FetchedResponse {
    /// Create a response from its parts
    pub fn new(status: StatusCode, content_type: Option<&str>, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: content_type.map(ToString::to_string),
            body: body.into(),
        }
    }

    /// Create a `200 OK` response, mostly useful for parser tests
    pub fn ok(content_type: &str, body: impl Into<Bytes>) -> Self {
        Self::new(StatusCode::OK, Some(content_type), body)
    }

    /// Response status
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Raw body bytes
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Charset declared in the `Content-Type` header
    pub fn declared_charset(&self) -> Option<&str> {
        self.content_type.as_deref().and_then(|content_type| {
            content_type.split(';').skip(1).find_map(|param| {
                let (name, value) = param.split_once('=')?;
                name.trim()
                    .eq_ignore_ascii_case("charset")
                    .then(|| value.trim().trim_matches('"'))
            })
        })
    }

    /// Decode the body using the declared charset
    ///
    /// Unknown or missing charsets fall back to UTF-8; a byte order mark
    /// overrides the declaration. Malformed sequences are replaced.
    pub fn text(&self) -> String {
        let encoding = self
            .declared_charset()
            .and_then(|label| Encoding::for_label(label.as_bytes()))
            .unwrap_or(UTF_8);
        let (text, used, had_errors) = encoding.decode(&self.body);
        if had_errors {
            debug!(encoding = used.name(), "Response body contained malformed sequences");
        }
        text.into_owned()
    }
}

/// HTTP client wrapper with error mapping
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    timeout_secs: u64,
}

impl Transport {
    /// Create a transport, with no timeout when `timeout` is `None`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(timeout: Option<Duration>) -> Result<Self, PronunciationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PronunciationError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: timeout.map_or(0, |timeout| timeout.as_secs()),
        })
    }

    /// Underlying client, used to start request builders
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Send a request and read the whole body
    ///
    /// # Errors
    ///
    /// Returns a transient error if the request or body transfer fails.
    pub async fn fetch(&self, request: RequestBuilder) -> Result<FetchedResponse, PronunciationError> {
        let response = request.send().await.map_err(|e| self.map_error(&e))?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(ToString::to_string);
        let body = response.bytes().await.map_err(|e| self.map_error(&e))?;

        debug!(status = %status, bytes = body.len(), "Received response");

        Ok(FetchedResponse {
            status,
            content_type,
            body,
        })
    }

    fn map_error(&self, e: &reqwest::Error) -> PronunciationError {
        if e.is_timeout() {
            PronunciationError::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else if e.is_connect() {
            PronunciationError::ConnectionFailed(e.to_string())
        } else {
            PronunciationError::RequestFailed(e.to_string())
        }
    }
}
