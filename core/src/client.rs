//! The blocking request/response adapter.
//!
//! # Design
//! `StoreClient` holds a base URL and a `Transport` and carries no other
//! state between calls. Every call goes through the same three steps:
//! `build_request` produces an `HttpRequest` (pure), the transport executes
//! it (blocking), and `classify` turns the `HttpResponse` into a `Reply` or
//! an `ApiError` (pure). Resource-specific operations live in `resources`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};

/// A successful call: status below 400 and a body that was either empty or
/// a JSON object/array.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub payload: Option<Value>,
}

impl Reply {
    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    pub fn into_payload(self) -> Option<Value> {
        self.payload
    }

    /// Decode the payload into `T`. An absent payload or one of the wrong
    /// shape is an `UnexpectedShape` error.
    pub fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let payload = self
            .payload
            .ok_or_else(|| ApiError::UnexpectedShape("empty body".to_string()))?;
        serde_json::from_value(payload).map_err(|e| ApiError::UnexpectedShape(e.to_string()))
    }
}

/// Synchronous client for the storefront API.
#[derive(Debug, Clone)]
pub struct StoreClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl StoreClient<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.api_url)
    }
}

impl<T: Transport> StoreClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Join `path` onto the base URL, append `params` in order and attach
    /// the JSON content type.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let raw = format!("{}{}", self.base_url, path);
        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }

        Ok(HttpRequest {
            method,
            url: url.into(),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body,
        })
    }

    pub fn send(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Reply, ApiError> {
        let request = self.build_request(method, path, params, body)?;
        self.execute(&request)
    }

    /// Like `send`, with the verb given as text. Unsupported verbs fail
    /// before a request is built.
    pub fn send_raw(
        &self,
        verb: &str,
        path: &str,
        params: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<Reply, ApiError> {
        let method = verb.parse::<HttpMethod>().inspect_err(|_| {
            tracing::warn!(verb, "unsupported HTTP verb");
        })?;
        self.send(method, path, params, body)
    }

    /// Run an already built request through the transport and classify it.
    pub fn execute(&self, request: &HttpRequest) -> Result<Reply, ApiError> {
        classify(self.dispatch(request)?).inspect_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "request failed");
        })
    }

    /// Blocking round-trip through the transport, without classification.
    pub(crate) fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, url = %request.url, "sending request");

        self.transport.execute(request).inspect_err(|e| {
            tracing::warn!(method = %request.method, url = %request.url, error = %e, "HTTP transport error");
        })
    }
}

/// Serialize a request payload.
pub(crate) fn to_body<B: Serialize>(value: &B) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Map an `HttpResponse` to the adapter's outcome.
///
/// Status >= 400 is a failure whatever the body says. Below that, a
/// zero-length body is success without payload and anything else, whitespace
/// included, must be a JSON object or array.
pub fn classify(response: HttpResponse) -> Result<Reply, ApiError> {
    let status = response.status;
    if status >= 400 {
        return Err(ApiError::HttpError {
            status,
            detail: error_detail(&response.body),
        });
    }

    if response.body.is_empty() {
        return Ok(Reply {
            status,
            payload: None,
        });
    }

    let payload: Value = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    if !(payload.is_object() || payload.is_array()) {
        return Err(ApiError::UnexpectedShape(
            "top-level JSON value is neither an object nor an array".to_string(),
        ));
    }

    Ok(Reply {
        status,
        payload: Some(payload),
    })
}

/// The server's explanation in an error body: `{"detail": "..."}`,
/// `{"error": "..."}`, or the first message of a validation error list.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let text = match value.get("detail").or_else(|| value.get("error"))? {
        Value::String(text) => text.clone(),
        Value::Array(entries) => entries.first()?.get("msg")?.as_str()?.to_string(),
        _ => return None,
    };
    Some(text)
}
