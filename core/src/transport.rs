//! Blocking execution of `HttpRequest` values.
//!
//! # Design
//! `Transport` is the only seam that touches the network. The default
//! implementation wraps a single `ureq::Agent`, which owns the connection
//! pool and may be cloned and shared across threads; each call is an
//! independent request/response pair. Status codes are never turned into
//! errors here so the adapter sees every response the server produced.

use std::fmt;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one request and blocks until the response arrives.
///
/// Implementations return `Err` only when no response was obtained.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by `ureq`. Follows redirects, no timeout configured.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };

        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Recording transport with canned responses, for unit tests.
#[cfg(test)]
pub(crate) mod stub {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpRequest, HttpResponse};

    #[derive(Debug, Default)]
    pub(crate) struct StubTransport {
        responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    impl StubTransport {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn respond(self, status: u16, body: &str) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Ok(HttpResponse::new(status, body)));
            self
        }

        pub(crate) fn unreachable(self) -> Self {
            self.responses
                .borrow_mut()
                .push_back(Err(ApiError::Transport("connection refused".to_string())));
            self
        }

        pub(crate) fn requests(&self) -> Vec<HttpRequest> {
            self.requests.borrow().clone()
        }

        pub(crate) fn last_request(&self) -> HttpRequest {
            self.requests
                .borrow()
                .last()
                .cloned()
                .expect("no request was executed")
        }
    }

    impl Transport for StubTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.requests.borrow_mut().push(request.clone());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Transport("no canned response".to_string())))
        }
    }
}
