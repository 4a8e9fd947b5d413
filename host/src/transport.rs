//! Executing core requests over the network.

use std::future::Future;
use std::time::Duration;

use todo_sync::{HttpMethod, HttpRequest, HttpResponse, NetworkError};
use tracing::trace;

/// Runs one `HttpRequest` to completion.
///
/// Implementations return non-2xx responses as `Ok`; interpreting the
/// status is the core's job. `Err` is reserved for round-trips that never
/// produced a response. No retries.
pub trait Transport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, NetworkError>>;
}

/// Blocking ureq agent moved onto tokio's blocking pool per request.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, NetworkError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || send(&agent, &request))
            .await
            .map_err(|e| NetworkError::Transport(e.to_string()))?
    }
}

fn send(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
    trace!(method = %request.method, url = %request.url, "sending request");
    let result = match request.method {
        HttpMethod::Get => with_headers(agent.get(&request.url), request).call(),
        HttpMethod::Delete => with_headers(agent.delete(&request.url), request).call(),
        HttpMethod::Put => {
            let builder = with_headers(agent.put(&request.url), request);
            match request.body.as_deref() {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };
    let mut response = result.map_err(|e| NetworkError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| NetworkError::Transport(e.to_string()))?;

    trace!(status, "received response");
    Ok(HttpResponse { status, headers, body })
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
