//! Probe abstraction and the HTTP probe.
//!
//! # Responsibilities
//! - Define the `{check, describe}` capability shared by probes and decorators
//! - Issue exactly one `GET` per check against a downstream health endpoint
//! - Classify transport errors, timeouts, and non-200 statuses as failures
//!
//! # Design Decisions
//! - Success is `200 OK` only, not the whole 2xx range
//! - The body of a successful response is drained so the connection can be reused
//! - No retries here; a miss is one failure for the debounce counter

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode, Uri};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::time;
use url::Url;

/// Outbound client shared by all HTTP probes.
pub type HttpClient = Client<HttpConnector, Body>;

/// Build the pooled outbound client.
pub fn http_client() -> HttpClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Why a probe could not be built or why a check failed.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("can not create request for '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error("can not make request to '{endpoint}': {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("request to '{endpoint}' timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("received '{status}' from '{endpoint}'")]
    Status { endpoint: String, status: StatusCode },

    #[error("could not read response from '{endpoint}': {reason}")]
    Body { endpoint: String, reason: String },
}

/// One health check against one downstream target.
///
/// Decorators implement the same trait and wrap another `Probe`, so chains are
/// built by nesting: `HopefulProbe<LoggingProbe<HttpProbe>>`.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Perform a single check.
    async fn check(&self) -> Result<(), ProbeError>;

    /// Stable human-readable description, for logs only.
    fn describe(&self) -> String;
}

/// Probe that issues `GET <endpoint>` with `Accept: application/json`.
pub struct HttpProbe {
    endpoint: String,
    uri: Uri,
    client: HttpClient,
    timeout: Duration,
}

impl HttpProbe {
    /// Build a probe, failing if `endpoint` is not a well-formed `http://` URL.
    pub fn new(endpoint: &str, client: HttpClient, timeout: Duration) -> Result<Self, ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidTarget {
            target: endpoint.to_string(),
            reason,
        };

        let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
        if url.scheme() != "http" {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(invalid("missing host".to_string()));
        }
        let uri = url
            .as_str()
            .parse::<Uri>()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            uri,
            client,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self) -> Result<Request<Body>, ProbeError> {
        Request::builder()
            .method(Method::GET)
            .uri(self.uri.clone())
            .header(header::ACCEPT, "application/json")
            .header(header::USER_AGENT, "healthcheck-probe")
            .body(Body::empty())
            .map_err(|e| ProbeError::Transport {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })
    }

    async fn exchange(&self) -> Result<(), ProbeError> {
        let request = self.request()?;

        let response: Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| ProbeError::Transport {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ProbeError::Status {
                endpoint: self.endpoint.clone(),
                status,
            });
        }

        axum::body::to_bytes(Body::new(response.into_body()), usize::MAX)
            .await
            .map_err(|e| ProbeError::Body {
                endpoint: self.endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self) -> Result<(), ProbeError> {
        match time::timeout(self.timeout, self.exchange()).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                endpoint: self.endpoint.clone(),
                timeout: self.timeout,
            }),
        }
    }

    fn describe(&self) -> String {
        format!("service at '{}'", self.endpoint)
    }
}
