//! The `/health` route.
//!
//! # Responsibilities
//! - Reject non-GET methods (405) and any Accept other than `application/json` (406)
//! - Answer with the aggregate verdict as 200 or 500
//!
//! # Design Decisions
//! - Both response bodies are serialized once, at construction
//! - Keys are emitted in lexical order: `code`, `namespace`, `status`

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::health::{Fragile, HealthAggregate};

pub const HEALTH_PATH: &str = "/health";

const APPLICATION_JSON: &str = "application/json";

#[derive(Serialize)]
struct HealthBody<'a> {
    code: &'a str,
    namespace: &'a str,
    status: &'a str,
}

/// State shared by every request: the aggregate and the two canned bodies.
#[derive(Clone)]
pub struct HealthHandler {
    aggregate: Arc<HealthAggregate>,
    success: Bytes,
    error: Bytes,
}

impl HealthHandler {
    pub fn new(namespace: &str, aggregate: HealthAggregate) -> Result<Self, serde_json::Error> {
        let success = serde_json::to_vec(&HealthBody {
            code: "200",
            namespace,
            status: "success",
        })?;
        let error = serde_json::to_vec(&HealthBody {
            code: "500",
            namespace,
            status: "error",
        })?;

        Ok(Self {
            aggregate: Arc::new(aggregate),
            success: Bytes::from(success),
            error: Bytes::from(error),
        })
    }

    fn current_response(&self) -> (StatusCode, Bytes) {
        if self.aggregate.is_healthy() {
            (StatusCode::OK, self.success.clone())
        } else {
            (StatusCode::INTERNAL_SERVER_ERROR, self.error.clone())
        }
    }

    /// Router exposing only the health route.
    pub fn into_router(self) -> Router {
        Router::new()
            .route(HEALTH_PATH, any(health))
            .with_state(self)
            .layer(TraceLayer::new_for_http())
    }
}

async fn health(State(handler): State<HealthHandler>, method: Method, headers: HeaderMap) -> Response {
    if method != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let accepts_json = headers
        .get(header::ACCEPT)
        .is_some_and(|accept| accept.as_bytes() == APPLICATION_JSON.as_bytes());
    if !accepts_json {
        return StatusCode::NOT_ACCEPTABLE.into_response();
    }

    let (status, body) = handler.current_response();
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON))],
        body,
    )
        .into_response()
}
