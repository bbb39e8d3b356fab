//! HTTP server adapter.
//!
//! The server is a thin shell around the admission queue: each handler
//! builds an [`InboundRequest`], submits it, suspends on the completion
//! signal, and translates the [`Outcome`] into an HTTP response. No handler
//! touches the store actor directly, so `/todo` traffic is processed
//! strictly one request at a time system-wide.
//!
//! `/ping` and `/shutdown` bypass the admission queue; they never touch the
//! store.
//!
//! # Routes
//!
//! - `GET /todo?uid=`: render the owner's list as JSON with display ids
//! - `POST /todo?uid=`: body `{"item": "..."}`, add
//! - `PUT /todo?uid=`: body `{"item": "...", "replacewith": "..."}`, update
//! - `DELETE /todo?uid=`: body `{"item": "..."}` (`"*"` clears), delete
//! - `GET /ping`: liveness probe
//! - `GET /shutdown`: trigger graceful shutdown

use std::collections::HashMap;

use axum::{
  Json, Router,
  body::Bytes,
  extract::{Query, State},
  http::{HeaderMap, Method, StatusCode},
  response::{IntoResponse, Response},
  routing::{any, get},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::actor::admission::{AdmissionHandle, InboundRequest, Outcome};

/// Owner identity used when the request carries no usable `uid`.
const ANONYMOUS_OWNER: &str = "Anonymous User";

// ============================================================================
// Server
// ============================================================================

/// Configuration for the HTTP server.
pub struct ServerConfig {
  /// Port to listen on (all interfaces).
  pub port: u16,
  /// Handle to the admission queue; the server state holds the only
  /// long-lived clone, so dropping the server closes the queue.
  pub admission: AdmissionHandle,
  /// Cancellation token: `/shutdown` fires it, and the listener stops
  /// accepting when it fires.
  pub cancel: CancellationToken,
}

/// The HTTP server. Accepts connections until the cancellation token
/// fires, then finishes in-flight requests and returns.
pub struct Server {
  config: ServerConfig,
}

impl Server {
  pub fn new(config: ServerConfig) -> Self {
    Self { config }
  }

  pub async fn run(self) -> Result<(), std::io::Error> {
    let ServerConfig { port, admission, cancel } = self.config;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "listening");

    let state = AppState {
      admission,
      cancel: cancel.clone(),
    };
    axum::serve(listener, router(state))
      .with_graceful_shutdown(cancel.cancelled_owned())
      .await
  }
}

// ============================================================================
// Routes and handlers
// ============================================================================

#[derive(Clone)]
struct AppState {
  admission: AdmissionHandle,
  cancel: CancellationToken,
}

fn router(state: AppState) -> Router {
  Router::new()
    .route("/todo", any(todo))
    .route("/ping", get(ping))
    .route("/shutdown", get(shutdown))
    .with_state(state)
}

/// All `/todo` methods funnel through here and into the admission queue.
async fn todo(
  State(state): State<AppState>,
  method: Method,
  Query(params): Query<HashMap<String, String>>,
  headers: HeaderMap,
  body: Bytes,
) -> Response {
  let request_id = request_id(&headers);
  let owner = params
    .get("uid")
    .filter(|uid| !uid.is_empty())
    .cloned()
    .unwrap_or_else(|| ANONYMOUS_OWNER.to_string());
  debug!(request_id = %request_id, owner = %owner, method = %method, "inbound request");

  let request = InboundRequest {
    request_id,
    owner,
    method,
    body,
  };
  match state.admission.admit(request).await {
    Ok(outcome) => outcome_response(outcome),
    Err(err) => {
      error!(error = %err, "admission queue unavailable");
      StatusCode::SERVICE_UNAVAILABLE.into_response()
    }
  }
}

async fn ping() -> &'static str {
  "pong"
}

async fn shutdown(State(state): State<AppState>) -> &'static str {
  info!("shutdown requested over http");
  state.cancel.cancel();
  "OK"
}

/// Honor a caller-supplied `X-Request-ID`, otherwise mint one.
fn request_id(headers: &HeaderMap) -> String {
  headers
    .get("X-Request-ID")
    .and_then(|value| value.to_str().ok())
    .filter(|value| !value.is_empty())
    .map(str::to_string)
    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

/// Translate an admission outcome into the HTTP contract.
fn outcome_response(outcome: Outcome) -> Response {
  match outcome {
    Outcome::List(items) => Json(items).into_response(),
    Outcome::Done => StatusCode::OK.into_response(),
    // The original protocol reports duplicates in the body, not the status.
    Outcome::AlreadyExists => (StatusCode::OK, "Already Exists").into_response(),
    Outcome::NotFound => StatusCode::NOT_FOUND.into_response(),
    Outcome::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
    Outcome::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    Outcome::Internal(message) => {
      error!(message, "request failed");
      StatusCode::INTERNAL_SERVER_ERROR.into_response()
    }
  }
}

// ============================================================================
// Tests
// ============================================================================
