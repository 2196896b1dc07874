//! HTTP surface for the reservation endpoint.
//!
//! The reservation path is routed with `any()` so the orchestrator owns
//! method dispatch (preflight, POST, and the 405 contract) instead of the
//! framework. CORS headers are fixed and attached to every reply.

use axum::{
	body::{to_bytes, Body},
	extract::{Query, Request, State},
	http::{header, Response, StatusCode},
	routing::{any, get},
	Router,
};
use reserve_core::{HttpReply, Orchestrator};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

const MAX_BODY_BYTES: usize = 256 * 1024;

#[derive(Clone)]
pub struct AppState {
	pub orchestrator: Arc<Orchestrator>,
}

pub fn build_router(orchestrator: Orchestrator) -> Router {
	let state = AppState {
		orchestrator: Arc::new(orchestrator),
	};

	Router::new()
		.route("/reserve", any(handle_reserve))
		.route("/health", get(health))
		.with_state(state)
		.layer(TraceLayer::new_for_http())
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn handle_reserve(
	State(state): State<AppState>,
	Query(params): Query<HashMap<String, String>>,
	request: Request,
) -> Response<Body> {
	let method = request.method().as_str().to_string();

	let body = match to_bytes(request.into_body(), MAX_BODY_BYTES).await {
		Ok(bytes) if !bytes.is_empty() => serde_json::from_slice(&bytes).ok(),
		Ok(_) => None,
		Err(e) => {
			warn!("failed to read request body: {}", e);
			None
		}
	};

	let reply = state.orchestrator.handle(&method, &params, body).await;
	into_http(reply)
}

/// The three fixed CORS headers advertised on every reply.
fn into_http(reply: HttpReply) -> Response<Body> {
	let builder = Response::builder()
		.status(reply.status)
		.header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
		.header(header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS")
		.header(header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type");

	let result = match reply.body {
		Some(value) => builder
			.header(header::CONTENT_TYPE, "application/json")
			.body(Body::from(value.to_string())),
		None => builder.body(Body::empty()),
	};

	// Static status and headers; construction cannot fail.
	result.expect("response construction")
}
