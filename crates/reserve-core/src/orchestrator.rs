//! Request orchestrator.
//!
//! Sequences the gates and backend calls for one reservation request and owns
//! the response contract. Each request runs in its own handler invocation
//! with no shared in-process state; every external call is a sequential
//! awaited round-trip.
//!
//! The reservation check is read-then-write and not transactional: two
//! concurrent requests for the same product can both observe "available"
//! before either write lands, and both will succeed. That race is a known
//! property of the metadata store's last-write-wins semantics and is kept
//! here deliberately rather than hidden behind a lock.

use crate::{
	reader::read_reservation_state,
	signature::verify_proxy_signature,
	spam::SpamGate,
	writer::{write_order_metafields, write_product_state},
};
use chrono::Utc;
use reserve_commerce::{metafields, CommerceClient, DraftOrderPayload};
use reserve_config::ReserveConfig;
use reserve_types::{
	DraftOrderInput, DraftOrderSummary, ErrorBody, MetafieldWriteReport, ReservationNumber,
	ReservationRequest, ReservationResponse, ReserveError,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// How long a reservation holds the product, as shown to downstream
/// notification templates.
const HOLD_DURATION_LABEL: &str = "14 days";

/// A finished response, framework-neutral: the HTTP layer adds transport
/// concerns (CORS headers) and nothing else.
#[derive(Debug)]
pub struct HttpReply {
	pub status: u16,
	pub body: Option<serde_json::Value>,
}

impl HttpReply {
	fn json(status: u16, body: impl serde::Serialize) -> Self {
		Self {
			status,
			body: serde_json::to_value(body).ok(),
		}
	}
}

/// Sequences one reservation request end to end.
#[derive(Clone)]
pub struct Orchestrator {
	config: ReserveConfig,
	commerce: CommerceClient,
	spam: SpamGate,
}

impl Orchestrator {
	pub fn new(config: ReserveConfig, commerce: CommerceClient, spam: SpamGate) -> Self {
		Self {
			config,
			commerce,
			spam,
		}
	}

	/// Entry point for the reservation endpoint. Preflight short-circuits
	/// before any other check; non-POST is refused outright.
	pub async fn handle(
		&self,
		method: &str,
		query: &HashMap<String, String>,
		body: Option<serde_json::Value>,
	) -> HttpReply {
		if method == "OPTIONS" {
			return HttpReply {
				status: 204,
				body: None,
			};
		}

		if method != "POST" {
			return Self::error_reply(ReserveError::MethodNotAllowed);
		}

		match self.run(query, body).await {
			Ok(response) => HttpReply::json(200, response),
			Err(err) => Self::error_reply(err),
		}
	}

	/// The gate sequence and the conditional order creation. Gate failures
	/// abort with no side effects; once the order exists, later failures are
	/// reported but never fail the request.
	async fn run(
		&self,
		query: &HashMap<String, String>,
		body: Option<serde_json::Value>,
	) -> Result<ReservationResponse, ReserveError> {
		// BodyParsed. An absent body and an absent draft_order read the same
		// to the caller; a body that fails to deserialize keeps its detail.
		let request: ReservationRequest = match body {
			Some(value) => serde_json::from_value(value)
				.map_err(|e| ReserveError::InvalidBody(e.to_string()))?,
			None => return Err(ReserveError::MissingDraftOrder),
		};
		let order = request
			.draft_order
			.as_ref()
			.filter(|o| !o.line_items.is_empty())
			.ok_or(ReserveError::MissingDraftOrder)?;

		// SpamChecked
		self.spam
			.check(
				request.recaptcha_token.as_deref(),
				request.recaptcha_action.as_deref(),
			)
			.await?;

		// SignatureChecked
		if !query.contains_key("signature") || !query.contains_key("timestamp") {
			return Err(ReserveError::MissingQueryParams);
		}
		let secret = self
			.config
			.proxy
			.signing_secret
			.as_deref()
			.filter(|s| !s.is_empty())
			.ok_or_else(|| ReserveError::ConfigMissing("proxy signing secret".to_string()))?;
		if !verify_proxy_signature(query, secret) {
			return Err(ReserveError::InvalidSignature);
		}

		// ReservationChecked: first reserved product wins the conflict. A
		// failed lookup is "state unknown" and processing continues.
		let mut resolved_product: Option<i64> = None;
		for item in &order.line_items {
			let Some(variant_id) = item.variant_id.as_ref().and_then(|id| id.as_i64()) else {
				continue;
			};

			let state = read_reservation_state(&self.commerce, variant_id).await;
			if state.is_reserved {
				let product_id = state.product_id.unwrap_or_default();
				info!(product_id, "reservation refused, product already reserved");
				return Err(ReserveError::AlreadyReserved { product_id });
			}
			if resolved_product.is_none() {
				resolved_product = state.product_id;
			}
		}

		// OrderSubmitted
		let number =
			ReservationNumber::generate(Utc::now().date_naive(), &mut rand::thread_rng());
		let note = Self::prefixed_note(&number, order.note.as_deref());
		let mut tags = vec![number.to_string()];
		tags.extend(order.tags.iter().cloned());

		let payload = DraftOrderPayload::from_input(order, Some(note), &tags);
		let record = self.commerce.create_draft_order(&payload).await?;
		info!(draft_order_id = record.id, %number, "draft order created");

		// StateWritten
		let (product_report, product_status_updated) = match resolved_product {
			Some(product_id) => {
				let outcome = write_product_state(&self.commerce, product_id, &number).await;
				(outcome.report, outcome.verified)
			}
			None => {
				debug!("no resolved product, skipping product state write");
				(MetafieldWriteReport::default(), false)
			}
		};

		let entries = self
			.descriptive_entries(order, resolved_product, &number)
			.await;
		let order_report = write_order_metafields(&self.commerce, record.id, &entries).await;

		// Responded
		Ok(ReservationResponse {
			success: true,
			reservation_number: number,
			draft_order: DraftOrderSummary {
				id: record.id,
				name: record.name,
				admin_url: record.admin_url,
			},
			product_status_updated,
			product_id: resolved_product,
			metafield_result: product_report,
			draft_order_metafields: Some(order_report),
			debug_info: None,
		})
	}

	/// The reservation number leads the order note.
	fn prefixed_note(number: &ReservationNumber, note: Option<&str>) -> String {
		match note.filter(|n| !n.is_empty()) {
			Some(n) => format!("{} | {}", number, n),
			None => number.to_string(),
		}
	}

	/// Build the fixed descriptive set written onto the order. Values come
	/// from the submission (customer, line-item properties) and a product
	/// lookup when one resolved; absent values are simply not written.
	async fn descriptive_entries(
		&self,
		order: &DraftOrderInput,
		product_id: Option<i64>,
		number: &ReservationNumber,
	) -> Vec<(&'static str, String)> {
		let mut entries: Vec<(&'static str, String)> = vec![
			(metafields::K_RESERVATION_NUMBER, number.to_string()),
			(metafields::K_CUSTOMER_EMAIL, order.customer.email.clone()),
			(
				metafields::K_RESERVED_AT,
				Utc::now().date_naive().format("%Y-%m-%d").to_string(),
			),
			(metafields::K_HOLD_DURATION, HOLD_DURATION_LABEL.to_string()),
		];

		let mut title = order
			.line_items
			.first()
			.map(|item| item.title.clone())
			.unwrap_or_default();

		if let Some(product_id) = product_id {
			match self.commerce.get_product(product_id).await {
				Ok(product) => {
					title = product.title;
					if let Some(handle) = product.handle {
						entries.push((metafields::K_PRODUCT_HANDLE, handle));
					}
				}
				Err(e) => {
					warn!(product_id, "product lookup for order metadata failed: {}", e);
				}
			}
		}
		entries.push((metafields::K_PRODUCT_TITLE, title));

		for (key, property) in [
			(metafields::K_PRACTICE_NAME, "practice_name"),
			(metafields::K_POSTAL_CODE, "postal_code"),
			(metafields::K_ROLE, "role"),
		] {
			if let Some(value) = Self::find_property(order, property) {
				entries.push((key, value));
			}
		}

		entries
	}

	fn find_property(order: &DraftOrderInput, name: &str) -> Option<String> {
		order
			.line_items
			.iter()
			.flat_map(|item| item.properties.iter())
			.find(|p| p.name == name)
			.map(|p| p.value.clone())
			.filter(|v| !v.is_empty())
	}

	/// Map the failure taxonomy onto the wire contract.
	fn error_reply(err: ReserveError) -> HttpReply {
		let status = err.status_code();
		let body = match &err {
			ReserveError::AlreadyReserved { product_id } => ErrorBody {
				success: Some(false),
				error: err.to_string(),
				error_type: err.error_type().map(String::from),
				product_id: Some(*product_id),
			},
			ReserveError::MethodNotAllowed
			| ReserveError::MissingQueryParams
			| ReserveError::MissingDraftOrder
			| ReserveError::InvalidBody(_)
			| ReserveError::SpamRejected(_)
			| ReserveError::InvalidSignature => ErrorBody::new(err.to_string()),
			_ => ErrorBody::failed(err.to_string()),
		};

		HttpReply::json(status, body)
	}
}
