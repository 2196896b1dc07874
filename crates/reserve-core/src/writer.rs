//! Reservation state writer.
//!
//! Persists the reservation outcome: two product metafields (availability
//! status and reservation number, verified by re-read) and a fixed set of
//! descriptive metafields on the created draft order. Every order-metafield
//! write is independent; failures are tallied, never fatal — the order is
//! never rolled back once created.

use reserve_commerce::{metafields, CommerceClient};
use reserve_types::{AvailabilityStatus, MetafieldWriteReport, ReservationNumber};
use tracing::{debug, warn};

/// Result of the product-side write, including whether the re-read confirmed
/// both entries in their expected state.
#[derive(Debug)]
pub struct ProductWriteOutcome {
	pub report: MetafieldWriteReport,
	pub verified: bool,
}

/// Flip the product into its reserved state: availability status and
/// reservation number, created or updated in place, then re-read to confirm.
pub async fn write_product_state(
	client: &CommerceClient,
	product_id: i64,
	number: &ReservationNumber,
) -> ProductWriteOutcome {
	let mut report = MetafieldWriteReport::default();

	// Existing entries decide create vs update. A failed listing is treated
	// as "nothing exists yet" and we fall through to creates.
	let existing = match client.list_product_metafields(product_id).await {
		Ok(entries) => entries,
		Err(e) => {
			warn!(product_id, "could not list product metafields before write: {}", e);
			Vec::new()
		}
	};

	let writes = [
		(metafields::K_AVAILABILITY_STATUS, AvailabilityStatus::RESERVED.to_string()),
		(metafields::K_RESERVATION_NUMBER, number.to_string()),
	];

	for (key, value) in &writes {
		let existing_id = existing
			.iter()
			.find(|m| m.namespace == metafields::NAMESPACE && m.key == *key)
			.map(|m| m.id);

		let result = match existing_id {
			Some(id) => client.update_metafield(id, value).await,
			None => client.create_product_metafield(product_id, key, value).await,
		};

		match result {
			Ok(_) => report.record_ok(*key),
			Err(e) => {
				warn!(product_id, key, "product metafield write failed: {}", e);
				report.record_err(*key, e.to_string());
			}
		}
	}

	// Confirm the store now reflects what we wrote.
	let verified = match client.list_product_metafields(product_id).await {
		Ok(entries) => writes.iter().all(|(key, value)| {
			entries
				.iter()
				.any(|m| m.namespace == metafields::NAMESPACE && m.key == *key && m.value == *value)
		}),
		Err(e) => {
			warn!(product_id, "post-write verification read failed: {}", e);
			report.record_err("verification", e.to_string());
			false
		}
	};

	if !verified {
		warn!(product_id, "product metafields did not verify after write");
	} else {
		debug!(product_id, %number, "product reservation state written and verified");
	}

	ProductWriteOutcome { report, verified }
}

/// Write the descriptive entries onto the created draft order. Each entry is
/// attempted regardless of earlier failures.
pub async fn write_order_metafields(
	client: &CommerceClient,
	draft_order_id: i64,
	entries: &[(&str, String)],
) -> MetafieldWriteReport {
	let mut report = MetafieldWriteReport::default();

	for (key, value) in entries {
		match client
			.create_draft_order_metafield(draft_order_id, key, value)
			.await
		{
			Ok(_) => report.record_ok(*key),
			Err(e) => {
				warn!(draft_order_id, key, "order metafield write failed: {}", e);
				report.record_err(*key, e.to_string());
			}
		}
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use reserve_config::ShopConfig;
	use wiremock::matchers::{body_partial_json, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client(server: &MockServer) -> CommerceClient {
		CommerceClient::new(&ShopConfig {
			domain: "example.myshopify.com".to_string(),
			access_token: "shpat_test".to_string(),
			api_version: "2024-10".to_string(),
			api_base: Some(server.uri()),
		})
		.unwrap()
	}

	fn number() -> ReservationNumber {
		ReservationNumber::generate(
			NaiveDate::from_ymd_opt(2025, 3, 7).unwrap(),
			&mut rand::thread_rng(),
		)
	}

	#[tokio::test]
	async fn creates_both_entries_when_absent_and_verifies() {
		let server = MockServer::start().await;
		let n = number();

		// First list: empty. Post-write list: both entries present.
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": []
			})))
			.up_to_n_times(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [
					{"id": 1, "namespace": "reservation", "key": "availability_status", "value": "Reserved"},
					{"id": 2, "namespace": "reservation", "key": "reservation_number", "value": n.as_str()}
				]
			})))
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
				"metafield": {"id": 1, "namespace": "reservation", "key": "availability_status", "value": "Reserved"}
			})))
			.expect(2)
			.mount(&server)
			.await;

		let outcome = write_product_state(&client(&server), 222, &n).await;
		assert!(outcome.verified);
		assert!(outcome.report.all_ok());
		assert_eq!(outcome.report.succeeded.len(), 2);
	}

	#[tokio::test]
	async fn updates_in_place_when_entry_exists() {
		let server = MockServer::start().await;
		let n = number();

		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [
					{"id": 10, "namespace": "reservation", "key": "availability_status", "value": "In stock"},
					{"id": 11, "namespace": "reservation", "key": "reservation_number", "value": "Reserved"}
				]
			})))
			.up_to_n_times(1)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/admin/api/2024-10/metafields/10.json"))
			.and(body_partial_json(serde_json::json!({
				"metafield": {"value": "Reserved"}
			})))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafield": {"id": 10, "namespace": "reservation", "key": "availability_status", "value": "Reserved"}
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("PUT"))
			.and(path("/admin/api/2024-10/metafields/11.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafield": {"id": 11, "namespace": "reservation", "key": "reservation_number", "value": n.as_str()}
			})))
			.expect(1)
			.mount(&server)
			.await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [
					{"id": 10, "namespace": "reservation", "key": "availability_status", "value": "Reserved"},
					{"id": 11, "namespace": "reservation", "key": "reservation_number", "value": n.as_str()}
				]
			})))
			.mount(&server)
			.await;

		let outcome = write_product_state(&client(&server), 222, &n).await;
		assert!(outcome.verified);
		assert!(outcome.report.all_ok());
	}

	#[tokio::test]
	async fn order_metafield_failures_are_tallied_not_fatal() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/draft_orders/9001/metafields.json"))
			.and(body_partial_json(serde_json::json!({
				"metafield": {"key": "customer_email"}
			})))
			.respond_with(ResponseTemplate::new(422).set_body_string("bad value"))
			.mount(&server)
			.await;
		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/draft_orders/9001/metafields.json"))
			.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
				"metafield": {"id": 5, "namespace": "reservation", "key": "x", "value": "y"}
			})))
			.mount(&server)
			.await;

		let entries = vec![
			("reservation_number", "RES-250307-1234".to_string()),
			("customer_email", "visitor@example.com".to_string()),
			("product_title", "Dental Chair".to_string()),
		];
		let report = write_order_metafields(&client(&server), 9001, &entries).await;

		assert_eq!(report.succeeded.len(), 2);
		assert_eq!(report.failed.len(), 1);
		assert_eq!(report.failed[0].key, "customer_email");
	}
}
