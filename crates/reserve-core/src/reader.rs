//! Reservation state reader.
//!
//! Resolves a variant to its owning product and reads the availability
//! metafield. Lookup failures never raise: the check degrades to
//! "unknown/not reserved" so a backend hiccup cannot block a sale. The
//! trade-off is availability over strict correctness.

use reserve_commerce::{metafields, CommerceClient};
use reserve_types::{AvailabilityStatus, ProductReservationState};
use tracing::{debug, warn};

/// Determine whether the product owning `variant_id` is already reserved.
pub async fn read_reservation_state(
	client: &CommerceClient,
	variant_id: i64,
) -> ProductReservationState {
	let variant = match client.get_variant(variant_id).await {
		Ok(variant) => variant,
		Err(e) => {
			warn!(variant_id, "variant lookup failed, treating as not reserved: {}", e);
			return ProductReservationState::unknown();
		}
	};

	let entries = match client.list_product_metafields(variant.product_id).await {
		Ok(entries) => entries,
		Err(e) => {
			warn!(
				product_id = variant.product_id,
				"metafield lookup failed, treating as not reserved: {}", e
			);
			return ProductReservationState {
				product_id: Some(variant.product_id),
				is_reserved: false,
			};
		}
	};

	// No availability entry at all means the product is available.
	let is_reserved = entries
		.iter()
		.find(|m| {
			m.namespace == metafields::NAMESPACE && m.key == metafields::K_AVAILABILITY_STATUS
		})
		.map(|m| AvailabilityStatus::parse(&m.value).is_reserved())
		.unwrap_or(false);

	debug!(
		variant_id,
		product_id = variant.product_id,
		is_reserved,
		"reservation state resolved"
	);

	ProductReservationState {
		product_id: Some(variant.product_id),
		is_reserved,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reserve_config::ShopConfig;
	use wiremock::matchers::{method, path};
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

	async fn mount_variant(server: &MockServer, variant_id: i64, product_id: i64) {
		Mock::given(method("GET"))
			.and(path(format!("/admin/api/2024-10/variants/{}.json", variant_id)))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"variant": { "id": variant_id, "product_id": product_id }
			})))
			.mount(server)
			.await;
	}

	#[tokio::test]
	async fn reserved_metafield_marks_product_reserved() {
		let server = MockServer::start().await;
		mount_variant(&server, 111, 222).await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [{
					"id": 1, "namespace": "reservation",
					"key": "availability_status", "value": "Reserved"
				}]
			})))
			.mount(&server)
			.await;

		let state = read_reservation_state(&client(&server), 111).await;
		assert_eq!(state.product_id, Some(222));
		assert!(state.is_reserved);
	}

	#[tokio::test]
	async fn missing_availability_entry_means_available() {
		let server = MockServer::start().await;
		mount_variant(&server, 111, 222).await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [{
					"id": 2, "namespace": "seo", "key": "description", "value": "x"
				}]
			})))
			.mount(&server)
			.await;

		let state = read_reservation_state(&client(&server), 111).await;
		assert_eq!(state.product_id, Some(222));
		assert!(!state.is_reserved);
	}

	#[tokio::test]
	async fn variant_lookup_failure_degrades_to_unknown() {
		let server = MockServer::start().await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/variants/111.json"))
			.respond_with(ResponseTemplate::new(500))
			.mount(&server)
			.await;

		let state = read_reservation_state(&client(&server), 111).await;
		assert_eq!(state.product_id, None);
		assert!(!state.is_reserved);
	}

	#[tokio::test]
	async fn in_stock_value_is_not_reserved() {
		let server = MockServer::start().await;
		mount_variant(&server, 111, 222).await;
		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/products/222/metafields.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"metafields": [{
					"id": 1, "namespace": "reservation",
					"key": "availability_status", "value": "In stock"
				}]
			})))
			.mount(&server)
			.await;

		let state = read_reservation_state(&client(&server), 111).await;
		assert!(!state.is_reserved);
	}
}
