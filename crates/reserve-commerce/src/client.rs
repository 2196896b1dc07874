//! Admin REST API client.

use crate::{metafields, CommerceError};
use reserve_config::ShopConfig;
use reserve_types::{CustomerInput, DraftOrderInput, DraftOrderRecord, LineItemProperty, Metafield};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const HTTP_TIMEOUT: Duration = Duration::from_secs(20);
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// A purchasable configuration of a product.
#[derive(Debug, Clone, Deserialize)]
pub struct Variant {
	pub id: i64,
	pub product_id: i64,
	#[serde(default)]
	pub title: Option<String>,
	#[serde(default)]
	pub price: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Product {
	pub id: i64,
	pub title: String,
	#[serde(default)]
	pub handle: Option<String>,
}

/// Line item after boundary normalization: fixed-point price, numeric
/// identifiers.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedLineItem {
	pub title: String,
	pub price: String,
	pub quantity: u32,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub variant_id: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub product_id: Option<i64>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub properties: Vec<LineItemProperty>,
}

/// Fully-assembled order-creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct DraftOrderPayload {
	pub line_items: Vec<NormalizedLineItem>,
	pub customer: CustomerInput,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tags: Option<String>,
}

impl DraftOrderPayload {
	/// Normalize the inbound order: prices become 2-decimal fixed-point
	/// strings, GID and string identifiers their trailing numeric component,
	/// tags a comma-joined list.
	pub fn from_input(input: &DraftOrderInput, note: Option<String>, tags: &[String]) -> Self {
		let line_items = input
			.line_items
			.iter()
			.map(|item| NormalizedLineItem {
				title: item.title.clone(),
				price: format!("{:.2}", item.price),
				quantity: item.quantity,
				variant_id: item.variant_id.as_ref().and_then(|id| id.as_i64()),
				product_id: item.product_id.as_ref().and_then(|id| id.as_i64()),
				properties: item.properties.clone(),
			})
			.collect();

		Self {
			line_items,
			customer: input.customer.clone(),
			note,
			tags: if tags.is_empty() {
				None
			} else {
				Some(tags.join(", "))
			},
		}
	}
}

/// Thin client over the commerce backend's Admin REST API. All calls are
/// sequential round-trips; the caller owns ordering and retries.
#[derive(Clone)]
pub struct CommerceClient {
	http: reqwest::Client,
	base_url: String,
	domain: String,
	api_version: String,
	access_token: String,
}

impl CommerceClient {
	pub fn new(config: &ShopConfig) -> Result<Self, CommerceError> {
		let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

		Ok(Self {
			http,
			base_url: config.api_base_url(),
			domain: config.domain.clone(),
			api_version: config.api_version.clone(),
			access_token: config.access_token.clone(),
		})
	}

	fn url(&self, path: &str) -> String {
		format!("{}/admin/api/{}/{}", self.base_url, self.api_version, path)
	}

	/// Look up a variant to resolve its owning product.
	pub async fn get_variant(&self, variant_id: i64) -> Result<Variant, CommerceError> {
		#[derive(Deserialize)]
		struct Envelope {
			variant: Variant,
		}

		let response = self
			.http
			.get(self.url(&format!("variants/{}.json", variant_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.send()
			.await?;

		let envelope: Envelope = Self::check(response).await?.json().await?;
		Ok(envelope.variant)
	}

	pub async fn get_product(&self, product_id: i64) -> Result<Product, CommerceError> {
		#[derive(Deserialize)]
		struct Envelope {
			product: Product,
		}

		let response = self
			.http
			.get(self.url(&format!("products/{}.json", product_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.send()
			.await?;

		let envelope: Envelope = Self::check(response).await?.json().await?;
		Ok(envelope.product)
	}

	pub async fn list_product_metafields(
		&self,
		product_id: i64,
	) -> Result<Vec<Metafield>, CommerceError> {
		#[derive(Deserialize)]
		struct Envelope {
			metafields: Vec<Metafield>,
		}

		let response = self
			.http
			.get(self.url(&format!("products/{}/metafields.json", product_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.send()
			.await?;

		let envelope: Envelope = Self::check(response).await?.json().await?;
		Ok(envelope.metafields)
	}

	/// Create a metafield on a product in the reservation namespace.
	pub async fn create_product_metafield(
		&self,
		product_id: i64,
		key: &str,
		value: &str,
	) -> Result<Metafield, CommerceError> {
		let body = serde_json::json!({
			"metafield": {
				"namespace": metafields::NAMESPACE,
				"key": key,
				"value": value,
				"type": metafields::SINGLE_LINE_TEXT,
			}
		});

		let response = self
			.http
			.post(self.url(&format!("products/{}/metafields.json", product_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.json(&body)
			.send()
			.await?;

		Self::parse_metafield(Self::check(response).await?).await
	}

	/// Update an existing metafield in place.
	pub async fn update_metafield(
		&self,
		metafield_id: i64,
		value: &str,
	) -> Result<Metafield, CommerceError> {
		let body = serde_json::json!({
			"metafield": {
				"id": metafield_id,
				"value": value,
				"type": metafields::SINGLE_LINE_TEXT,
			}
		});

		let response = self
			.http
			.put(self.url(&format!("metafields/{}.json", metafield_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.json(&body)
			.send()
			.await?;

		Self::parse_metafield(Self::check(response).await?).await
	}

	/// Submit the order-creation payload and derive the admin URL.
	pub async fn create_draft_order(
		&self,
		payload: &DraftOrderPayload,
	) -> Result<DraftOrderRecord, CommerceError> {
		let body = serde_json::json!({ "draft_order": payload });

		debug!(line_items = payload.line_items.len(), "Creating draft order");

		let response = self
			.http
			.post(self.url("draft_orders.json"))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.json(&body)
			.send()
			.await?;

		let raw: serde_json::Value = Self::check(response).await?.json().await?;
		let order = &raw["draft_order"];
		let id = order["id"].as_i64().ok_or_else(|| CommerceError::Upstream {
			status: 200,
			detail: "Draft order response missing id".to_string(),
		})?;
		let name = order["name"].as_str().unwrap_or_default().to_string();

		Ok(DraftOrderRecord {
			id,
			name,
			admin_url: format!("https://{}/admin/draft_orders/{}", self.domain, id),
			raw,
		})
	}

	/// Attach a descriptive metafield to a created draft order.
	pub async fn create_draft_order_metafield(
		&self,
		draft_order_id: i64,
		key: &str,
		value: &str,
	) -> Result<Metafield, CommerceError> {
		let body = serde_json::json!({
			"metafield": {
				"namespace": metafields::NAMESPACE,
				"key": key,
				"value": value,
				"type": metafields::SINGLE_LINE_TEXT,
			}
		});

		let response = self
			.http
			.post(self.url(&format!("draft_orders/{}/metafields.json", draft_order_id)))
			.header(ACCESS_TOKEN_HEADER, &self.access_token)
			.json(&body)
			.send()
			.await?;

		Self::parse_metafield(Self::check(response).await?).await
	}

	async fn parse_metafield(response: reqwest::Response) -> Result<Metafield, CommerceError> {
		#[derive(Deserialize)]
		struct Envelope {
			metafield: Metafield,
		}

		let envelope: Envelope = response.json().await?;
		Ok(envelope.metafield)
	}

	/// Map non-success statuses onto the failure taxonomy. 401/403 is a
	/// credential problem; anything else carries the backend's own detail.
	async fn check(response: reqwest::Response) -> Result<reqwest::Response, CommerceError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}

		if status.as_u16() == 401 || status.as_u16() == 403 {
			return Err(CommerceError::AccessToken);
		}

		let detail = response.text().await.unwrap_or_default();
		Err(CommerceError::Upstream {
			status: status.as_u16(),
			detail,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reserve_types::{LineItemInput, ResourceId};
	use wiremock::matchers::{body_partial_json, header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn shop_config(base_url: &str) -> ShopConfig {
		ShopConfig {
			domain: "example.myshopify.com".to_string(),
			access_token: "shpat_test".to_string(),
			api_version: "2024-10".to_string(),
			api_base: Some(base_url.to_string()),
		}
	}

	fn sample_input() -> DraftOrderInput {
		DraftOrderInput {
			line_items: vec![LineItemInput {
				title: "Dental Chair".to_string(),
				price: 1200.5,
				quantity: 1,
				variant_id: Some(ResourceId::Text(
					"gid://shopify/ProductVariant/111".to_string(),
				)),
				product_id: Some(ResourceId::Text("222".to_string())),
				properties: vec![],
			}],
			customer: CustomerInput {
				email: "visitor@example.com".to_string(),
				first_name: None,
				last_name: None,
			},
			note: None,
			tags: vec![],
		}
	}

	#[test]
	fn payload_normalizes_prices_and_identifiers() {
		let payload = DraftOrderPayload::from_input(
			&sample_input(),
			Some("RES-250307-1234".to_string()),
			&["RES-250307-1234".to_string(), "reservation".to_string()],
		);

		let item = &payload.line_items[0];
		assert_eq!(item.price, "1200.50");
		assert_eq!(item.variant_id, Some(111));
		assert_eq!(item.product_id, Some(222));
		assert_eq!(
			payload.tags.as_deref(),
			Some("RES-250307-1234, reservation")
		);
	}

	#[tokio::test]
	async fn create_draft_order_submits_token_and_derives_admin_url() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/draft_orders.json"))
			.and(header("X-Shopify-Access-Token", "shpat_test"))
			.and(body_partial_json(serde_json::json!({
				"draft_order": { "line_items": [{ "price": "1200.50", "variant_id": 111 }] }
			})))
			.respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
				"draft_order": { "id": 9001, "name": "#D123" }
			})))
			.expect(1)
			.mount(&server)
			.await;

		let client = CommerceClient::new(&shop_config(&server.uri())).unwrap();
		let payload = DraftOrderPayload::from_input(&sample_input(), None, &[]);
		let record = client.create_draft_order(&payload).await.unwrap();

		assert_eq!(record.id, 9001);
		assert_eq!(record.name, "#D123");
		assert_eq!(
			record.admin_url,
			"https://example.myshopify.com/admin/draft_orders/9001"
		);
	}

	#[tokio::test]
	async fn expired_token_maps_to_access_token_error() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/draft_orders.json"))
			.respond_with(ResponseTemplate::new(401))
			.mount(&server)
			.await;

		let client = CommerceClient::new(&shop_config(&server.uri())).unwrap();
		let payload = DraftOrderPayload::from_input(&sample_input(), None, &[]);
		let err = client.create_draft_order(&payload).await.unwrap_err();

		assert!(matches!(err, CommerceError::AccessToken));
	}

	#[tokio::test]
	async fn validation_failure_carries_backend_detail() {
		let server = MockServer::start().await;

		Mock::given(method("POST"))
			.and(path("/admin/api/2024-10/draft_orders.json"))
			.respond_with(
				ResponseTemplate::new(422)
					.set_body_string(r#"{"errors":{"line_items":["can't be blank"]}}"#),
			)
			.mount(&server)
			.await;

		let client = CommerceClient::new(&shop_config(&server.uri())).unwrap();
		let payload = DraftOrderPayload::from_input(&sample_input(), None, &[]);

		match client.create_draft_order(&payload).await.unwrap_err() {
			CommerceError::Upstream { status, detail } => {
				assert_eq!(status, 422);
				assert!(detail.contains("line_items"));
			}
			other => panic!("unexpected error: {:?}", other),
		}
	}

	#[tokio::test]
	async fn variant_lookup_resolves_owning_product() {
		let server = MockServer::start().await;

		Mock::given(method("GET"))
			.and(path("/admin/api/2024-10/variants/111.json"))
			.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
				"variant": { "id": 111, "product_id": 222, "title": "Default" }
			})))
			.mount(&server)
			.await;

		let client = CommerceClient::new(&shop_config(&server.uri())).unwrap();
		let variant = client.get_variant(111).await.unwrap();
		assert_eq!(variant.product_id, 222);
	}
}
