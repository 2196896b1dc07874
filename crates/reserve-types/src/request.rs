//! Inbound request types for the reservation endpoint.
//!
//! A [`ReservationRequest`] is created once per call and discarded after the
//! response is sent; nothing here is persisted.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of a reservation submission as posted by the storefront modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationRequest {
	/// The order to create on behalf of the visitor.
	pub draft_order: Option<DraftOrderInput>,
	/// Human-verification token issued to the client, if any.
	pub recaptcha_token: Option<String>,
	/// Action label the client claims the token was issued for.
	pub recaptcha_action: Option<String>,
	/// Locale tag of the storefront session.
	pub language: Option<String>,
}

/// Draft-order payload assembled from the modal form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderInput {
	pub line_items: Vec<LineItemInput>,
	pub customer: CustomerInput,
	#[serde(default)]
	pub note: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
}

/// A single line item as submitted by the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemInput {
	pub title: String,
	pub price: f64,
	pub quantity: u32,
	#[serde(default)]
	pub variant_id: Option<ResourceId>,
	#[serde(default)]
	pub product_id: Option<ResourceId>,
	#[serde(default)]
	pub properties: Vec<LineItemProperty>,
}

/// Free-form name/value property attached to a line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItemProperty {
	pub name: String,
	pub value: String,
}

/// Customer descriptor; only the email is required by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerInput {
	pub email: String,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
}

/// A product or variant identifier as it arrives off the wire.
///
/// Storefront scripts send identifiers in three shapes: a plain number, a
/// numeric string, or a namespaced GID URI such as
/// `gid://shopify/ProductVariant/1234`. All three reduce to the trailing
/// numeric component via [`ResourceId::as_i64`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
	Numeric(i64),
	Text(String),
}

impl ResourceId {
	/// Reduce the identifier to its numeric component, if it has one.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			ResourceId::Numeric(n) => Some(*n),
			ResourceId::Text(s) => {
				let tail = s.rsplit('/').next().unwrap_or(s);
				tail.parse::<i64>().ok()
			}
		}
	}
}

impl fmt::Display for ResourceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ResourceId::Numeric(n) => write!(f, "{}", n),
			ResourceId::Text(s) => write!(f, "{}", s),
		}
	}
}

impl From<i64> for ResourceId {
	fn from(n: i64) -> Self {
		ResourceId::Numeric(n)
	}
}
