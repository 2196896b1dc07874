//! Response types for the reservation HTTP API.

use crate::{MetafieldWriteReport, ReservationNumber};
use serde::{Deserialize, Serialize};

/// Successful reservation response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationResponse {
	pub success: bool,
	pub reservation_number: ReservationNumber,
	pub draft_order: DraftOrderSummary,
	/// Whether both product metafields were confirmed in their reserved state.
	pub product_status_updated: bool,
	pub product_id: Option<i64>,
	pub metafield_result: MetafieldWriteReport,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub draft_order_metafields: Option<MetafieldWriteReport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub debug_info: Option<serde_json::Value>,
}

/// Subset of the created draft order surfaced to the storefront.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderSummary {
	pub id: i64,
	pub name: String,
	pub admin_url: String,
}

/// Failure response body. Every failure carries at least `error`; the
/// reservation conflict additionally carries a stable `error_type` token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub success: Option<bool>,
	pub error: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub product_id: Option<i64>,
}

impl ErrorBody {
	pub fn new(error: impl Into<String>) -> Self {
		Self {
			success: None,
			error: error.into(),
			error_type: None,
			product_id: None,
		}
	}

	pub fn failed(error: impl Into<String>) -> Self {
		Self {
			success: Some(false),
			..Self::new(error)
		}
	}
}
