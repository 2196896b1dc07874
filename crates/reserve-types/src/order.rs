//! Commerce-backend order and metadata records.

use serde::{Deserialize, Serialize};

/// Draft order as returned by the commerce backend, plus the derived
/// admin-facing URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftOrderRecord {
	pub id: i64,
	pub name: String,
	pub admin_url: String,
	/// The backend's full response body, kept verbatim for callers that need
	/// fields this crate does not model.
	#[serde(default)]
	pub raw: serde_json::Value,
}

/// A single namespaced key/value attribute on a product or order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metafield {
	pub id: i64,
	pub namespace: String,
	pub key: String,
	pub value: String,
	#[serde(default, rename = "type")]
	pub value_type: Option<String>,
}

/// Outcome tally for a batch of independent metafield writes.
///
/// Writes after order creation never fail the request; the orchestrator
/// returns this report in the response body instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetafieldWriteReport {
	pub succeeded: Vec<String>,
	pub failed: Vec<FailedWrite>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedWrite {
	pub key: String,
	pub error: String,
}

impl MetafieldWriteReport {
	pub fn record_ok(&mut self, key: impl Into<String>) {
		self.succeeded.push(key.into());
	}

	pub fn record_err(&mut self, key: impl Into<String>, error: impl Into<String>) {
		self.failed.push(FailedWrite {
			key: key.into(),
			error: error.into(),
		});
	}

	pub fn all_ok(&self) -> bool {
		self.failed.is_empty()
	}

	pub fn merge(&mut self, other: MetafieldWriteReport) {
		self.succeeded.extend(other.succeeded);
		self.failed.extend(other.failed);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn report_tallies_independent_writes() {
		let mut report = MetafieldWriteReport::default();
		report.record_ok("reservation_number");
		report.record_ok("customer_email");
		report.record_err("postal_code", "422 Unprocessable Entity");

		assert!(!report.all_ok());
		assert_eq!(report.succeeded.len(), 2);
		assert_eq!(report.failed[0].key, "postal_code");
	}
}
