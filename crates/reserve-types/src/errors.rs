//! Error taxonomy for the reservation pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ReserveError>;

/// Every way a reservation request can fail, with its HTTP mapping.
#[derive(Error, Debug)]
pub enum ReserveError {
	#[error("Method not allowed")]
	MethodNotAllowed,

	#[error("Missing required query parameters")]
	MissingQueryParams,

	#[error("Missing draft order data")]
	MissingDraftOrder,

	#[error("Invalid request body: {0}")]
	InvalidBody(String),

	#[error("Verification failed: {0}")]
	SpamRejected(String),

	#[error("Invalid signature")]
	InvalidSignature,

	#[error("Server configuration error: {0}")]
	ConfigMissing(String),

	#[error("Product is already reserved")]
	AlreadyReserved { product_id: i64 },

	#[error("Access token expired or invalid")]
	AccessTokenInvalid,

	#[error("Commerce backend rejected the request: {detail}")]
	UpstreamValidation { status: u16, detail: String },

	#[error("Transport error: {0}")]
	Transport(String),
}

impl ReserveError {
	/// HTTP status the orchestrator responds with for this failure.
	pub fn status_code(&self) -> u16 {
		match self {
			ReserveError::MethodNotAllowed => 405,
			ReserveError::MissingQueryParams
			| ReserveError::MissingDraftOrder
			| ReserveError::InvalidBody(_)
			| ReserveError::SpamRejected(_) => 400,
			ReserveError::InvalidSignature | ReserveError::AccessTokenInvalid => 401,
			ReserveError::AlreadyReserved { .. } => 409,
			ReserveError::UpstreamValidation { status, .. } => *status,
			ReserveError::ConfigMissing(_) | ReserveError::Transport(_) => 500,
		}
	}

	/// Stable token for programmatic handling, where one exists.
	pub fn error_type(&self) -> Option<&'static str> {
		match self {
			ReserveError::AlreadyReserved { .. } => Some("PRODUCT_ALREADY_RESERVED"),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_mapping_matches_response_contract() {
		assert_eq!(ReserveError::MethodNotAllowed.status_code(), 405);
		assert_eq!(ReserveError::MissingQueryParams.status_code(), 400);
		assert_eq!(
			ReserveError::InvalidBody("invalid type".into()).status_code(),
			400
		);
		assert_eq!(ReserveError::InvalidSignature.status_code(), 401);
		assert_eq!(
			ReserveError::AlreadyReserved { product_id: 1 }.status_code(),
			409
		);
		assert_eq!(ReserveError::AccessTokenInvalid.status_code(), 401);
		assert_eq!(
			ReserveError::UpstreamValidation {
				status: 422,
				detail: "line_items invalid".into()
			}
			.status_code(),
			422
		);
		assert_eq!(ReserveError::Transport("timeout".into()).status_code(), 500);
	}

	#[test]
	fn conflict_carries_stable_error_type() {
		let err = ReserveError::AlreadyReserved { product_id: 7 };
		assert_eq!(err.error_type(), Some("PRODUCT_ALREADY_RESERVED"));
		assert_eq!(ReserveError::InvalidSignature.error_type(), None);
	}
}
