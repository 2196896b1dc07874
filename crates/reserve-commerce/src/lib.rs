//! HTTP client for the commerce backend's Admin REST API.
//!
//! Covers the endpoints the reservation pipeline consumes: variant and
//! product lookup, product/draft-order metafields, and draft-order creation.
//! Credentials are injected through [`reserve_config::ShopConfig`]; there is
//! no process-global token state.

use reserve_types::ReserveError;
use thiserror::Error;

mod client;
pub mod metafields;

pub use client::{CommerceClient, DraftOrderPayload, NormalizedLineItem, Product, Variant};

#[derive(Error, Debug)]
pub enum CommerceError {
	/// The backend refused our credential. Operator-actionable: rotate the
	/// token and retry.
	#[error("Access token expired or invalid")]
	AccessToken,

	/// The backend accepted the connection but rejected the payload.
	#[error("Backend rejected request ({status}): {detail}")]
	Upstream { status: u16, detail: String },

	#[error("Transport error: {0}")]
	Transport(String),
}

impl From<reqwest::Error> for CommerceError {
	fn from(err: reqwest::Error) -> Self {
		CommerceError::Transport(err.to_string())
	}
}

impl From<CommerceError> for ReserveError {
	fn from(err: CommerceError) -> Self {
		match err {
			CommerceError::AccessToken => ReserveError::AccessTokenInvalid,
			CommerceError::Upstream { status, detail } => {
				ReserveError::UpstreamValidation { status, detail }
			}
			CommerceError::Transport(msg) => ReserveError::Transport(msg),
		}
	}
}
