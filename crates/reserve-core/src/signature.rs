//! App-proxy signature verification.
//!
//! A single canonical scheme is authoritative: drop the `signature`
//! parameter, sort the remaining pairs lexicographically by key, concatenate
//! `keyvalue` with no separator, HMAC-SHA256 the result with the shared
//! secret, hex-encode. Requests signed under any other derivation, including
//! the legacy separator and unsorted variants, are rejected.
//!
//! Nothing here logs the secret or a computed digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Canonical message form: lexicographically sorted `keyvalue` pairs, no
/// separator, `signature` excluded.
fn canonical_message(params: &HashMap<String, String>) -> String {
	let mut pairs: Vec<(&str, &str)> = params
		.iter()
		.filter(|(key, _)| key.as_str() != "signature")
		.map(|(key, value)| (key.as_str(), value.as_str()))
		.collect();
	pairs.sort_by(|a, b| a.0.cmp(b.0));

	pairs
		.into_iter()
		.map(|(key, value)| format!("{}{}", key, value))
		.collect()
}

/// Sign a parameter set under the canonical scheme. Used by the proxy on the
/// sending side and by tests constructing valid requests.
pub fn compute_signature(params: &HashMap<String, String>, secret: &str) -> String {
	let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
		Ok(mac) => mac,
		// HMAC accepts keys of any length; unreachable in practice.
		Err(_) => return String::new(),
	};
	mac.update(canonical_message(params).as_bytes());
	hex::encode(mac.finalize().into_bytes())
}

/// Verify the `signature` parameter against the canonical scheme.
/// Comparison happens constant-time inside the MAC verification.
pub fn verify_proxy_signature(params: &HashMap<String, String>, secret: &str) -> bool {
	let supplied = match params.get("signature") {
		Some(s) => s,
		None => return false,
	};

	let supplied_bytes = match hex::decode(supplied) {
		Ok(bytes) => bytes,
		Err(_) => return false,
	};

	let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
		Ok(mac) => mac,
		Err(_) => return false,
	};
	mac.update(canonical_message(params).as_bytes());
	mac.verify_slice(&supplied_bytes).is_ok()
}
