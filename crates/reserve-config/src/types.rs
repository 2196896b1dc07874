//! Configuration types for the reservation service.

use serde::{Deserialize, Serialize};

/// Complete service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReserveConfig {
	/// HTTP server settings
	pub server: ServerConfig,
	/// Commerce backend credentials
	pub shop: ShopConfig,
	/// App-proxy request signing
	pub proxy: ProxyConfig,
	/// Human-verification gate
	#[serde(default)]
	pub spam: SpamConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
	#[serde(default = "default_host")]
	pub host: String,
	#[serde(default = "default_port")]
	pub port: u16,
}

/// Commerce backend identity and credentials.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShopConfig {
	/// Store domain, e.g. `example.myshopify.com`
	pub domain: String,
	/// Admin API access token
	pub access_token: String,
	/// Admin API version
	#[serde(default = "default_api_version")]
	pub api_version: String,
	/// Override for the API base URL; defaults to `https://{domain}`.
	/// Tests point this at a mock server.
	#[serde(default)]
	pub api_base: Option<String>,
}

impl ShopConfig {
	pub fn api_base_url(&self) -> String {
		self.api_base
			.clone()
			.unwrap_or_else(|| format!("https://{}", self.domain))
	}
}

/// Shared secret for verifying app-proxy signatures.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxyConfig {
	/// Missing or empty at request time surfaces as a server configuration
	/// error, never as a client error.
	#[serde(default)]
	pub signing_secret: Option<String>,
}

/// Human-verification service settings. No secret means the gate is skipped.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpamConfig {
	#[serde(default)]
	pub secret: Option<String>,
	#[serde(default = "default_verify_url")]
	pub verify_url: String,
	#[serde(default = "default_score_threshold")]
	pub score_threshold: f64,
}

impl Default for SpamConfig {
	fn default() -> Self {
		Self {
			secret: None,
			verify_url: default_verify_url(),
			score_threshold: default_score_threshold(),
		}
	}
}

fn default_host() -> String {
	"0.0.0.0".to_string()
}

fn default_port() -> u16 {
	8080
}

fn default_api_version() -> String {
	"2024-10".to_string()
}

fn default_verify_url() -> String {
	"https://www.google.com/recaptcha/api/siteverify".to_string()
}

fn default_score_threshold() -> f64 {
	0.7
}
