// reserve-config/src/lib.rs

use std::env;
use std::path::Path;
use thiserror::Error;

mod types;

pub use types::{ProxyConfig, ReserveConfig, ServerConfig, ShopConfig, SpamConfig};

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("File not found: {0}")]
	FileNotFound(String),

	#[error("Parse error: {0}")]
	ParseError(String),

	#[error("Validation error: {0}")]
	ValidationError(String),

	#[error("Environment variable not found: {0}")]
	EnvVarNotFound(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),
}

/// Configuration loader with environment variable substitution
#[derive(Default)]
pub struct ConfigLoader {
	file_path: Option<String>,
	env_prefix: String,
}

impl ConfigLoader {
	pub fn new() -> Self {
		Self {
			file_path: None,
			env_prefix: "RESERVE_".to_string(),
		}
	}

	pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.file_path = Some(path.as_ref().to_string_lossy().to_string());
		self
	}

	pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.env_prefix = prefix.into();
		self
	}

	pub async fn load(&self) -> Result<ReserveConfig, ConfigError> {
		let mut config = if let Some(file_path) = &self.file_path {
			self.load_from_file(file_path).await?
		} else {
			return Err(ConfigError::FileNotFound(
				"No configuration file specified".to_string(),
			));
		};

		self.apply_env_overrides(&mut config)?;
		self.validate_config(&config)?;

		Ok(config)
	}

	async fn load_from_file(&self, file_path: &str) -> Result<ReserveConfig, ConfigError> {
		let content = tokio::fs::read_to_string(file_path).await?;

		// Substitute environment variables
		let substituted_content = self.substitute_env_vars(&content)?;

		let config: ReserveConfig = toml::from_str(&substituted_content)
			.map_err(|e| ConfigError::ParseError(e.to_string()))?;

		Ok(config)
	}

	/// Replace `${VAR_NAME}` patterns with the named environment variable.
	fn substitute_env_vars(&self, content: &str) -> Result<String, ConfigError> {
		let mut result = content.to_string();

		let re = regex::Regex::new(r"\$\{([^}]+)\}").unwrap();

		for cap in re.captures_iter(content) {
			let full_match = &cap[0];
			let var_name = &cap[1];

			let env_value = env::var(var_name)
				.map_err(|_| ConfigError::EnvVarNotFound(var_name.to_string()))?;

			result = result.replace(full_match, &env_value);
		}

		Ok(result)
	}

	fn apply_env_overrides(&self, config: &mut ReserveConfig) -> Result<(), ConfigError> {
		if let Ok(host) = env::var(format!("{}HOST", self.env_prefix)) {
			config.server.host = host;
		}

		if let Ok(port) = env::var(format!("{}PORT", self.env_prefix)) {
			config.server.port = port
				.parse()
				.map_err(|e| ConfigError::ValidationError(format!("Invalid port: {}", e)))?;
		}

		if let Ok(secret) = env::var(format!("{}SIGNING_SECRET", self.env_prefix)) {
			config.proxy.signing_secret = Some(secret);
		}

		if let Ok(token) = env::var(format!("{}ACCESS_TOKEN", self.env_prefix)) {
			config.shop.access_token = token;
		}

		Ok(())
	}

	fn validate_config(&self, config: &ReserveConfig) -> Result<(), ConfigError> {
		if config.shop.domain.is_empty() {
			return Err(ConfigError::ValidationError(
				"Shop domain must not be empty".to_string(),
			));
		}

		if config.shop.access_token.is_empty() {
			return Err(ConfigError::ValidationError(
				"Shop access token must not be empty".to_string(),
			));
		}

		if !(0.0..=1.0).contains(&config.spam.score_threshold) {
			return Err(ConfigError::ValidationError(
				"Spam score threshold must be within [0.0, 1.0]".to_string(),
			));
		}

		Ok(())
	}
}
