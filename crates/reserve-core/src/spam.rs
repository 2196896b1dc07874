//! Human-verification gate backed by an external scoring service.

use reserve_config::SpamConfig;
use reserve_types::ReserveError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Outcome of the gate for an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SpamVerdict {
	/// No verification secret configured for this deployment. A configuration
	/// choice, not a security decision.
	Skipped,
	/// Service accepted the token with this confidence score.
	Passed(f64),
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
	success: bool,
	#[serde(default)]
	score: Option<f64>,
	#[serde(default)]
	action: Option<String>,
	#[serde(default, rename = "error-codes")]
	error_codes: Vec<String>,
}

/// Validates client-supplied verification tokens before any backend work.
#[derive(Clone)]
pub struct SpamGate {
	config: SpamConfig,
	http: reqwest::Client,
}

impl SpamGate {
	pub fn new(config: SpamConfig) -> Result<Self, ReserveError> {
		let http = reqwest::Client::builder()
			.timeout(HTTP_TIMEOUT)
			.build()
			.map_err(|e| ReserveError::Transport(e.to_string()))?;

		Ok(Self { config, http })
	}

	/// Check a token against the verification service. Every failure mode
	/// surfaces a distinct rejection reason.
	pub async fn check(
		&self,
		token: Option<&str>,
		declared_action: Option<&str>,
	) -> Result<SpamVerdict, ReserveError> {
		let secret = match self.config.secret.as_deref().filter(|s| !s.is_empty()) {
			Some(secret) => secret,
			None => {
				info!("no verification secret configured; spam gate skipped");
				return Ok(SpamVerdict::Skipped);
			}
		};

		let token = token
			.filter(|t| !t.is_empty())
			.ok_or_else(|| ReserveError::SpamRejected("missing verification token".to_string()))?;

		let response = self
			.http
			.post(&self.config.verify_url)
			.form(&[("secret", secret), ("response", token)])
			.send()
			.await
			.map_err(|e| {
				warn!("verification service unreachable: {}", e);
				ReserveError::SpamRejected("verification service error".to_string())
			})?;

		let verdict: VerifyResponse = response.json().await.map_err(|e| {
			warn!("verification service returned malformed body: {}", e);
			ReserveError::SpamRejected("verification service error".to_string())
		})?;

		if !verdict.success {
			return Err(ReserveError::SpamRejected(format!(
				"verification failed: {}",
				verdict.error_codes.join(", ")
			)));
		}

		if let Some(declared) = declared_action.filter(|a| !a.is_empty()) {
			if verdict.action.as_deref() != Some(declared) {
				return Err(ReserveError::SpamRejected(format!(
					"action mismatch: expected {}",
					declared
				)));
			}
		}

		let score = verdict.score.unwrap_or(0.0);
		if score < self.config.score_threshold {
			return Err(ReserveError::SpamRejected(format!(
				"confidence score {} below threshold",
				score
			)));
		}

		debug!(score, "verification token accepted");
		Ok(SpamVerdict::Passed(score))
	}
}
