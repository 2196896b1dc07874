//! Service wiring for the reservation backend: router construction and
//! application state. The binary in `main.rs` adds the CLI and lifecycle.

pub mod server;

pub use server::{build_router, AppState};

use anyhow::Context;
use reserve_commerce::CommerceClient;
use reserve_config::ReserveConfig;
use reserve_core::{Orchestrator, SpamGate};

/// Assemble the orchestrator from configuration. Credentials are carried in
/// the returned value; nothing is stashed in process-global state.
pub fn build_orchestrator(config: ReserveConfig) -> anyhow::Result<Orchestrator> {
	let commerce =
		CommerceClient::new(&config.shop).context("Failed to build commerce client")?;
	let spam = SpamGate::new(config.spam.clone()).context("Failed to build spam gate")?;

	Ok(Orchestrator::new(config, commerce, spam))
}
