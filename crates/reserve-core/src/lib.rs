//! Decision logic for the reservation backend: request gates, reservation
//! state reads/writes, and the orchestrator that sequences them.

pub mod orchestrator;
pub mod reader;
pub mod signature;
pub mod spam;
pub mod writer;

pub use orchestrator::{HttpReply, Orchestrator};
pub use signature::{compute_signature, verify_proxy_signature};
pub use spam::{SpamGate, SpamVerdict};
