//! Identity verification domain
//!
//! Two-step flow against the CloudAuth collaborator: `init` opens an order
//! and hands the user a liveness-capture URL, `check_result` polls the
//! outcome. Per user the state machine is Unverified -> (external check) ->
//! Verified, terminal once verified. A passed check derives gender from the
//! national-ID sequence digit and persists it together with the
//! verification flag.

pub mod actions;
pub mod gender;

pub use gender::derive_gender;
