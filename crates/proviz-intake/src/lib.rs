//! Application intake and retrieval for the Proviz School of AI admissions site.
//!
//! The crate owns the submission and listing contracts, the pluggable application store,
//! and the best-effort notification hook. The HTTP binary lives in `services/api`.

pub mod applications;
pub mod config;
pub mod error;
pub mod telemetry;
