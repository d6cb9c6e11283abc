//! # Client Components
//!
//! ## API Client ([`client`])
//! Builds authenticated requests for every backend operation and classifies
//! the responses.
//!
//! ## Outcomes ([`outcome`])
//! What an operation hands back to UI code: a value, a miss, an expired
//! session with somewhere to go, or a failure message.
//!
//! ## Routes ([`routes`])
//! The endpoint table, per role.

pub mod client;
pub mod outcome;
pub mod routes;

// Re-export for convenience
pub use client::ApiClient;
pub use outcome::ApiOutcome;
pub use routes::ScanScope;
