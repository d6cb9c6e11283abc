//! # Common Components
//!
//! Shared utilities and data structures used by the API client, the session
//! store and the command-line front end.
//!
//! ## Modules
//!
//! - [`models`]: Request and response bodies of the LifeLink backend
//! - [`error`]: Failure taxonomy for backend calls
//! - [`config`]: Configuration parsing and base URL resolution
//! - [`logging`]: Logger setup shared by binaries

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
