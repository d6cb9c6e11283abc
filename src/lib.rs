//! # MyKad-LifeLink Client
//!
//! Client for the LifeLink medical-records backend: scan a MyKad for OCR,
//! look up a patient's profile by national ID, register and update records.
//!
//! - [`client`]: the sessioned API client and its outcome type
//! - [`session`]: persisted token, role and display preferences
//! - [`render`]: profile and audit-log text rendering
//! - [`forms`]: registration form parsing
//! - [`common`]: wire models, errors, configuration, logging

pub mod client;
pub mod common;
pub mod forms;
pub mod render;
pub mod session;

pub use client::{ApiClient, ApiOutcome, ScanScope};
pub use common::error::{ApiError, EntryPoint};
pub use session::SessionStore;
