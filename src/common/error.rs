//! # Error Taxonomy
//!
//! Every way a backend call can fail, from checks that run before a request
//! is built to responses the backend rejects.

use thiserror::Error;

/// Where a user is sent back to after their session expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    DoctorLogin,
    PatientLogin,
    AdminLogin,
    Home,
}

impl EntryPoint {
    /// Entry point for whoever held the expired session.
    pub fn for_role(role: Option<crate::common::models::Role>) -> Self {
        use crate::common::models::Role;

        match role {
            Some(Role::Doctor) => EntryPoint::DoctorLogin,
            Some(Role::Patient) => EntryPoint::PatientLogin,
            Some(Role::ClinicAdmin) => EntryPoint::AdminLogin,
            None => EntryPoint::Home,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            EntryPoint::DoctorLogin => "loginPages/doctorLogin.html",
            EntryPoint::PatientLogin => "loginPages/patientLogin.html",
            EntryPoint::AdminLogin => "loginPages/adminLogin.html",
            EntryPoint::Home => "index.html",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: the persisted session has already been cleared.
    #[error("Unauthorized: please log in again")]
    SessionExpired { redirect: EntryPoint },

    /// 404, with the server's detail or the operation name.
    #[error("Not Found: {detail}")]
    NotFound { detail: String },

    /// 422. `detail` is the joined `"<loc>: <msg>"` list.
    #[error("Validation failed: {detail}")]
    ValidationFailed { detail: String },

    /// Any other non-2xx response.
    #[error("{message}")]
    Server { message: String },

    #[error(
        "Cannot connect to the server. Please make sure the backend server is running on {base_url}. Start it using: python start_server.py"
    )]
    NetworkUnreachable { base_url: String },

    /// Rejected on the client side: a missing token, file or consent before
    /// sending, or a scan OCR could not read a national ID from.
    #[error("{0}")]
    LocalPrecondition(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ApiError {
    pub fn precondition(message: impl Into<String>) -> Self {
        ApiError::LocalPrecondition(message.into())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::models::Role;

    #[test]
    fn test_entry_point_per_role() {
        assert_eq!(EntryPoint::for_role(Some(Role::Doctor)).path(), "loginPages/doctorLogin.html");
        assert_eq!(EntryPoint::for_role(Some(Role::Patient)).path(), "loginPages/patientLogin.html");
        assert_eq!(EntryPoint::for_role(Some(Role::ClinicAdmin)).path(), "loginPages/adminLogin.html");
        assert_eq!(EntryPoint::for_role(None).path(), "index.html");
    }

    #[test]
    fn test_network_message_names_backend() {
        let err = ApiError::NetworkUnreachable {
            base_url: "http://127.0.0.1:8000".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("http://127.0.0.1:8000"));
        assert!(message.contains("start_server.py"));
    }
}
