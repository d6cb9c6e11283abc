use crate::common::error::{ApiError, ApiResult, EntryPoint};

/// Result of a client operation as the UI needs to branch on it.
///
/// Session expiry and missing records are ordinary outcomes here, not
/// failures: the session has already been cleared by the time
/// [`ApiOutcome::AuthExpired`] is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Ok(T),
    NotFound(String),
    AuthExpired { redirect: EntryPoint },
    Failed(String),
}

impl<T> ApiOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiOutcome::Ok(_))
    }

    /// The value, dropping why there is none.
    pub fn ok(self) -> Option<T> {
        match self {
            ApiOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiOutcome<U> {
        match self {
            ApiOutcome::Ok(value) => ApiOutcome::Ok(f(value)),
            ApiOutcome::NotFound(message) => ApiOutcome::NotFound(message),
            ApiOutcome::AuthExpired { redirect } => ApiOutcome::AuthExpired { redirect },
            ApiOutcome::Failed(message) => ApiOutcome::Failed(message),
        }
    }
}

impl<T> From<ApiResult<T>> for ApiOutcome<T> {
    fn from(result: ApiResult<T>) -> Self {
        match result {
            Ok(value) => ApiOutcome::Ok(value),
            Err(ApiError::SessionExpired { redirect }) => ApiOutcome::AuthExpired { redirect },
            Err(err @ ApiError::NotFound { .. }) => ApiOutcome::NotFound(err.to_string()),
            Err(err) => ApiOutcome::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let expired: ApiOutcome<()> = Err(ApiError::SessionExpired {
            redirect: EntryPoint::DoctorLogin,
        })
        .into();
        assert_eq!(
            expired,
            ApiOutcome::AuthExpired {
                redirect: EntryPoint::DoctorLogin
            }
        );

        let missing: ApiOutcome<()> = Err(ApiError::NotFound {
            detail: "Patient not found".to_string(),
        })
        .into();
        assert_eq!(missing, ApiOutcome::NotFound("Not Found: Patient not found".to_string()));

        let invalid: ApiOutcome<()> = Err(ApiError::ValidationFailed {
            detail: "body.nric: field required".to_string(),
        })
        .into();
        assert_eq!(
            invalid,
            ApiOutcome::Failed("Validation failed: body.nric: field required".to_string())
        );
    }

    #[test]
    fn test_ok_and_map() {
        let outcome: ApiOutcome<u32> = ApiOutcome::Ok(2);
        assert!(outcome.is_ok());
        assert_eq!(outcome.map(|v| v * 10).ok(), Some(20));

        let failed: ApiOutcome<u32> = ApiOutcome::Failed("boom".to_string());
        assert_eq!(failed.ok(), None);
    }
}
