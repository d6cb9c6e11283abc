//! # Registration Form
//!
//! Builds a [`RegistrationDraft`] from the raw text a patient typed in.

use chrono::NaiveDate;

use crate::common::error::{ApiError, ApiResult};
use crate::common::models::RegistrationDraft;

/// Raw field values, as entered.
#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub full_name: String,
    pub nric_number: String,
    /// `YYYY-MM-DD`
    pub birth_date: String,
    pub sex: String,
    pub blood_type: String,
    /// Comma-separated
    pub allergies: String,
    /// Comma-separated
    pub chronic_conditions: String,
    /// Comma-separated
    pub risk_factors: String,
    pub consent: bool,
}

/// Splits a comma-separated field.
///
/// Blank parts are dropped. A field with nothing in it yields `None`, never
/// an empty list.
pub fn parse_list(text: &str) -> Option<Vec<String>> {
    let items: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

impl RegistrationForm {
    pub fn into_draft(self) -> ApiResult<RegistrationDraft> {
        if !self.consent {
            return Err(ApiError::precondition(
                "Please agree to the consent form to proceed.",
            ));
        }

        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ApiError::precondition("Full name is required"));
        }

        let nric_number = self.nric_number.trim().to_string();
        if nric_number.is_empty() {
            return Err(ApiError::precondition("NRIC is required"));
        }

        let birth_date = NaiveDate::parse_from_str(self.birth_date.trim(), "%Y-%m-%d")
            .map_err(|_| {
                ApiError::precondition(format!(
                    "Birth date '{}' must be in YYYY-MM-DD format",
                    self.birth_date.trim()
                ))
            })?;

        Ok(RegistrationDraft {
            full_name,
            nric_number,
            birth_date,
            sex: self.sex.trim().to_string(),
            blood_type: self.blood_type.trim().to_string(),
            allergies: parse_list(&self.allergies),
            chronic_conditions: parse_list(&self.chronic_conditions),
            risk_factors: parse_list(&self.risk_factors),
            // Not collected at initial registration
            emergency_contacts: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form() -> RegistrationForm {
        RegistrationForm {
            full_name: " Ahmad bin Ali ".into(),
            nric_number: "990101-01-1234".into(),
            birth_date: "1999-01-01".into(),
            sex: "male".into(),
            blood_type: "O+".into(),
            allergies: "peanuts, shellfish".into(),
            chronic_conditions: "   ".into(),
            risk_factors: String::new(),
            consent: true,
        }
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("peanuts, shellfish"),
            Some(vec!["peanuts".to_string(), "shellfish".to_string()])
        );
        assert_eq!(parse_list(" a ,, b ,"), Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(parse_list(""), None);
        assert_eq!(parse_list("  ,  "), None);
    }

    #[test]
    fn test_draft_serializes_blank_lists_as_null() {
        let draft = form().into_draft().unwrap();
        let value = serde_json::to_value(&draft).unwrap();

        assert_eq!(value["full_name"], json!("Ahmad bin Ali"));
        assert_eq!(value["birth_date"], json!("1999-01-01"));
        assert_eq!(value["allergies"], json!(["peanuts", "shellfish"]));
        assert_eq!(value["chronic_conditions"], json!(null));
        assert_eq!(value["risk_factors"], json!(null));
        assert_eq!(value["emergency_contacts"], json!(null));
    }

    #[test]
    fn test_consent_is_required() {
        let err = RegistrationForm {
            consent: false,
            ..form()
        }
        .into_draft()
        .unwrap_err();

        assert!(matches!(err, ApiError::LocalPrecondition(_)));
        assert!(err.to_string().contains("consent"));
    }

    #[test]
    fn test_bad_birth_date() {
        let err = RegistrationForm {
            birth_date: "01/01/1999".into(),
            ..form()
        }
        .into_draft()
        .unwrap_err();

        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
