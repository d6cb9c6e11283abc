//! # Wire Models
//!
//! Request and response bodies exchanged with the LifeLink backend. Field
//! names follow the backend's JSON; Rust names follow Rust conventions.
//!
//! Every list on a [`PatientProfile`] defaults to empty, so a backend that
//! omits a list, or sends `null`, decodes the same as one that sends `[]`.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// ROLES AND AUTHENTICATION
// ============================================================================

/// The three kinds of user the backend issues tokens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Doctor,
    Patient,
    ClinicAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::ClinicAdmin => "clinic_admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "doctor" => Ok(Role::Doctor),
            "patient" => Ok(Role::Patient),
            "clinic_admin" | "clinic-admin" => Ok(Role::ClinicAdmin),
            other => Err(format!(
                "unknown role '{}' (expected doctor, patient or clinic_admin)",
                other
            )),
        }
    }
}

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub user_id: String,
    pub role: Role,
}

/// Successful login: the bearer token and the role it was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: Role,
}

// ============================================================================
// OCR SCAN
// ============================================================================

/// What the backend read off an uploaded MyKad image.
///
/// OCR reports a field it could not read as `null`; that decodes to an empty
/// string here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    #[serde(rename = "nric", default, deserialize_with = "null_as_default")]
    pub national_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "raw_ocr", default, deserialize_with = "null_as_default")]
    pub raw_ocr_text: String,
}

impl ScanResult {
    /// Whether OCR produced a usable national ID.
    pub fn has_national_id(&self) -> bool {
        !self.national_id.trim().is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// PATIENT PROFILE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surgery {
    pub surgery_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub prescription_name: String,
    pub prescription_dose: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Immunization {
    pub immunization_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub complaint: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub additional_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyContact {
    pub name: String,
    pub contact_number: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub date_added: Option<NaiveDate>,
    /// Usually the relationship ("son", "father")
    #[serde(default)]
    pub additional_info: String,
}

/// A patient's medical record, keyed by national ID.
///
/// Also decodes the clinic-admin limited view, which only carries the
/// demographic scalars, prescriptions and presenting complaints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub nric_number: Option<String>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub blood_type: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub allergies: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chronic_conditions: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub risk_factors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advanced_directives: Vec<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub major_surgeries: Vec<Surgery>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub prescriptions: Vec<Prescription>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub immunization: Vec<Immunization>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub presenting_complaint: Vec<Complaint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub emergency_contacts: Vec<EmergencyContact>,
}

// ============================================================================
// REGISTRATION AND UPDATES
// ============================================================================

/// Body of `POST /patient/mykadscan/confirmation`.
///
/// Unlike [`PatientProfile`], an unanswered list is sent as `null` rather than
/// `[]`: the backend distinguishes "not provided" from "none".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub full_name: String,
    pub nric_number: String,
    pub birth_date: NaiveDate,
    pub sex: String,
    pub blood_type: String,
    pub allergies: Option<Vec<String>>,
    pub chronic_conditions: Option<Vec<String>>,
    pub risk_factors: Option<Vec<String>>,
    pub emergency_contacts: Option<Vec<EmergencyContact>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Created,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResponse {
    pub status: RegistrationStatus,
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub message: String,
}

/// Records a clinic admin appends to an existing patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicUpdate {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prescriptions: Option<Vec<Prescription>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub presenting_complaint: Option<Vec<Complaint>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

// ============================================================================
// AUDIT LOG
// ============================================================================

/// One row of the admin access log. Display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    #[serde(rename = "patient_ic")]
    pub patient_id: String,
    pub action: String,
    pub staff_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_names() {
        assert_eq!(serde_json::to_value(Role::ClinicAdmin).unwrap(), json!("clinic_admin"));
        assert_eq!("clinic-admin".parse::<Role>().unwrap(), Role::ClinicAdmin);
        assert_eq!("doctor".parse::<Role>().unwrap(), Role::Doctor);
        assert!("nurse".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_missing_and_null_lists_are_empty() {
        let profile: PatientProfile = serde_json::from_value(json!({
            "full_name": "Ahmad",
            "blood_type": "O+",
            "allergies": [],
            "chronic_conditions": null
        }))
        .unwrap();

        assert_eq!(profile.full_name.as_deref(), Some("Ahmad"));
        assert!(profile.allergies.is_empty());
        assert!(profile.chronic_conditions.is_empty());
        assert!(profile.emergency_contacts.is_empty());
        assert_eq!(profile.birth_date, None);
    }

    #[test]
    fn test_clinic_view_decodes_as_profile() {
        let profile: PatientProfile = serde_json::from_value(json!({
            "full_name": "ALI BIN ABU",
            "sex": "male",
            "birth_date": "1999-01-01",
            "nric_number": "990101011234",
            "prescriptions": [{
                "prescription_name": "paracetamol 500mg",
                "prescription_dose": "3x a day after eating",
                "date": "2024-03-02",
                "additional_info": "given from clinic ammar"
            }],
            "presenting_complaint": null
        }))
        .unwrap();

        assert_eq!(profile.birth_date, NaiveDate::from_ymd_opt(1999, 1, 1));
        assert_eq!(profile.prescriptions.len(), 1);
        assert!(profile.presenting_complaint.is_empty());
        assert_eq!(profile.blood_type, None);
    }

    #[test]
    fn test_scan_result_wire_names() {
        let scan: ScanResult = serde_json::from_value(json!({
            "nric": "990101-01-1234",
            "name": "AHMAD BIN ALI",
            "raw_ocr": "MYKAD 990101-01-1234 AHMAD BIN ALI"
        }))
        .unwrap();

        assert_eq!(scan.national_id, "990101-01-1234");
        assert_eq!(scan.raw_ocr_text, "MYKAD 990101-01-1234 AHMAD BIN ALI");
    }

    #[test]
    fn test_scan_result_unread_fields_are_empty() {
        let scan: ScanResult = serde_json::from_value(json!({
            "nric": null,
            "name": null,
            "raw_ocr": "blurred"
        }))
        .unwrap();

        assert!(!scan.has_national_id());
        assert_eq!(scan.name, "");
        assert_eq!(scan.raw_ocr_text, "blurred");

        let scan: ScanResult = serde_json::from_value(json!({"nric": "990101-01-1234"})).unwrap();
        assert!(scan.has_national_id());
        assert_eq!(scan.raw_ocr_text, "");
    }

    #[test]
    fn test_empty_clinic_update_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(ClinicUpdate::default()).unwrap(), json!({}));
    }
}
