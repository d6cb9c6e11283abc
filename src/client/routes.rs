//! Backend route table. The only place endpoint paths are spelled out.

use crate::common::models::Role;

pub const LOGIN: &str = "/auth/login";

pub const DOCTOR_SCAN: &str = "/doctor/viewpatientdata/mykadscan";
pub const DOCTOR_PROFILE: &str = "/doctor/viewpatientdata/profile";

pub const PATIENT_INITIAL_SCAN: &str = "/patient/mykadscan/initial";
pub const PATIENT_CONFIRMATION: &str = "/patient/mykadscan/confirmation";
pub const PATIENT_PROFILE: &str = "/patient/profile";

pub const CLINIC_ADMIN_SCAN: &str = "/clinicadmin/viewpatientdata/mykadscan";
pub const CLINIC_PROFILE: &str = "/clinic/viewpatientdata/profile";
pub const CLINIC_UPDATE: &str = "/clinic/viewpatientdata/update";

// Not served by the backend yet; callers get an empty list until it is.
pub const AUDIT_LOGS: &str = "/admin/logs";

/// Which endpoint family a scan upload goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanScope {
    Doctor,
    /// Pre-registration scan; the only unauthenticated upload.
    PatientInitial,
    ClinicAdmin,
}

impl ScanScope {
    pub fn path(&self) -> &'static str {
        match self {
            ScanScope::Doctor => DOCTOR_SCAN,
            ScanScope::PatientInitial => PATIENT_INITIAL_SCAN,
            ScanScope::ClinicAdmin => CLINIC_ADMIN_SCAN,
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, ScanScope::PatientInitial)
    }

    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Doctor => ScanScope::Doctor,
            Role::Patient => ScanScope::PatientInitial,
            Role::ClinicAdmin => ScanScope::ClinicAdmin,
        }
    }
}

/// Profile endpoint for a role. Clinic admins get the limited view.
pub fn profile_path(role: Role) -> &'static str {
    match role {
        Role::Doctor => DOCTOR_PROFILE,
        Role::Patient => PATIENT_PROFILE,
        Role::ClinicAdmin => CLINIC_PROFILE,
    }
}
