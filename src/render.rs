//! # Text Rendering
//!
//! Turns patient profiles and audit logs into display text. Missing values
//! never render as blank: scalars and lists fall back to a placeholder.

use chrono::NaiveDate;

use crate::common::models::{
    Complaint, EmergencyContact, Immunization, LogEntry, PatientProfile, Prescription, Surgery,
};

/// Shown for a missing value or an empty list.
pub const PLACEHOLDER: &str = "—";

pub fn format_text(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Items joined by `", "`, or the placeholder when there are none.
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        PLACEHOLDER.to_string()
    } else {
        items.join(", ")
    }
}

/// Dates are shown day first (`DD/MM/YYYY`).
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// One line per item, or a single placeholder line for an empty list.
pub fn render_entries<T>(items: &[T], formatter: impl Fn(&T) -> String) -> Vec<String> {
    if items.is_empty() {
        return vec![PLACEHOLDER.to_string()];
    }
    items.iter().map(formatter).collect()
}

fn with_info(line: String, info: &str) -> String {
    if info.is_empty() {
        line
    } else {
        format!("{} – {}", line, info)
    }
}

pub fn format_surgery(s: &Surgery) -> String {
    format!(
        "{} ({}) – {}",
        s.surgery_name,
        format_date(Some(s.date)),
        s.additional_info
    )
}

pub fn format_prescription(p: &Prescription) -> String {
    with_info(
        format!(
            "{} | {} ({})",
            p.prescription_name,
            p.prescription_dose,
            format_date(Some(p.date))
        ),
        &p.additional_info,
    )
}

pub fn format_immunization(i: &Immunization) -> String {
    with_info(
        format!("{} ({})", i.immunization_name, format_date(Some(i.date))),
        &i.additional_info,
    )
}

pub fn format_complaint(c: &Complaint) -> String {
    with_info(
        format!("{} ({})", c.complaint, format_date(Some(c.date))),
        &c.additional_info,
    )
}

pub fn format_contact(e: &EmergencyContact) -> String {
    let mut line = format!("{} – {}", e.name, e.contact_number);
    if !e.address.is_empty() {
        line.push_str(&format!(" ({})", e.address));
    }
    with_info(line, &e.additional_info)
}

/// Full profile page as labelled lines.
pub fn profile_text(profile: &PatientProfile) -> String {
    let mut out = Vec::new();

    out.push(format!("Full name:           {}", format_text(profile.full_name.as_deref())));
    out.push(format!("NRIC:                {}", format_text(profile.nric_number.as_deref())));
    out.push(format!("Birth date:          {}", format_date(profile.birth_date)));
    out.push(format!("Sex:                 {}", format_text(profile.sex.as_deref())));
    out.push(format!("Blood type:          {}", format_text(profile.blood_type.as_deref())));
    out.push(format!("Allergies:           {}", format_list(&profile.allergies)));
    out.push(format!("Chronic conditions:  {}", format_list(&profile.chronic_conditions)));
    out.push(format!("Risk factors:        {}", format_list(&profile.risk_factors)));
    out.push(format!("Advanced directives: {}", format_list(&profile.advanced_directives)));

    let sections: [(&str, Vec<String>); 5] = [
        ("Major surgeries", render_entries(&profile.major_surgeries, format_surgery)),
        ("Prescriptions", render_entries(&profile.prescriptions, format_prescription)),
        ("Immunization", render_entries(&profile.immunization, format_immunization)),
        ("Presenting complaint", render_entries(&profile.presenting_complaint, format_complaint)),
        ("Emergency contacts", render_entries(&profile.emergency_contacts, format_contact)),
    ];

    for (title, lines) in sections {
        out.push(format!("{}:", title));
        out.extend(lines.into_iter().map(|line| format!("  - {}", line)));
    }

    out.join("\n")
}

/// The at-a-glance card a doctor sees after scanning a MyKad.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmergencySummary {
    pub blood_type: String,
    pub allergies: String,
    pub chronic_conditions: String,
    pub notes: String,
}

impl EmergencySummary {
    pub fn from_profile(profile: &PatientProfile) -> Self {
        let or_else = |items: &[String], fallback: &str| {
            if items.is_empty() {
                fallback.to_string()
            } else {
                items.join(", ")
            }
        };

        let mut notes = Vec::new();
        if !profile.risk_factors.is_empty() {
            notes.push(format!("Risk Factors: {}", profile.risk_factors.join(", ")));
        }
        if !profile.advanced_directives.is_empty() {
            notes.push(format!("Directives: {}", profile.advanced_directives.join(", ")));
        }

        Self {
            blood_type: profile
                .blood_type
                .clone()
                .filter(|b| !b.trim().is_empty())
                .unwrap_or_else(|| "--".to_string()),
            allergies: or_else(&profile.allergies, "NONE"),
            chronic_conditions: or_else(&profile.chronic_conditions, "None Reported"),
            notes: if notes.is_empty() {
                "No critical alerts.".to_string()
            } else {
                notes.join(" | ")
            },
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "BLOOD TYPE: {}\nALLERGIES:  {}\nCHRONIC:    {}\nNOTES:      {}",
            self.blood_type, self.allergies, self.chronic_conditions, self.notes
        )
    }
}

/// Audit log table, one row per entry. Empty logs render nothing.
pub fn log_rows(logs: &[LogEntry]) -> Vec<String> {
    logs.iter()
        .map(|log| {
            format!(
                "{} | {} | {} | {}",
                log.timestamp, log.patient_id, log.action, log.staff_name
            )
        })
        .collect()
}
