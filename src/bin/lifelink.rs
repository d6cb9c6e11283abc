//! # LifeLink Command-Line Front End
//!
//! One subcommand per user action. Each runs a single backend operation (or
//! the short chain a page would run, such as scan-then-lookup) and prints the
//! result.
//!
//! ## Usage
//!
//! ```bash
//! lifelink --config config/client.toml login --user-id 1001 --role doctor
//! lifelink --config config/client.toml scan --role doctor --image card.jpg
//! lifelink --config config/client.toml profile --role patient --nric 990101-01-1234
//! lifelink --config config/client.toml logs
//! lifelink --config config/client.toml logout
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use lifelink::client::{ApiClient, ApiOutcome, ScanScope};
use lifelink::common::config::ClientConfig;
use lifelink::common::logging::init_logger;
use lifelink::common::models::{ClinicUpdate, RegistrationStatus, Role};
use lifelink::forms::RegistrationForm;
use lifelink::render::{self, EmergencySummary};
use lifelink::session::{DarkMode, SessionStore};

/// Command-line arguments for the client binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the client configuration file (TOML format)
    ///
    /// Example: config/client.toml
    #[arg(short, long, default_value = "config/client.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the issued token
    Login {
        #[arg(long)]
        user_id: String,
        /// doctor, patient or clinic_admin
        #[arg(long)]
        role: Role,
    },
    /// Upload a MyKad image for OCR
    ///
    /// Doctors go straight on to the patient's emergency summary.
    Scan {
        /// doctor, patient (pre-registration scan) or clinic_admin
        #[arg(long)]
        role: Role,
        #[arg(long)]
        image: PathBuf,
    },
    /// Show a patient profile
    Profile {
        #[arg(long)]
        role: Option<Role>,
        /// Defaults to the last national ID looked up
        #[arg(long)]
        nric: Option<String>,
    },
    /// Register the logged-in patient
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        nric: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: String,
        #[arg(long)]
        sex: String,
        #[arg(long)]
        blood_type: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        allergies: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        chronic_conditions: String,
        /// Comma-separated
        #[arg(long, default_value = "")]
        risk_factors: String,
        /// Agree to the data-sharing consent form
        #[arg(long)]
        consent: bool,
    },
    /// Append prescriptions/complaints to a patient (clinic admin)
    Update {
        #[arg(long)]
        nric: String,
        /// JSON file with `prescriptions` and/or `presenting_complaint`
        #[arg(long)]
        payload: PathBuf,
    },
    /// Show the admin access log
    Logs,
    /// Forget the stored session
    Logout,
    /// Show or change the display theme preference
    DarkMode {
        /// on, off or toggle; omit to show the current setting
        value: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    init_logger();

    // Parse command-line arguments
    let args = Args::parse();

    // Load client configuration from TOML file; defaults if it is missing
    let config = if Path::new(&args.config).exists() {
        ClientConfig::from_file(&args.config)
            .with_context(|| format!("failed to load config {}", args.config))?
    } else {
        info!("No config at {}, using defaults", args.config);
        ClientConfig::default()
    };

    let session = SessionStore::open(&config.session.path)
        .with_context(|| format!("failed to open session file {}", config.session.path))?;
    let client = ApiClient::from_config(&config, session.clone());
    info!("🌐 Backend: {}", client.base_url());

    match args.command {
        Command::Login { user_id, role } => {
            if let Some(login) = report(client.login(&user_id, role).await) {
                println!("Logged in as {}", login.role);
            }
        }
        Command::Scan { role, image } => scan(&client, role, &image).await?,
        Command::Profile { role, nric } => {
            let role = role
                .or_else(|| session.role())
                .context("no role given and no one is logged in")?;
            let nric = match nric.or_else(|| session.last_nric()) {
                Some(nric) => nric,
                None => bail!("NRIC not found. Please log in or provide --nric."),
            };
            if let Some(profile) = report(client.get_patient_profile(role, &nric).await) {
                println!("{}", render::profile_text(&profile));
            }
        }
        Command::Register {
            full_name,
            nric,
            birth_date,
            sex,
            blood_type,
            allergies,
            chronic_conditions,
            risk_factors,
            consent,
        } => {
            let form = RegistrationForm {
                full_name,
                nric_number: nric,
                birth_date,
                sex,
                blood_type,
                allergies,
                chronic_conditions,
                risk_factors,
                consent,
            };
            let draft = form.into_draft()?;

            if let Some(result) = report(client.submit_registration(&draft).await) {
                match result.status {
                    RegistrationStatus::Created => println!("Registration Successful: {}", result.message),
                    RegistrationStatus::Exists => println!("Registration Info: {}", result.message),
                }
            }
        }
        Command::Update { nric, payload } => {
            let content = std::fs::read_to_string(&payload)
                .with_context(|| format!("failed to read {}", payload.display()))?;
            let update: ClinicUpdate = serde_json::from_str(&content)
                .with_context(|| format!("{} is not a valid update payload", payload.display()))?;

            if let Some(result) = report(client.update_patient_record(&nric, &update).await) {
                println!("{}: {}", result.status, result.message);
            }
        }
        Command::Logs => {
            let logs = client.list_audit_logs().await;
            if logs.is_empty() {
                println!("No log entries.");
            }
            for row in render::log_rows(&logs) {
                println!("{}", row);
            }
        }
        Command::Logout => {
            client.logout()?;
            println!("Logged out.");
        }
        Command::DarkMode { value } => {
            let current = session.dark_mode();
            let next = match value.as_deref() {
                None => current,
                Some("on") | Some("enabled") => DarkMode::Enabled,
                Some("off") | Some("disabled") => DarkMode::Disabled,
                Some("toggle") => current.toggled(),
                Some(other) => bail!("unknown dark-mode value '{}' (on, off, toggle)", other),
            };
            if next != current {
                session.set_dark_mode(next)?;
            }
            println!("dark-mode: {}", next.as_str());
        }
    }

    Ok(())
}

/// Scan flow per role. Doctors chain straight into the profile lookup.
async fn scan(client: &ApiClient, role: Role, image: &Path) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(image).with_context(|| format!("failed to read {}", image.display()))?;
    let file_name = image
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mykad.jpg".to_string());

    println!("PROCESSING MYKAD...");

    let Some(scan) = report(
        client
            .upload_scan(ScanScope::for_role(role), bytes, &file_name)
            .await,
    ) else {
        return Ok(());
    };

    println!("NRIC: {}", scan.national_id);
    println!("Name: {}", render::format_text(Some(&scan.name)));

    if role != Role::Doctor {
        return Ok(());
    }

    match client.get_patient_profile(role, &scan.national_id).await {
        ApiOutcome::Ok(profile) => {
            println!("{}", EmergencySummary::from_profile(&profile).to_text());
        }
        ApiOutcome::NotFound(_) => {
            println!(
                "Patient with NRIC {} not found in database.",
                scan.national_id
            );
        }
        other => {
            report(other);
        }
    }

    Ok(())
}

/// Prints the notice for a non-value outcome and passes the value through.
fn report<T>(outcome: ApiOutcome<T>) -> Option<T> {
    match outcome {
        ApiOutcome::Ok(value) => Some(value),
        ApiOutcome::NotFound(message) => {
            eprintln!("{}", message);
            None
        }
        ApiOutcome::AuthExpired { redirect } => {
            eprintln!(
                "Unauthorized: Please log in again ({}).",
                redirect.path()
            );
            None
        }
        ApiOutcome::Failed(message) => {
            eprintln!("Error: {}", message);
            None
        }
    }
}
