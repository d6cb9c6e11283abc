//! # API Client
//!
//! [`ApiClient`] turns application intents (log in, upload a MyKad scan,
//! fetch or update a patient record) into HTTP requests against the
//! LifeLink backend.
//!
//! ## Request Workflow
//!
//! 1. **Local checks**: inputs and, for authenticated calls, the bearer token
//!    are validated before anything is sent
//! 2. **Send**: the token is read from the [`SessionStore`] at call time and
//!    attached as `Authorization: Bearer <token>`
//! 3. **Classify**: every non-2xx response goes through one policy
//!    (401 clears the session, 404 is a miss, 422 is a validation failure,
//!    anything else carries the server's detail)
//! 4. **Outcome**: the operation logs what went wrong and returns an
//!    [`ApiOutcome`]; nothing is thrown past the operation boundary
//!
//! There are no retries and no timeouts: a failed call is terminal for that
//! user action.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use lifelink::client::ApiClient;
//! use lifelink::common::models::Role;
//! use lifelink::session::SessionStore;
//!
//! let session = SessionStore::open("user-data/session.json")?;
//! let client = ApiClient::new("http://127.0.0.1:8000", session);
//!
//! client.login("1001", Role::Doctor).await;
//! if let ApiOutcome::Ok(profile) = client.get_patient_profile(Role::Doctor, "990101-01-1234").await {
//!     println!("{}", render::profile_text(&profile));
//! }
//! ```

use log::{error, info, warn};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::client::outcome::ApiOutcome;
use crate::client::routes::{self, ScanScope};
use crate::common::config::ClientConfig;
use crate::common::error::{ApiError, ApiResult, EntryPoint};
use crate::common::models::{
    ClinicUpdate, LogEntry, LoginRequest, LoginResponse, PatientProfile, RegistrationDraft,
    RegistrationResponse, Role, ScanResult, UpdateResponse,
};
use crate::session::SessionStore;

/// Authenticated client for the LifeLink backend.
///
/// Holds no session state of its own: the token is looked up in the shared
/// [`SessionStore`] on every call.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
        }
    }

    pub fn from_config(config: &ClientConfig, session: SessionStore) -> Self {
        Self::new(config.base_url(), session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    // ========================================================================
    // OPERATIONS
    // ========================================================================

    /// Logs in and, on success, starts a persisted session for the returned role.
    pub async fn login(&self, user_id: &str, role: Role) -> ApiOutcome<LoginResponse> {
        let result = self.try_login(user_id, role).await;
        self.finish("Login", result)
    }

    /// Uploads a MyKad image for OCR.
    ///
    /// The image is sent as the single `file` part of a multipart body. The
    /// content type, boundary included, is left to the transport.
    pub async fn upload_scan(
        &self,
        scope: ScanScope,
        image: Vec<u8>,
        file_name: &str,
    ) -> ApiOutcome<ScanResult> {
        let result = self.try_upload_scan(scope, image, file_name).await;
        self.finish("MyKad Scan", result)
    }

    /// Fetches a patient profile through the endpoint family of `role`.
    ///
    /// Clinic admins receive the limited view: only demographics,
    /// prescriptions and complaints are filled in.
    pub async fn get_patient_profile(&self, role: Role, nric: &str) -> ApiOutcome<PatientProfile> {
        let result = self.try_get_patient_profile(role, nric).await;
        self.finish("Get Patient Profile", result)
    }

    pub async fn submit_registration(
        &self,
        draft: &RegistrationDraft,
    ) -> ApiOutcome<RegistrationResponse> {
        let result = self.try_submit_registration(draft).await;
        self.finish("Patient Registration", result)
    }

    /// Appends prescriptions and/or presenting complaints to a patient record.
    pub async fn update_patient_record(
        &self,
        nric: &str,
        update: &ClinicUpdate,
    ) -> ApiOutcome<UpdateResponse> {
        let result = self.try_update_patient_record(nric, update).await;
        self.finish("Update Patient Records", result)
    }

    /// Lists the admin access log.
    ///
    /// Any failure, including a backend without the endpoint, yields an
    /// empty list.
    pub async fn list_audit_logs(&self) -> Vec<LogEntry> {
        match self.try_list_audit_logs().await {
            Ok(logs) => logs,
            Err(e) => {
                warn!("⚠️  Audit logs unavailable: {}", e);
                Vec::new()
            }
        }
    }

    /// Ends the current session locally.
    pub fn logout(&self) -> std::io::Result<()> {
        info!("👋 Logging out");
        self.session.invalidate()
    }

    // ========================================================================
    // REQUEST BUILDING
    // ========================================================================

    async fn try_login(&self, user_id: &str, role: Role) -> ApiResult<LoginResponse> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(ApiError::precondition("user_id is required"));
        }

        info!("🔑 Logging in user {} as {}", user_id, role);

        let body = LoginRequest {
            user_id: user_id.to_string(),
            role,
        };
        let request = self
            .http
            .post(self.url(routes::LOGIN))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&body);

        let response = self.execute(request, "Login").await?;
        let login: LoginResponse = read_json(response).await?;

        self.session.begin(&login.access_token, login.role)?;
        info!("✅ Logged in as {}", login.role);

        Ok(login)
    }

    async fn try_upload_scan(
        &self,
        scope: ScanScope,
        image: Vec<u8>,
        file_name: &str,
    ) -> ApiResult<ScanResult> {
        let token = if scope.requires_auth() {
            Some(self.bearer_token()?)
        } else {
            None
        };

        if image.is_empty() {
            return Err(ApiError::precondition("No file selected"));
        }
        let mime = image_mime_type(&image)
            .ok_or_else(|| ApiError::precondition("Please select an image file"))?;

        info!(
            "📤 Uploading {} ({} bytes) to {}",
            file_name,
            image.len(),
            scope.path()
        );

        let part = Part::bytes(image)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part("file", part);

        let mut request = self.http.post(self.url(scope.path())).multipart(form);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = self.execute(request, "MyKad Scan").await?;
        let scan: ScanResult = read_json(response).await?;
        if !scan.has_national_id() {
            return Err(ApiError::precondition(
                "Could not extract NRIC from MyKad image",
            ));
        }

        info!("✅ OCR read national ID {}", scan.national_id);
        Ok(scan)
    }

    async fn try_get_patient_profile(&self, role: Role, nric: &str) -> ApiResult<PatientProfile> {
        let nric = required_nric(nric)?;
        let token = self.bearer_token()?;

        info!("📥 Fetching profile {} as {}", nric, role);

        let request = self
            .http
            .get(self.url(routes::profile_path(role)))
            .query(&[("nric", nric)])
            .bearer_auth(token);

        let response = self.execute(request, "Get Patient Profile").await?;
        let profile: PatientProfile = read_json(response).await?;

        self.session.remember_nric(nric)?;
        Ok(profile)
    }

    async fn try_submit_registration(
        &self,
        draft: &RegistrationDraft,
    ) -> ApiResult<RegistrationResponse> {
        let token = self.bearer_token()?;

        info!("📤 Submitting registration for {}", draft.nric_number);

        let request = self
            .http
            .post(self.url(routes::PATIENT_CONFIRMATION))
            .bearer_auth(token)
            .json(draft);

        let response = self.execute(request, "Patient Registration").await?;
        read_json(response).await
    }

    async fn try_update_patient_record(
        &self,
        nric: &str,
        update: &ClinicUpdate,
    ) -> ApiResult<UpdateResponse> {
        let nric = required_nric(nric)?;
        let token = self.bearer_token()?;

        info!("📤 Updating records for {}", nric);

        let request = self
            .http
            .post(self.url(routes::CLINIC_UPDATE))
            .query(&[("nric", nric)])
            .bearer_auth(token)
            .json(update);

        let response = self.execute(request, "Update Patient Records").await?;
        read_json(response).await
    }

    async fn try_list_audit_logs(&self) -> ApiResult<Vec<LogEntry>> {
        let token = self.bearer_token()?;

        let request = self
            .http
            .get(self.url(routes::AUDIT_LOGS))
            .bearer_auth(token);

        let response = self.execute(request, "Admin Logs").await?;
        read_json(response).await
    }

    // ========================================================================
    // TRANSPORT AND CLASSIFICATION
    // ========================================================================

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer_token(&self) -> ApiResult<String> {
        self.session
            .access_token()
            .ok_or_else(|| ApiError::precondition("No authentication token found"))
    }

    /// Sends the request and applies the error classification policy.
    async fn execute(&self, request: RequestBuilder, context: &str) -> ApiResult<Response> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.classify(response, context).await
    }

    fn transport_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_connect() {
            ApiError::NetworkUnreachable {
                base_url: self.base_url.clone(),
            }
        } else {
            ApiError::Transport(err)
        }
    }

    async fn classify(&self, response: Response, context: &str) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let reason = status.canonical_reason().unwrap_or("Unknown Status");

        match status {
            StatusCode::UNAUTHORIZED => {
                let redirect = EntryPoint::for_role(self.session.role());
                if let Err(e) = self.session.invalidate() {
                    warn!("⚠️  {}: could not clear stored session: {}", context, e);
                }
                warn!(
                    "🔒 {}: session expired, cleared stored credentials (login at {})",
                    context,
                    redirect.path()
                );
                Err(ApiError::SessionExpired { redirect })
            }
            StatusCode::NOT_FOUND => {
                let detail = error_body(response)
                    .await
                    .and_then(|body| detail_text(&body))
                    .unwrap_or_else(|| context.to_string());
                Err(ApiError::NotFound { detail })
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let detail = match error_body(response).await {
                    Some(body) => validation_detail(&body),
                    None => "Validation error".to_string(),
                };
                error!("❌ {} validation error: {}", context, detail);
                Err(ApiError::ValidationFailed { detail })
            }
            _ => {
                let message = match error_body(response).await {
                    Some(body) => detail_text(&body)
                        .unwrap_or_else(|| format!("{} failed: {}", context, reason)),
                    None => reason.to_string(),
                };
                Err(ApiError::Server { message })
            }
        }
    }

    /// Operation boundary: log the failure, hand back an outcome.
    fn finish<T>(&self, context: &str, result: ApiResult<T>) -> ApiOutcome<T> {
        match &result {
            Ok(_) => {}
            Err(ApiError::SessionExpired { .. }) => {}
            Err(e @ ApiError::NotFound { .. }) => warn!("{}: {}", context, e),
            Err(e) => error!("❌ API Error ({}): {}", context, e),
        }
        result.into()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn required_nric(nric: &str) -> ApiResult<&str> {
    let nric = nric.trim();
    if nric.is_empty() {
        return Err(ApiError::precondition("NRIC is required"));
    }
    Ok(nric)
}

/// MIME type of an uploadable image, or `None` when the bytes are not one.
///
/// Only formats with a registered `image/*` type are accepted; the backend
/// rejects anything else.
fn image_mime_type(bytes: &[u8]) -> Option<&'static str> {
    use image::ImageFormat;

    match image::guess_format(bytes).ok()? {
        ImageFormat::Png => Some("image/png"),
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Gif => Some("image/gif"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Tiff => Some("image/tiff"),
        ImageFormat::Bmp => Some("image/bmp"),
        ImageFormat::Avif => Some("image/avif"),
        _ => None,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Error body as JSON, or `None` if it is empty or not JSON.
async fn error_body(response: Response) -> Option<Value> {
    let bytes = response.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// The `detail` field of an error body, when it carries anything.
fn detail_text(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Flattens a 422 body into one message.
///
/// `{"detail": [{"loc": ["body", "nric"], "msg": "field required"}, ...]}`
/// becomes `"body.nric: field required, ..."`, in array order.
fn validation_detail(body: &Value) -> String {
    match body.get("detail") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|entry| {
                let location = match entry.get("loc") {
                    Some(Value::Array(parts)) => parts
                        .iter()
                        .map(|part| match part {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join("."),
                    Some(Value::String(s)) => s.clone(),
                    _ => String::new(),
                };
                let message = entry.get("msg").and_then(Value::as_str).unwrap_or_default();
                format!("{}: {}", location, message)
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        _ => "Validation error".to_string(),
    }
}
