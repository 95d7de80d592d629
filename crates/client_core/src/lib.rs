use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client};
use shared::{
    domain::{
        AnnouncementData, AttendanceData, AttendanceId, AttendanceLog, CompanyId, DocumentData,
        DocumentType, EmployeeStatusData, Holiday, PostedReviewData, RequestData, RequestType,
        Review, StatusEntry, TeamMember, UserData, UserId, UserProfileData, UserSession,
        WorkReportData,
    },
    error::{ApiException, EnvelopeError},
    protocol::{ApiEnvelope, ApiRequest, Script},
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

pub mod filters;
pub mod forms;
pub mod session;
pub mod status_board;

pub use session::{RedirectReason, SessionManager, SessionState};

use forms::{
    CheckLocation, NewDocument, NewRequest, NewReview, NewWorkReport, PasswordChange, ReportRange,
    WorkdayMood,
};
use status_board::StatusChange;

pub const DEFAULT_API_BASE_URL: &str = "https://localhost:8080/apis/root/";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The catch-all text users see for anything that is not a server message.
pub const GENERIC_FAILURE: &str = "Something went wrong";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{}", GENERIC_FAILURE)]
    Transport(#[source] reqwest::Error),
    #[error("{}", GENERIC_FAILURE)]
    Decode {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Api(#[from] ApiException),
    #[error("`{action}` succeeded but returned no data")]
    MissingData {
        action: &'static str,
        message: String,
    },
    #[error("{0}")]
    Validation(String),
    #[error("not signed in")]
    NotLoggedIn,
    #[error("invalid API base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
    #[error("credential cache failure: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl ClientError {
    /// Whether the server rejected the caller's token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(api) if api.is_unauthorized())
    }

    /// Whether the request never produced a readable envelope.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Decode { .. })
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(value: EnvelopeError) -> Self {
        match value {
            EnvelopeError::Api(api) => Self::Api(api),
            EnvelopeError::MissingData { action, message } => {
                Self::MissingData { action, message }
            }
            EnvelopeError::Decode { action, source } => Self::Decode { action, source },
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The signed-in user as read from the credential cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    user: UserData,
}

impl Credentials {
    /// `None` when the cached record lacks an id or a token.
    pub fn from_user(user: UserData) -> Option<Self> {
        if user.id.0 <= 0 || user.token.trim().is_empty() {
            return None;
        }
        Some(Self { user })
    }

    pub fn user(&self) -> &UserData {
        &self.user
    }

    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    pub fn company_id(&self) -> CompanyId {
        self.user.cid
    }

    pub fn token(&self) -> &str {
        &self.user.token
    }

    pub fn work_station(&self) -> &str {
        self.user.work_station.as_deref().unwrap_or_default()
    }
}

/// Thin wrapper over the two PHP scripts. One method per action; no retries,
/// no caching, no request coordination.
#[derive(Debug, Clone)]
pub struct EmployeeClient {
    http: Client,
    base_url: Url,
}

impl EmployeeClient {
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, script: Script) -> ClientResult<Url> {
        Ok(self.base_url.join(script.file_name())?)
    }

    /// POSTs one action and returns the raw envelope, whatever its code.
    pub async fn send(&self, request: &ApiRequest, token: Option<&str>) -> ClientResult<ApiEnvelope> {
        let action = request.action();
        let url = self.endpoint(request.script())?;
        debug!(action, %url, "dispatching action");

        let mut builder = self.http.post(url).json(request);
        if request.requires_token() {
            if let Some(token) = token {
                builder = builder.header(AUTHORIZATION, token);
            }
        }

        let response = builder.send().await.map_err(|err| {
            warn!(action, "request failed: {err}");
            ClientError::Transport(err)
        })?;
        let http_status = response.status();
        let body = response.bytes().await.map_err(ClientError::Transport)?;
        let envelope: ApiEnvelope = serde_json::from_slice(&body).map_err(|source| {
            warn!(action, %http_status, "unreadable response body: {source}");
            ClientError::Decode { action, source }
        })?;

        if !envelope.is_success() {
            warn!(
                action,
                code = envelope.code,
                "action rejected: {}",
                envelope.message
            );
        }
        Ok(envelope)
    }

    async fn call(&self, request: ApiRequest, credentials: &Credentials) -> ClientResult<ApiEnvelope> {
        self.send(&request, Some(credentials.token())).await
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> ClientResult<Vec<T>> {
        let action = request.action();
        Ok(self.call(request, credentials).await?.into_list(action)?)
    }

    async fn record<T: serde::de::DeserializeOwned>(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> ClientResult<T> {
        let action = request.action();
        Ok(self.call(request, credentials).await?.into_record(action)?)
    }

    async fn ack(&self, request: ApiRequest, credentials: &Credentials) -> ClientResult<String> {
        Ok(self.call(request, credentials).await?.into_ack()?)
    }

    async fn created(
        &self,
        request: ApiRequest,
        credentials: &Credentials,
    ) -> ClientResult<Option<String>> {
        Ok(self.call(request, credentials).await?.into_text()?)
    }

    // Account

    pub async fn password_login(&self, mobile: &str, password: &str) -> ClientResult<UserData> {
        let request = ApiRequest::PasswordLogin {
            mobile: mobile.to_string(),
            password: password.to_string(),
        };
        let action = request.action();
        Ok(self.send(&request, None).await?.into_record(action)?)
    }

    /// Returns the mobile number the server echoes back for a registered
    /// user, if any.
    pub async fn check_user(&self, mobile: &str) -> ClientResult<Option<String>> {
        let request = ApiRequest::CheckUser {
            mobile: mobile.to_string(),
        };
        Ok(self.send(&request, None).await?.into_text()?)
    }

    pub async fn otp_login(&self, mobile: &str, otp: &str) -> ClientResult<UserData> {
        let request = ApiRequest::OtpLogin {
            mobile: mobile.to_string(),
            otp: otp.to_string(),
        };
        let action = request.action();
        Ok(self.send(&request, None).await?.into_record(action)?)
    }

    pub async fn user_session(&self, credentials: &Credentials) -> ClientResult<UserSession> {
        self.record(
            ApiRequest::UserSession {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    /// Asks the server whether the token is still live. Only `code` is
    /// looked at; the session record itself is not needed.
    pub async fn check_session(&self, credentials: &Credentials) -> ClientResult<()> {
        let envelope = self
            .call(
                ApiRequest::UserSession {
                    user_id: credentials.user_id(),
                },
                credentials,
            )
            .await?;
        envelope.ensure_success()?;
        Ok(())
    }

    pub async fn user_profile(&self, credentials: &Credentials) -> ClientResult<UserProfileData> {
        self.record(
            ApiRequest::UserProfile {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    /// `true` when the server confirmed the token was revoked.
    pub async fn logout(&self, credentials: &Credentials) -> ClientResult<bool> {
        let request = ApiRequest::Logout {
            user_id: credentials.user_id(),
            token: credentials.token().to_string(),
        };
        Ok(self.call(request, credentials).await?.into_flag()?)
    }

    pub async fn update_profile_pic(
        &self,
        credentials: &Credentials,
        image_base64: String,
    ) -> ClientResult<String> {
        if image_base64.trim().is_empty() {
            return Err(ClientError::Validation("Please pick an image.".into()));
        }
        self.ack(
            ApiRequest::AddProfilePic {
                user_id: credentials.user_id(),
                profile_file: image_base64,
            },
            credentials,
        )
        .await
    }

    pub async fn change_password(
        &self,
        credentials: &Credentials,
        change: PasswordChange,
    ) -> ClientResult<String> {
        self.ack(
            ApiRequest::ChangePassword {
                user_id: credentials.user_id(),
                old_password: change.old_password,
                new_password: change.new_password,
            },
            credentials,
        )
        .await
    }

    // Documents

    pub async fn document_types(&self, credentials: &Credentials) -> ClientResult<Vec<DocumentType>> {
        self.list(
            ApiRequest::DocumentType {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn documents(&self, credentials: &Credentials) -> ClientResult<Vec<DocumentData>> {
        self.list(
            ApiRequest::DocumentList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn add_document(
        &self,
        credentials: &Credentials,
        document: NewDocument,
    ) -> ClientResult<Option<String>> {
        self.created(
            ApiRequest::AddDocument {
                company_id: credentials.company_id(),
                user_id: credentials.user_id(),
                document_type: document.document_type,
                document_number: document.document_number,
                added_by: credentials.user_id(),
                document_file: document.file_base64,
            },
            credentials,
        )
        .await
    }

    // Announcements and holidays

    pub async fn announcements(
        &self,
        credentials: &Credentials,
    ) -> ClientResult<Vec<AnnouncementData>> {
        self.list(
            ApiRequest::AnnouncementList {
                company_id: credentials.company_id(),
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn holidays(&self, credentials: &Credentials) -> ClientResult<Vec<Holiday>> {
        self.list(
            ApiRequest::HolidayList {
                user_id: credentials.user_id(),
                company_id: credentials.company_id(),
                work_station: credentials.work_station().to_string(),
            },
            credentials,
        )
        .await
    }

    // Attendance

    pub async fn current_month_attendance(
        &self,
        credentials: &Credentials,
    ) -> ClientResult<Vec<AttendanceData>> {
        self.list(
            ApiRequest::CurrentMonthAttendance {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn attendance_report(
        &self,
        credentials: &Credentials,
        range: ReportRange,
    ) -> ClientResult<Vec<AttendanceData>> {
        self.list(
            ApiRequest::AttendanceReport {
                user_id: credentials.user_id(),
                start_date: range.start,
                end_date: range.end,
            },
            credentials,
        )
        .await
    }

    pub async fn attendance_log(
        &self,
        credentials: &Credentials,
        attendance_id: AttendanceId,
    ) -> ClientResult<Vec<AttendanceLog>> {
        self.list(
            ApiRequest::AttendanceLog {
                user_id: credentials.user_id(),
                attendance_id,
            },
            credentials,
        )
        .await
    }

    pub async fn check_in(
        &self,
        credentials: &Credentials,
        location: CheckLocation,
    ) -> ClientResult<String> {
        self.ack(
            ApiRequest::Checkin {
                user_id: credentials.user_id(),
                company_id: credentials.company_id(),
                address: location.address,
                lat_long: location.lat_long,
            },
            credentials,
        )
        .await
    }

    pub async fn check_out(
        &self,
        credentials: &Credentials,
        attendance_id: AttendanceId,
        location: CheckLocation,
        mood: WorkdayMood,
    ) -> ClientResult<String> {
        self.ack(
            ApiRequest::Checkout {
                user_id: credentials.user_id(),
                company_id: credentials.company_id(),
                attendance_id,
                address: location.address,
                lat_long: location.lat_long,
                h_index: mood.index(),
            },
            credentials,
        )
        .await
    }

    // Work reports

    pub async fn work_reports(&self, credentials: &Credentials) -> ClientResult<Vec<WorkReportData>> {
        self.list(
            ApiRequest::WorkList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn add_work_report(
        &self,
        credentials: &Credentials,
        report: NewWorkReport,
    ) -> ClientResult<Option<String>> {
        self.created(
            ApiRequest::AddWork {
                company_id: credentials.company_id(),
                user_id: credentials.user_id(),
                work_date: report.date,
                work_desc: report.description,
            },
            credentials,
        )
        .await
    }

    // Reviews and team

    pub async fn reviews(&self, credentials: &Credentials) -> ClientResult<Vec<Review>> {
        self.list(
            ApiRequest::ReviewList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn posted_reviews(
        &self,
        credentials: &Credentials,
    ) -> ClientResult<Vec<PostedReviewData>> {
        self.list(
            ApiRequest::PostedReviewList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn add_review(
        &self,
        credentials: &Credentials,
        review: NewReview,
    ) -> ClientResult<Option<String>> {
        self.created(
            ApiRequest::AddReview {
                company_id: credentials.company_id(),
                ru_id: review.member,
                ru_rating: review.rating,
                ru_remark: review.remark,
                added_by: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn team(&self, credentials: &Credentials) -> ClientResult<Vec<TeamMember>> {
        self.list(
            ApiRequest::TeamList {
                company_id: credentials.company_id(),
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    // Requests

    pub async fn requests(&self, credentials: &Credentials) -> ClientResult<Vec<RequestData>> {
        self.list(
            ApiRequest::RequestList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn request_types(&self, credentials: &Credentials) -> ClientResult<Vec<RequestType>> {
        self.list(
            ApiRequest::RequestTypeList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn add_request(
        &self,
        credentials: &Credentials,
        request: NewRequest,
    ) -> ClientResult<Option<String>> {
        self.created(
            ApiRequest::AddRequest {
                company_id: credentials.company_id(),
                user_id: credentials.user_id(),
                request_date: request.date,
                request_type: request.request_type,
                request_title: request.title,
                request_desc: request.description,
            },
            credentials,
        )
        .await
    }

    // Working status

    pub async fn today_status(&self, credentials: &Credentials) -> ClientResult<EmployeeStatusData> {
        self.record(
            ApiRequest::TodayStatus {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn status_list(&self, credentials: &Credentials) -> ClientResult<Vec<StatusEntry>> {
        self.list(
            ApiRequest::StatusList {
                user_id: credentials.user_id(),
            },
            credentials,
        )
        .await
    }

    pub async fn add_working_status(
        &self,
        credentials: &Credentials,
        change: &StatusChange,
    ) -> ClientResult<()> {
        let envelope = self
            .call(
                ApiRequest::AddWorkingStatus {
                    company_id: credentials.company_id(),
                    user_id: credentials.user_id(),
                    working_status: change.working_status.clone(),
                    break_status: change.break_status.clone(),
                },
                credentials,
            )
            .await?;
        envelope.ensure_success()?;
        Ok(())
    }
}

/// `Url::join` drops the last path segment unless it ends in a slash.
fn normalize_base_url(raw: &str) -> Result<Url, url::ParseError> {
    let raw = raw.trim();
    if raw.ends_with('/') {
        Url::parse(raw)
    } else {
        Url::parse(&format!("{raw}/"))
    }
}

#[cfg(test)]
#[path = "tests/mock_backend.rs"]
mod mock_backend;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod session_tests;
