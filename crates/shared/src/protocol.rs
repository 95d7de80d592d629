use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::{
    domain::{AttendanceId, CompanyId, UserId},
    error::{ApiException, EnvelopeError, SUCCESS_CODE},
    wire,
};

/// The two scripts behind the shared base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    /// Account-level actions: login, profile, documents, passwords.
    Common,
    /// Employee data: attendance, reports, reviews, requests, status.
    Employee,
}

impl Script {
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Common => "common.php",
            Self::Employee => "employee.php",
        }
    }
}

/// Every request body the backend understands. The variant name becomes the
/// `action` discriminator; the fields are sent alongside it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ApiRequest {
    PasswordLogin {
        mobile: String,
        password: String,
    },
    CheckUser {
        mobile: String,
    },
    OtpLogin {
        mobile: String,
        otp: String,
    },
    UserSession {
        user_id: UserId,
    },
    UserProfile {
        user_id: UserId,
    },
    Logout {
        user_id: UserId,
        token: String,
    },
    AddProfilePic {
        user_id: UserId,
        profile_file: String,
    },
    ChangePassword {
        user_id: UserId,
        old_password: String,
        new_password: String,
    },
    AddDocument {
        company_id: CompanyId,
        user_id: UserId,
        document_type: String,
        document_number: String,
        added_by: UserId,
        document_file: String,
    },
    DocumentType {
        user_id: UserId,
    },
    DocumentList {
        user_id: UserId,
    },
    AnnouncementList {
        company_id: CompanyId,
        user_id: UserId,
    },
    CurrentMonthAttendance {
        user_id: UserId,
    },
    AttendanceReport {
        user_id: UserId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
    AttendanceLog {
        user_id: UserId,
        attendance_id: AttendanceId,
    },
    Checkin {
        user_id: UserId,
        company_id: CompanyId,
        address: String,
        lat_long: String,
    },
    Checkout {
        user_id: UserId,
        company_id: CompanyId,
        attendance_id: AttendanceId,
        address: String,
        lat_long: String,
        h_index: u8,
    },
    WorkList {
        user_id: UserId,
    },
    AddWork {
        company_id: CompanyId,
        user_id: UserId,
        work_date: NaiveDate,
        work_desc: String,
    },
    HolidayList {
        user_id: UserId,
        company_id: CompanyId,
        work_station: String,
    },
    ReviewList {
        user_id: UserId,
    },
    PostedReviewList {
        user_id: UserId,
    },
    AddReview {
        company_id: CompanyId,
        ru_id: UserId,
        ru_rating: u8,
        ru_remark: String,
        added_by: UserId,
    },
    RequestList {
        user_id: UserId,
    },
    RequestTypeList {
        user_id: UserId,
    },
    AddRequest {
        company_id: CompanyId,
        user_id: UserId,
        request_date: NaiveDate,
        request_type: String,
        request_title: String,
        request_desc: String,
    },
    TodayStatus {
        user_id: UserId,
    },
    StatusList {
        user_id: UserId,
    },
    AddWorkingStatus {
        company_id: CompanyId,
        user_id: UserId,
        working_status: String,
        #[serde(rename = "break")]
        break_status: String,
    },
    TeamList {
        company_id: CompanyId,
        user_id: UserId,
    },
}

impl ApiRequest {
    /// The wire value of the `action` field.
    pub fn action(&self) -> &'static str {
        match self {
            Self::PasswordLogin { .. } => "passwordLogin",
            Self::CheckUser { .. } => "checkUser",
            Self::OtpLogin { .. } => "otpLogin",
            Self::UserSession { .. } => "userSession",
            Self::UserProfile { .. } => "userProfile",
            Self::Logout { .. } => "logout",
            Self::AddProfilePic { .. } => "addProfilePic",
            Self::ChangePassword { .. } => "changePassword",
            Self::AddDocument { .. } => "addDocument",
            Self::DocumentType { .. } => "documentType",
            Self::DocumentList { .. } => "documentList",
            Self::AnnouncementList { .. } => "announcementList",
            Self::CurrentMonthAttendance { .. } => "currentMonthAttendance",
            Self::AttendanceReport { .. } => "attendanceReport",
            Self::AttendanceLog { .. } => "attendanceLog",
            Self::Checkin { .. } => "checkin",
            Self::Checkout { .. } => "checkout",
            Self::WorkList { .. } => "workList",
            Self::AddWork { .. } => "addWork",
            Self::HolidayList { .. } => "holidayList",
            Self::ReviewList { .. } => "reviewList",
            Self::PostedReviewList { .. } => "postedReviewList",
            Self::AddReview { .. } => "addReview",
            Self::RequestList { .. } => "requestList",
            Self::RequestTypeList { .. } => "requestTypeList",
            Self::AddRequest { .. } => "addRequest",
            Self::TodayStatus { .. } => "todayStatus",
            Self::StatusList { .. } => "statusList",
            Self::AddWorkingStatus { .. } => "addWorkingStatus",
            Self::TeamList { .. } => "teamList",
        }
    }

    pub fn script(&self) -> Script {
        match self {
            Self::PasswordLogin { .. }
            | Self::CheckUser { .. }
            | Self::OtpLogin { .. }
            | Self::UserSession { .. }
            | Self::UserProfile { .. }
            | Self::Logout { .. }
            | Self::AddProfilePic { .. }
            | Self::ChangePassword { .. }
            | Self::AddDocument { .. }
            | Self::DocumentType { .. } => Script::Common,
            _ => Script::Employee,
        }
    }

    /// Pre-login actions go out without an `Authorization` header.
    pub fn requires_token(&self) -> bool {
        !matches!(
            self,
            Self::PasswordLogin { .. } | Self::CheckUser { .. } | Self::OtpLogin { .. }
        )
    }
}

/// The `{code, message, data}` wrapper around every response.
///
/// `data` stays untyped until `code` has been checked: failed responses often
/// carry `""` or `false` where a list would be, and that must not turn an API
/// error into a decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(deserialize_with = "wire::int")]
    pub code: i64,
    #[serde(default, deserialize_with = "wire::text")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    pub fn ensure_success(&self) -> Result<(), ApiException> {
        if self.is_success() {
            Ok(())
        } else {
            Err(ApiException::new(self.code, self.message.clone()))
        }
    }

    fn payload(self) -> Result<Option<Value>, ApiException> {
        self.ensure_success()?;
        Ok(self.data.filter(is_present))
    }

    /// A single record. A 200 without one is an error that keeps the
    /// server message.
    pub fn into_record<T: DeserializeOwned>(
        self,
        action: &'static str,
    ) -> Result<T, EnvelopeError> {
        self.ensure_success()?;
        let Some(value) = self.data.filter(is_present) else {
            return Err(EnvelopeError::MissingData {
                action,
                message: self.message,
            });
        };
        serde_json::from_value(value).map_err(|source| EnvelopeError::Decode { action, source })
    }

    /// A list. A 200 without data is an empty list; a non-200 is never a list.
    pub fn into_list<T: DeserializeOwned>(
        self,
        action: &'static str,
    ) -> Result<Vec<T>, EnvelopeError> {
        match self.payload()? {
            None => Ok(Vec::new()),
            Some(Value::String(s)) if s.is_empty() => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|source| EnvelopeError::Decode { action, source }),
        }
    }

    /// Scalar text payload, e.g. the id of a newly created record or an
    /// echoed mobile number.
    pub fn into_text(self) -> Result<Option<String>, EnvelopeError> {
        Ok(match self.payload()? {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Boolean payload, tolerant of `1`/`"1"`.
    pub fn into_flag(self) -> Result<bool, EnvelopeError> {
        Ok(match self.payload()? {
            Some(Value::Bool(b)) => b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
            _ => false,
        })
    }

    /// Success without a meaningful payload; yields the server message.
    pub fn into_ack(self) -> Result<String, EnvelopeError> {
        self.ensure_success()?;
        Ok(self.message)
    }
}

/// `null`, `false`, `""` and `0` all mean "no data".
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
