//! Presence checks run before a form is submitted. Each draft validates into
//! the payload type the matching `EmployeeClient` call accepts.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use shared::domain::UserId;

use crate::ClientError;

pub const MOBILE_DIGITS: usize = 10;
pub const OTP_DIGITS: usize = 4;
pub const MIN_PASSWORD_LEN: usize = 4;

const ALL_FIELDS_REQUIRED: &str = "Please fill in all fields.";

fn invalid(message: impl Into<String>) -> ClientError {
    ClientError::Validation(message.into())
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Keeps only ASCII digits, the way the mobile field filters keystrokes.
pub fn sanitize_mobile(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn validate_mobile(mobile: &str) -> Result<(), ClientError> {
    if mobile.is_empty() {
        return Err(invalid("Enter the number"));
    }
    if mobile.len() != MOBILE_DIGITS || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Please enter a valid 10-digit phone number."));
    }
    Ok(())
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub mobile: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(mobile: &str, password: impl Into<String>) -> Self {
        Self {
            mobile: sanitize_mobile(mobile),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.mobile.is_empty() && self.password.is_empty() {
            return Err(invalid("All fields are required"));
        }
        if self.mobile.len() != MOBILE_DIGITS {
            return Err(invalid("Enter a 10 digit contact number"));
        }
        if self.password.is_empty() {
            return Err(invalid("Enter password"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("Password must be at least 4 characters"));
        }
        Ok(())
    }
}

pub fn validate_otp(otp: &str) -> Result<(), ClientError> {
    if otp.len() != OTP_DIGITS || !otp.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("Enter the 4-digit OTP"));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
}

impl PasswordChange {
    pub fn new(old_password: &str, new_password: &str) -> Result<Self, ClientError> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(invalid(ALL_FIELDS_REQUIRED));
        }
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(invalid("Password must be at least 4 characters"));
        }
        if old_password == new_password {
            return Err(invalid(
                "New password must be different from the old password",
            ));
        }
        Ok(Self {
            old_password: old_password.to_string(),
            new_password: new_password.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkReportDraft {
    pub date: Option<NaiveDate>,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkReport {
    pub date: NaiveDate,
    pub description: String,
}

impl WorkReportDraft {
    pub fn validate(self) -> Result<NewWorkReport, ClientError> {
        match self.date {
            Some(date) if !blank(&self.description) => Ok(NewWorkReport {
                date,
                description: self.description.trim().to_string(),
            }),
            _ => Err(invalid(ALL_FIELDS_REQUIRED)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestDraft {
    pub date: Option<NaiveDate>,
    pub request_type: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequest {
    pub date: NaiveDate,
    pub request_type: String,
    pub title: String,
    pub description: String,
}

impl RequestDraft {
    pub fn validate(self) -> Result<NewRequest, ClientError> {
        let Some(date) = self.date else {
            return Err(invalid(ALL_FIELDS_REQUIRED));
        };
        if blank(&self.request_type) || blank(&self.title) || blank(&self.description) {
            return Err(invalid(ALL_FIELDS_REQUIRED));
        }
        Ok(NewRequest {
            date,
            request_type: self.request_type.trim().to_string(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct DocumentDraft {
    pub document_type: String,
    pub document_number: String,
    /// Base64 of the picked file, without a data-URI prefix.
    pub file_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub document_type: String,
    pub document_number: String,
    pub file_base64: String,
}

impl DocumentDraft {
    pub fn with_file_bytes(
        document_type: impl Into<String>,
        document_number: impl Into<String>,
        bytes: &[u8],
    ) -> Self {
        Self {
            document_type: document_type.into(),
            document_number: document_number.into(),
            file_base64: encode_upload(bytes),
        }
    }

    pub fn validate(self) -> Result<NewDocument, ClientError> {
        if blank(&self.document_type) || blank(&self.document_number) || blank(&self.file_base64)
        {
            return Err(invalid(ALL_FIELDS_REQUIRED));
        }
        Ok(NewDocument {
            document_type: self.document_type.trim().to_string(),
            document_number: self.document_number.trim().to_string(),
            file_base64: self.file_base64,
        })
    }
}

/// Uploads travel as plain standard base64 inside the JSON body.
pub fn encode_upload(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return String::new();
    }
    STANDARD.encode(bytes)
}

#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub member: Option<UserId>,
    pub rating: u8,
    pub remark: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub member: UserId,
    pub rating: u8,
    pub remark: String,
}

impl ReviewDraft {
    pub fn validate(self) -> Result<NewReview, ClientError> {
        let Some(member) = self.member else {
            return Err(invalid("Please select a team member"));
        };
        if !(1..=5).contains(&self.rating) {
            return Err(invalid("Please rate the team member"));
        }
        if blank(&self.remark) {
            return Err(invalid("Please write a review"));
        }
        Ok(NewReview {
            member,
            rating: self.rating,
            remark: self.remark.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Wire format for `lat_long`.
    pub fn to_lat_long(self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Where a check-in or check-out happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckLocation {
    pub address: String,
    pub lat_long: String,
}

impl CheckLocation {
    pub fn new(coordinates: Option<Coordinates>, address: Option<&str>) -> Result<Self, ClientError> {
        match (coordinates, address.map(str::trim)) {
            (Some(coordinates), Some(address)) if !address.is_empty() => Ok(Self {
                address: address.to_string(),
                lat_long: coordinates.to_lat_long(),
            }),
            _ => Err(invalid("Location and address are required.")),
        }
    }
}

/// How the day went, sent as `h_index` on checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkdayMood {
    Exhausting = 1,
    Tiring = 2,
    Okay = 3,
    Good = 4,
    #[default]
    Great = 5,
}

impl WorkdayMood {
    pub fn from_index(index: u8) -> Result<Self, ClientError> {
        Ok(match index {
            1 => Self::Exhausting,
            2 => Self::Tiring,
            3 => Self::Okay,
            4 => Self::Good,
            5 => Self::Great,
            _ => return Err(invalid("Workday rating must be between 1 and 5")),
        })
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Exhausting => "Exhausting",
            Self::Tiring => "Tiring",
            Self::Okay => "Okay",
            Self::Good => "Good",
            Self::Great => "Great",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ClientError> {
        if start > end {
            return Err(invalid("Start date must not be after end date"));
        }
        Ok(Self { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn message(err: ClientError) -> String {
        err.to_string()
    }

    #[test]
    fn login_form_reports_first_missing_field() {
        assert_eq!(
            message(LoginForm::new("", "").validate().expect_err("empty")),
            "All fields are required"
        );
        assert_eq!(
            message(LoginForm::new("12345", "pass").validate().expect_err("short")),
            "Enter a 10 digit contact number"
        );
        assert_eq!(
            message(LoginForm::new("9876543210", "").validate().expect_err("pw")),
            "Enter password"
        );
        assert_eq!(
            message(LoginForm::new("9876543210", "abc").validate().expect_err("len")),
            "Password must be at least 4 characters"
        );
        LoginForm::new("98765-43210", "abcd").validate().expect("valid");
    }

    #[test]
    fn otp_must_be_four_digits() {
        validate_otp("1234").expect("valid");
        assert!(validate_otp("123").is_err());
        assert!(validate_otp("12a4").is_err());
    }

    #[test]
    fn work_report_requires_date_and_text() {
        let missing = WorkReportDraft {
            date: None,
            description: "did things".into(),
        };
        assert!(missing.validate().is_err());

        let blank_text = WorkReportDraft {
            date: Some(day(2024, 2, 1)),
            description: "   ".into(),
        };
        assert!(blank_text.validate().is_err());

        let ok = WorkReportDraft {
            date: Some(day(2024, 2, 1)),
            description: "  closed tickets ".into(),
        }
        .validate()
        .expect("valid");
        assert_eq!(ok.description, "closed tickets");
    }

    #[test]
    fn review_checks_member_then_rating_then_text() {
        let no_member = ReviewDraft {
            member: None,
            rating: 4,
            remark: "good".into(),
        };
        assert_eq!(
            message(no_member.validate().expect_err("member")),
            "Please select a team member"
        );
        let unrated = ReviewDraft {
            member: Some(UserId(2)),
            rating: 0,
            remark: "good".into(),
        };
        assert_eq!(
            message(unrated.validate().expect_err("rating")),
            "Please rate the team member"
        );
        let silent = ReviewDraft {
            member: Some(UserId(2)),
            rating: 3,
            remark: String::new(),
        };
        assert_eq!(
            message(silent.validate().expect_err("remark")),
            "Please write a review"
        );
    }

    #[test]
    fn document_draft_encodes_file_bytes() {
        let draft = DocumentDraft::with_file_bytes("PAN", "ABCDE1234F", b"hello");
        let doc = draft.validate().expect("valid");
        assert_eq!(doc.file_base64, "aGVsbG8=");

        let empty = DocumentDraft::with_file_bytes("PAN", "ABCDE1234F", b"");
        assert!(empty.validate().is_err());
    }

    #[test]
    fn check_location_needs_both_parts() {
        let coords = Coordinates {
            latitude: 18.52,
            longitude: 73.85,
        };
        let loc = CheckLocation::new(Some(coords), Some(" FC Road ")).expect("valid");
        assert_eq!(loc.lat_long, "18.52,73.85");
        assert_eq!(loc.address, "FC Road");
        assert!(CheckLocation::new(None, Some("FC Road")).is_err());
        assert!(CheckLocation::new(Some(coords), Some("  ")).is_err());
    }

    #[test]
    fn mood_defaults_to_great_and_labels_match_index() {
        assert_eq!(WorkdayMood::default().index(), 5);
        assert_eq!(WorkdayMood::from_index(1).expect("1").label(), "Exhausting");
        assert_eq!(WorkdayMood::from_index(3).expect("3").label(), "Okay");
        assert!(WorkdayMood::from_index(6).is_err());
    }

    #[test]
    fn report_range_rejects_inverted_dates() {
        ReportRange::new(day(2024, 1, 1), day(2024, 1, 1)).expect("same day");
        assert!(ReportRange::new(day(2024, 2, 1), day(2024, 1, 1)).is_err());
    }

    #[test]
    fn password_change_rejects_reuse() {
        assert!(PasswordChange::new("abcd", "abcd").is_err());
        assert!(PasswordChange::new("abcd", "xyz").is_err());
        PasswordChange::new("abcd", "wxyz").expect("valid");
    }
}
