use serde::{Deserialize, Deserializer, Serialize};

use crate::wire;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                wire::int(deserializer).map($name)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(CompanyId);
id_newtype!(AttendanceId);

/// Login payload, cached verbatim under the `userData` key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserData {
    pub id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub name: String,
    #[serde(deserialize_with = "wire::text")]
    pub mobile: String,
    #[serde(deserialize_with = "wire::text")]
    pub role: String,
    #[serde(deserialize_with = "wire::text")]
    pub pic: String,
    #[serde(
        deserialize_with = "wire::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub work_station: Option<String>,
    pub cid: CompanyId,
    #[serde(
        deserialize_with = "wire::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cname: Option<String>,
    #[serde(
        deserialize_with = "wire::opt_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cpic: Option<String>,
    #[serde(deserialize_with = "wire::text")]
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSession {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub device: String,
    #[serde(deserialize_with = "wire::text")]
    pub session: String,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncementData {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    #[serde(deserialize_with = "wire::text")]
    pub a_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub a_title: String,
    #[serde(deserialize_with = "wire::text")]
    pub a_desc: String,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceData {
    pub id: AttendanceId,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub checkin_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkin_time: String,
    /// Blank until the employee checks out.
    #[serde(deserialize_with = "wire::text")]
    pub checkout_time: String,
    #[serde(rename = "break", deserialize_with = "wire::int")]
    pub break_flag: i64,
    #[serde(deserialize_with = "wire::int")]
    pub h_index: i64,
    pub logged_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

impl AttendanceData {
    pub fn is_checked_out(&self) -> bool {
        !self.checkout_time.trim().is_empty() && self.checkout_time != "00:00:00"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttendanceLog {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub att_id: AttendanceId,
    #[serde(deserialize_with = "wire::text")]
    pub log_type: String,
    #[serde(deserialize_with = "wire::text")]
    pub log_time: String,
    #[serde(deserialize_with = "wire::text")]
    pub log_location: String,
    #[serde(deserialize_with = "wire::text")]
    pub log_lat_long: String,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
    #[serde(deserialize_with = "wire::text")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkReportData {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub w_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub w_desc: String,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentType {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    #[serde(deserialize_with = "wire::text")]
    pub name: String,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentData {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub doc_type: String,
    #[serde(deserialize_with = "wire::text")]
    pub doc_number: String,
    #[serde(deserialize_with = "wire::text")]
    pub doc_file: String,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Holiday {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    #[serde(deserialize_with = "wire::text")]
    pub h_name: String,
    #[serde(deserialize_with = "wire::text")]
    pub h_date: String,
    #[serde(deserialize_with = "wire::int")]
    pub h_leaves: i64,
    #[serde(deserialize_with = "wire::text")]
    pub h_desc: String,
    #[serde(deserialize_with = "wire::text")]
    pub h_type: String,
    #[serde(deserialize_with = "wire::int")]
    pub field: i64,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

/// A review someone else wrote about the current user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub rating: i64,
    #[serde(deserialize_with = "wire::text")]
    pub review: String,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
    #[serde(deserialize_with = "wire::text")]
    pub posted_by: String,
}

/// A review the current user wrote about a team member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostedReviewData {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub rating: i64,
    #[serde(deserialize_with = "wire::text")]
    pub review: String,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfileData {
    pub u_id: UserId,
    pub u_cid: CompanyId,
    #[serde(deserialize_with = "wire::text")]
    pub u_name: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_mobile: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_email: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_address: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_district: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_state: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_pincode: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_pic: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_role: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_designation: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_dob: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_doj: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_work_station: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_dor: String,
    #[serde(deserialize_with = "wire::int")]
    pub u_salary: i64,
    pub u_added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub u_status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestData {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub r_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub r_title: String,
    #[serde(deserialize_with = "wire::text")]
    pub r_desc: String,
    #[serde(deserialize_with = "wire::text")]
    pub r_type: String,
    #[serde(deserialize_with = "wire::text")]
    pub r_action: String,
    pub approve_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    pub added_by: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestType {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "wire::text")]
    pub kind: String,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

/// Today's attendance snapshot shown on the dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeStatusData {
    pub att_id: AttendanceId,
    pub user_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub current_day: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkin_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkin_time: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkout_time: String,
    #[serde(deserialize_with = "wire::text")]
    pub break_status: String,
    #[serde(deserialize_with = "wire::text")]
    pub working_status: String,
    #[serde(deserialize_with = "wire::text")]
    pub working_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub working_time: String,
}

impl EmployeeStatusData {
    pub fn is_checked_in(&self) -> bool {
        self.att_id.0 > 0 && !self.checkin_time.trim().is_empty()
    }

    pub fn is_checked_out(&self) -> bool {
        let checkout = self.checkout_time.trim();
        !checkout.is_empty() && checkout != "00:00:00"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusEntry {
    #[serde(deserialize_with = "wire::int")]
    pub id: i64,
    pub c_id: CompanyId,
    pub u_id: UserId,
    #[serde(deserialize_with = "wire::text")]
    pub s_msg: String,
    #[serde(deserialize_with = "wire::text")]
    pub s_date: String,
    #[serde(deserialize_with = "wire::text")]
    pub s_time: String,
    #[serde(deserialize_with = "wire::int")]
    pub break_status: i64,
    #[serde(deserialize_with = "wire::int")]
    pub status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
}

/// Aggregates the backend computes per team member. Percentages and averages
/// come back preformatted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Rating {
    #[serde(deserialize_with = "wire::int")]
    pub total_working_day: i64,
    #[serde(deserialize_with = "wire::int")]
    pub total_not_checkout_day: i64,
    #[serde(deserialize_with = "wire::int")]
    pub total_work_report: i64,
    #[serde(deserialize_with = "wire::text")]
    pub total_rating: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkout_percentage: String,
    #[serde(deserialize_with = "wire::text")]
    pub work_percentage: String,
    #[serde(deserialize_with = "wire::text")]
    pub rating_percentage: String,
    #[serde(deserialize_with = "wire::text")]
    pub checkout_avg: String,
    #[serde(deserialize_with = "wire::text")]
    pub work_avg: String,
    #[serde(deserialize_with = "wire::text")]
    pub rating_avg: String,
    #[serde(deserialize_with = "wire::text")]
    pub total_percentage: String,
    #[serde(deserialize_with = "wire::text")]
    pub total_avg_rating: String,
}

/// `u_password` is sent by the backend and deliberately not mapped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamMember {
    pub u_id: UserId,
    pub u_cid: CompanyId,
    #[serde(deserialize_with = "wire::text")]
    pub u_name: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_mobile: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_email: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_address: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_district: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_state: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_pincode: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_pic: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_role: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_designation: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_dob: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_doj: String,
    #[serde(deserialize_with = "wire::text")]
    pub u_work_station: String,
    #[serde(deserialize_with = "wire::int")]
    pub u_salary: i64,
    pub u_added_by: UserId,
    #[serde(deserialize_with = "wire::int")]
    pub u_status: i64,
    #[serde(deserialize_with = "wire::text")]
    pub created_at: String,
    pub rating: Rating,
}
