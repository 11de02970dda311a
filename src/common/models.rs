// Wire models shared by the GUI, the CLI and the API client
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Patient,
    Doctor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Patient, Role::Doctor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "PATIENT",
            Role::Doctor => "DOCTOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PATIENT" => Ok(Role::Patient),
            "DOCTOR" => Ok(Role::Doctor),
            other => Err(format!("unknown role '{}', expected PATIENT or DOCTOR", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// Authenticated identity plus the bearer token issued by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Doctor {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Completed and cancelled appointments accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_uppercase();
        AppointmentStatus::ALL
            .into_iter()
            .find(|s| s.as_str() == wanted)
            .ok_or_else(|| format!("unknown appointment status '{}'", value))
    }
}

/// Status filter used by list screens; `All` is never sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    All,
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl StatusFilter {
    pub const OPTIONS: [StatusFilter; 5] = [
        StatusFilter::Pending,
        StatusFilter::Confirmed,
        StatusFilter::Completed,
        StatusFilter::Cancelled,
        StatusFilter::All,
    ];

    pub fn status(&self) -> Option<AppointmentStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Pending => Some(AppointmentStatus::Pending),
            StatusFilter::Confirmed => Some(AppointmentStatus::Confirmed),
            StatusFilter::Completed => Some(AppointmentStatus::Completed),
            StatusFilter::Cancelled => Some(AppointmentStatus::Cancelled),
        }
    }

    pub fn key(&self) -> &'static str {
        self.status().map(|s| s.as_str()).unwrap_or("ALL")
    }

    pub fn matches(&self, status: AppointmentStatus) -> bool {
        self.status().map_or(true, |wanted| wanted == status)
    }
}

impl From<AppointmentStatus> for StatusFilter {
    fn from(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Pending => StatusFilter::Pending,
            AppointmentStatus::Confirmed => StatusFilter::Confirmed,
            AppointmentStatus::Completed => StatusFilter::Completed,
            AppointmentStatus::Cancelled => StatusFilter::Cancelled,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StatusFilter::All => "All",
            StatusFilter::Pending => "Pending",
            StatusFilter::Confirmed => "Confirmed",
            StatusFilter::Completed => "Completed",
            StatusFilter::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("ALL") {
            return Ok(StatusFilter::All);
        }
        value.parse::<AppointmentStatus>().map(StatusFilter::from)
    }
}

/// The other side of an appointment as embedded by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentParty {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default)]
    pub patient_id: String,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<AppointmentParty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<AppointmentParty>,
}

impl Appointment {
    pub fn doctor_name(&self) -> &str {
        self.doctor.as_ref().map(|d| d.name.as_str()).unwrap_or("Unknown doctor")
    }

    pub fn patient_name(&self) -> &str {
        self.patient.as_ref().map(|p| p.name.as_str()).unwrap_or("Unknown patient")
    }

    pub fn doctor_specialization(&self) -> &str {
        self.doctor
            .as_ref()
            .and_then(|d| d.specialization.as_deref())
            .unwrap_or("")
    }

    /// Name of the person on the other side for the given viewer role.
    pub fn counterpart_name(&self, viewer: Role) -> &str {
        match viewer {
            Role::Patient => self.doctor_name(),
            Role::Doctor => self.patient_name(),
        }
    }
}

/// Response envelope used by every endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub status_code: Option<u16>,
    pub message: Option<String>,
    pub data: Option<T>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub total: Option<u64>,
    pub total_pages: Option<u32>,
}

/// One server-side page of results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Fill missing pagination fields from the request and the item count.
    pub fn from_envelope<U>(envelope: &ApiEnvelope<U>, items: Vec<T>, requested_page: u32) -> Self {
        let count = items.len();
        Page {
            page: envelope.page.unwrap_or(requested_page).max(1),
            limit: envelope.limit.unwrap_or(count as u32),
            total: envelope.total.unwrap_or(count as u64),
            total_pages: envelope.total_pages.unwrap_or(1).max(1),
            items,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PatientRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DoctorRegistration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoctorQuery {
    pub search: Option<String>,
    pub specialization: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl DoctorQuery {
    pub fn all(limit: u32) -> Self {
        DoctorQuery { search: None, specialization: None, page: 1, limit }
    }

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }
        if let Some(spec) = self.specialization.as_deref().filter(|s| !s.is_empty() && *s != "ALL") {
            params.push(("specialization", spec.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("limit", self.limit.to_string()));
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientAppointmentsQuery {
    pub status: StatusFilter,
    pub page: u32,
}

impl PatientAppointmentsQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(status) = self.status.status() {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DoctorAppointmentsQuery {
    pub date: Option<NaiveDate>,
    pub status: StatusFilter,
    pub page: u32,
}

impl DoctorAppointmentsQuery {
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string())];
        if let Some(date) = self.date {
            params.push(("date", date.format("%Y-%m-%d").to_string()));
        }
        if let Some(status) = self.status.status() {
            params.push(("status", status.as_str().to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreateAppointmentRequest {
    #[serde(rename = "doctorId")]
    pub doctor_id: String,
    pub date: String,
}

impl CreateAppointmentRequest {
    /// Builds the request for a calendar date and a wall-clock start, both read as UTC.
    pub fn at(doctor_id: &str, start: NaiveDateTime) -> Self {
        let start = Utc.from_utc_datetime(&start);
        CreateAppointmentRequest {
            doctor_id: doctor_id.to_string(),
            date: start.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        }
    }
}

/// Statuses `update-status` accepts. PENDING is never a target.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusUpdate {
    Confirmed,
    Completed,
    Cancelled,
}

impl StatusUpdate {
    pub fn status(&self) -> AppointmentStatus {
        match self {
            StatusUpdate::Confirmed => AppointmentStatus::Confirmed,
            StatusUpdate::Completed => AppointmentStatus::Completed,
            StatusUpdate::Cancelled => AppointmentStatus::Cancelled,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

impl From<StatusUpdate> for AppointmentStatus {
    fn from(update: StatusUpdate) -> Self {
        update.status()
    }
}

impl fmt::Display for StatusUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UpdateStatusRequest {
    pub appointment_id: String,
    pub status: StatusUpdate,
}
