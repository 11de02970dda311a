use uuid::Uuid;

use crate::client::models::appointment_rules::AppointmentAction;
use crate::client::models::booking::TimeSlot;
use crate::client::routing::Route;
use crate::common::error::ApiError;
use crate::common::models::{
    Appointment, Doctor, Page, Role, Session, StatusFilter, StatusUpdate,
};

#[derive(Debug, Clone)]
pub enum Message {
    NoOp,
    SessionRestored(Option<Session>),
    Navigate(Route),
    Logout,
    ClearLog,

    // Login
    LoginEmailChanged(String),
    LoginPasswordChanged(String),
    LoginRoleSelected(Role),
    ToggleShowPassword,
    SubmitLogin,
    LoginFinished(Result<Session, ApiError>),

    // Registration
    RegisterRoleSelected(Role),
    RegisterNameChanged(String),
    RegisterEmailChanged(String),
    RegisterPasswordChanged(String),
    RegisterSpecializationChanged(String),
    RegisterPhotoUrlChanged(String),
    SubmitRegistration,
    RegistrationFinished(Result<String, ApiError>),

    // Patient dashboard: doctor search
    DoctorsLoaded { generation: u64, result: Result<Vec<Doctor>, ApiError> },
    SpecializationsLoaded { generation: u64, result: Result<Vec<String>, ApiError> },
    DoctorSearchChanged(String),
    SpecializationSelected(String),
    DoctorsPageSelected(usize),
    RetryDoctors,

    // Booking modal
    OpenBooking(Doctor),
    BookingDateChanged(String),
    BookingDateSubmitted,
    BookingSlotSelected(TimeSlot),
    BookingBack,
    BookingConfirm,
    BookingRetry,
    CloseBooking,
    BookingFinished { booking_id: Uuid, result: Result<Option<Appointment>, ApiError> },
    BookingAutoDismiss { booking_id: Uuid },

    // Appointment lists (patient and doctor)
    AppointmentsLoaded { generation: u64, result: Result<Page<Appointment>, ApiError> },
    StatusFilterSelected(StatusFilter),
    DateFilterChanged(String),
    ApplyDateFilter,
    ClearDateFilter,
    AppointmentsPageSelected(u32),
    RetryAppointments,
    RequestAction { appointment_id: String, action: AppointmentAction },
    ConfirmAction,
    DismissAction,
    StatusUpdated { status: StatusUpdate, result: Result<String, ApiError> },
}
