use chrono::NaiveDate;
use log::{debug, info, warn};
use uuid::Uuid;

use crate::client::gui::views::logger::{LogLevel, LogMessage};
use crate::client::models::appointment_rules::{is_allowed, AppointmentAction};
use crate::client::models::booking::{parse_date_input, BookingStep, BookingWorkflow, TimeSlot};
use crate::client::models::doctor_search::DoctorSearch;
use crate::client::models::forms::{FieldErrors, LoginForm, Registration, RegistrationForm};
use crate::client::routing::{guard, home_route, Route};
use crate::client::services::query_client::{MutationState, QueryState};
use crate::common::error::ApiError;
use crate::common::models::{
    Appointment, CreateAppointmentRequest, Doctor, DoctorAppointmentsQuery,
    LoginRequest, Page, PatientAppointmentsQuery, Role, Session, StatusFilter, StatusUpdate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    CheckingSession,
    Ready(Route),
}

/// Generation counter for one kind of screen load.
/// Only the most recently issued generation is accepted back.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadTicket {
    current: u64,
}

impl LoadTicket {
    pub fn issue(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.current
    }

    /// Drops interest in whatever is outstanding.
    pub fn abandon(&mut self) {
        self.current += 1;
    }
}

/// Status change waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAction {
    pub appointment_id: String,
    pub counterpart: String,
    pub action: AppointmentAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppointmentsRequest {
    Patient(PatientAppointmentsQuery),
    Doctor(DoctorAppointmentsQuery),
}

#[derive(Debug, Clone)]
pub struct ClientState {
    pub app_state: AppState,
    pub session: Option<Session>,
    pub logger: Vec<LogMessage>,

    pub login: LoginForm,
    pub login_errors: FieldErrors,
    pub login_mutation: MutationState,
    pub show_password: bool,

    pub registration: RegistrationForm,
    pub registration_errors: FieldErrors,
    pub registration_mutation: MutationState,

    pub doctors: QueryState<Vec<Doctor>>,
    pub specializations: QueryState<Vec<String>>,
    pub doctor_search: DoctorSearch,
    pub doctor_loads: LoadTicket,

    pub booking: Option<BookingWorkflow>,
    pub booking_date_input: String,
    pub booking_input_error: Option<String>,

    pub appointments: QueryState<Page<Appointment>>,
    pub appointment_loads: LoadTicket,
    pub status_filter: StatusFilter,
    pub date_input: String,
    pub date_filter: Option<NaiveDate>,
    pub appointments_page: u32,
    pub pending_action: Option<PendingAction>,
    pub status_mutation: MutationState,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ClientState {
    pub fn new(doctors_page_size: usize) -> Self {
        Self {
            app_state: AppState::CheckingSession,
            session: None,
            logger: Vec::new(),
            login: LoginForm::default(),
            login_errors: FieldErrors::default(),
            login_mutation: MutationState::default(),
            show_password: false,
            registration: RegistrationForm::default(),
            registration_errors: FieldErrors::default(),
            registration_mutation: MutationState::default(),
            doctors: QueryState::default(),
            specializations: QueryState::default(),
            doctor_search: DoctorSearch::new(doctors_page_size),
            doctor_loads: LoadTicket::default(),
            booking: None,
            booking_date_input: String::new(),
            booking_input_error: None,
            appointments: QueryState::default(),
            appointment_loads: LoadTicket::default(),
            status_filter: StatusFilter::default(),
            date_input: String::new(),
            date_filter: None,
            appointments_page: 1,
            pending_action: None,
            status_mutation: MutationState::default(),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.session.as_ref().map(|s| s.user.role)
    }

    pub fn route(&self) -> Option<Route> {
        match self.app_state {
            AppState::CheckingSession => None,
            AppState::Ready(route) => Some(route),
        }
    }

    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.logger.push(LogMessage { level, message: message.into() });
    }

    // ---- navigation ----

    /// Applies the route guard, switches screen and resets per-screen state.
    /// Responses still in flight for the previous screen are abandoned.
    pub fn navigate(&mut self, requested: Route) -> Route {
        let route = guard(requested, self.session.as_ref()).resolve(requested);
        if route != requested {
            info!("[ROUTER] {} redirected to {}", requested, route);
        }
        self.app_state = AppState::Ready(route);
        self.doctor_loads.abandon();
        self.appointment_loads.abandon();
        self.booking = None;
        self.booking_date_input.clear();
        self.booking_input_error = None;
        self.doctor_search = DoctorSearch::new(self.doctor_search.page_size());
        self.appointments = QueryState::default();
        self.status_filter = StatusFilter::default();
        self.date_input.clear();
        self.date_filter = None;
        self.appointments_page = 1;
        self.pending_action = None;
        self.status_mutation = MutationState::default();
        route
    }

    pub fn restore_session(&mut self, session: Option<Session>) -> Route {
        let target = match &session {
            Some(s) => home_route(s.user.role),
            None => Route::Login,
        };
        self.session = session;
        self.navigate(target)
    }

    pub fn sign_out(&mut self) -> Route {
        self.session = None;
        self.doctors = QueryState::default();
        self.specializations = QueryState::default();
        self.navigate(Route::Login)
    }

    /// A refused token ends the session; other failures are left to the caller.
    pub fn expire_session_on<T>(&mut self, result: &Result<T, ApiError>) -> bool {
        match result {
            Err(err) if err.is_authentication() && self.session.is_some() => {
                warn!("[SESSION] Token rejected by server: {}", err);
                self.sign_out();
                self.log(LogLevel::Warning, "Your session has expired. Please sign in again.");
                true
            }
            _ => false,
        }
    }

    // ---- login / registration ----

    pub fn begin_login(&mut self) -> Option<LoginRequest> {
        if self.login_mutation.is_pending {
            return None;
        }
        match self.login.validate() {
            Ok(request) => {
                self.login_errors = FieldErrors::default();
                self.login_mutation.begin();
                Some(request)
            }
            Err(errors) => {
                self.login_errors = errors;
                None
            }
        }
    }

    pub fn finish_login(&mut self, result: Result<Session, ApiError>) -> Option<Route> {
        self.login_mutation.finish(&result);
        let session = result.ok()?;
        let route = home_route(session.user.role);
        self.log(LogLevel::Success, format!("Welcome back, {}", session.user.name));
        self.session = Some(session);
        self.login = LoginForm::default();
        Some(self.navigate(route))
    }

    pub fn begin_registration(&mut self) -> Option<Registration> {
        if self.registration_mutation.is_pending {
            return None;
        }
        match self.registration.validate() {
            Ok(registration) => {
                self.registration_errors = FieldErrors::default();
                self.registration_mutation.begin();
                Some(registration)
            }
            Err(errors) => {
                self.registration_errors = errors;
                None
            }
        }
    }

    /// Successful registration lands back on the login screen.
    pub fn finish_registration(&mut self, result: Result<String, ApiError>) -> Option<Route> {
        self.registration_mutation.finish(&result);
        let message = result.ok()?;
        let message = if message.trim().is_empty() {
            "Registration successful. Please sign in.".to_string()
        } else {
            message
        };
        self.log(LogLevel::Success, message);
        self.login.email = self.registration.email.trim().to_string();
        self.login.role = Some(self.registration.role);
        self.registration = RegistrationForm::default();
        Some(self.navigate(Route::Login))
    }

    // ---- doctor search ----

    pub fn begin_doctor_load(&mut self) -> u64 {
        self.doctors.start();
        self.specializations.start();
        self.doctor_loads.issue()
    }

    pub fn apply_doctors(&mut self, generation: u64, result: Result<Vec<Doctor>, ApiError>) -> bool {
        if !self.doctor_loads.accepts(generation) {
            debug!("[STATE] dropping stale doctor list #{}", generation);
            return false;
        }
        self.doctors.finish(result);
        true
    }

    pub fn apply_specializations(
        &mut self,
        generation: u64,
        result: Result<Vec<String>, ApiError>,
    ) -> bool {
        if !self.doctor_loads.accepts(generation) {
            return false;
        }
        if let Err(err) = &result {
            warn!("[STATE] specializations unavailable: {}", err);
        }
        self.specializations.finish(result);
        true
    }

    pub fn all_doctors(&self) -> &[Doctor] {
        self.doctors.data.as_deref().unwrap_or(&[])
    }

    pub fn visible_doctors(&self) -> Vec<&Doctor> {
        self.doctor_search.current_page(self.all_doctors())
    }

    pub fn doctor_page_count(&self) -> usize {
        self.doctor_search.page_count(self.all_doctors())
    }

    pub fn select_doctors_page(&mut self, page: usize) {
        let doctors = self.doctors.data.clone().unwrap_or_default();
        self.doctor_search.set_page(page, &doctors);
    }

    // ---- booking ----

    pub fn open_booking(&mut self, doctor: Doctor) -> bool {
        if self.booking.as_ref().is_some_and(|b| !b.can_close()) {
            return false;
        }
        self.booking = Some(BookingWorkflow::new(doctor));
        self.booking_date_input.clear();
        self.booking_input_error = None;
        true
    }

    pub fn submit_booking_date(&mut self, today: NaiveDate) {
        let Some(booking) = self.booking.as_mut() else {
            return;
        };
        let outcome = parse_date_input(&self.booking_date_input)
            .and_then(|date| booking.select_date(date, today));
        self.booking_input_error = outcome.err().map(|e| e.to_string());
    }

    pub fn select_booking_slot(&mut self, slot: TimeSlot) {
        if let Some(booking) = self.booking.as_mut() {
            self.booking_input_error = booking.select_slot(slot).err().map(|e| e.to_string());
        }
    }

    pub fn booking_back(&mut self) {
        if let Some(booking) = self.booking.as_mut() {
            if booking.back().is_ok() {
                self.booking_input_error = None;
            }
        }
    }

    /// Hands out the create request once; further confirms are ignored until resolved.
    pub fn confirm_booking(&mut self) -> Option<(Uuid, CreateAppointmentRequest)> {
        let booking = self.booking.as_mut()?;
        match booking.confirm() {
            Ok(request) => Some((booking.id, request)),
            Err(err) => {
                debug!("[BOOKING] confirm ignored: {}", err);
                None
            }
        }
    }

    pub fn retry_booking(&mut self) {
        if let Some(booking) = self.booking.as_mut() {
            if let Err(err) = booking.retry() {
                debug!("[BOOKING] retry ignored: {}", err);
            }
        }
    }

    pub fn close_booking(&mut self) -> bool {
        match &self.booking {
            Some(booking) if !booking.can_close() => false,
            _ => {
                self.booking = None;
                self.booking_input_error = None;
                true
            }
        }
    }

    /// Returns the instance id to schedule auto-dismiss for when the booking succeeded.
    pub fn finish_booking(
        &mut self,
        booking_id: Uuid,
        result: Result<Option<Appointment>, ApiError>,
    ) -> Option<Uuid> {
        let booking = self.booking.as_mut().filter(|b| b.id == booking_id)?;
        let outcome = result
            .map(|_| ())
            .map_err(|err| err.user_message("Failed to book appointment"));
        let succeeded = outcome.is_ok();
        if !booking.resolve(outcome) {
            return None;
        }
        if succeeded {
            self.log(LogLevel::Success, "Appointment booked successfully!");
            Some(booking_id)
        } else {
            None
        }
    }

    pub fn auto_dismiss_booking(&mut self, booking_id: Uuid) -> bool {
        let due = self
            .booking
            .as_ref()
            .is_some_and(|b| b.id == booking_id && matches!(b.step(), BookingStep::Succeeded { .. }));
        if due {
            self.booking = None;
        }
        due
    }

    // ---- appointment lists ----

    pub fn appointments_request(&self) -> Option<AppointmentsRequest> {
        match self.route()? {
            Route::PatientAppointments => Some(AppointmentsRequest::Patient(PatientAppointmentsQuery {
                status: self.status_filter,
                page: self.appointments_page,
            })),
            Route::DoctorDashboard => Some(AppointmentsRequest::Doctor(DoctorAppointmentsQuery {
                date: self.date_filter,
                status: self.status_filter,
                page: self.appointments_page,
            })),
            _ => None,
        }
    }

    pub fn begin_appointments_load(&mut self) -> Option<(u64, AppointmentsRequest)> {
        let request = self.appointments_request()?;
        self.appointments.start();
        Some((self.appointment_loads.issue(), request))
    }

    pub fn apply_appointments(
        &mut self,
        generation: u64,
        result: Result<Page<Appointment>, ApiError>,
    ) -> bool {
        if !self.appointment_loads.accepts(generation) {
            debug!("[STATE] dropping stale appointment page #{}", generation);
            return false;
        }
        self.appointments.finish(result);
        true
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
        self.appointments_page = 1;
    }

    pub fn apply_date_filter(&mut self) {
        match parse_date_input(&self.date_input) {
            Ok(date) => {
                self.date_filter = Some(date);
                self.appointments_page = 1;
            }
            Err(err) => self.log(LogLevel::Warning, err.to_string()),
        }
    }

    pub fn clear_date_filter(&mut self) {
        self.date_input.clear();
        self.date_filter = None;
        self.appointments_page = 1;
    }

    pub fn total_appointment_pages(&self) -> u32 {
        self.appointments.data.as_ref().map_or(1, |p| p.total_pages.max(1))
    }

    pub fn select_appointments_page(&mut self, page: u32) -> bool {
        let page = page.clamp(1, self.total_appointment_pages());
        if page == self.appointments_page {
            return false;
        }
        self.appointments_page = page;
        true
    }

    fn find_appointment(&self, appointment_id: &str) -> Option<&Appointment> {
        self.appointments
            .data
            .as_ref()?
            .items
            .iter()
            .find(|a| a.id == appointment_id)
    }

    /// Opens the confirmation dialog if the action is offered for this row.
    pub fn request_action(&mut self, appointment_id: &str, action: AppointmentAction) -> bool {
        if self.status_mutation.is_pending {
            return false;
        }
        let (Some(role), Some(appointment)) = (self.role(), self.find_appointment(appointment_id)) else {
            return false;
        };
        if !is_allowed(appointment.status, role, action) {
            warn!("[STATE] {} not offered for {} as {}", action, appointment.status, role);
            return false;
        }
        self.pending_action = Some(PendingAction {
            appointment_id: appointment.id.clone(),
            counterpart: appointment.counterpart_name(role).to_string(),
            action,
        });
        true
    }

    pub fn confirm_action(&mut self) -> Option<(String, StatusUpdate)> {
        let pending = self.pending_action.clone()?;
        if !self.status_mutation.begin() {
            return None;
        }
        self.pending_action = None;
        Some((pending.appointment_id, pending.action.target_status()))
    }

    pub fn dismiss_action(&mut self) {
        if !self.status_mutation.is_pending {
            self.pending_action = None;
        }
    }

    /// Returns `true` when the list should be reloaded.
    pub fn finish_status_update(&mut self, status: StatusUpdate, result: Result<String, ApiError>) -> bool {
        self.status_mutation.finish(&result);
        match result {
            Ok(_) => {
                self.log(
                    LogLevel::Success,
                    format!("Appointment marked as {} successfully!", status.as_str().to_lowercase()),
                );
                true
            }
            Err(err) => {
                self.log(LogLevel::Error, err.user_message("Failed to update appointment status"));
                false
            }
        }
    }
}
