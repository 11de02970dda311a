use chrono::Utc;
use iced::{Application, Command, Element, Theme};
use log::{info, warn};

use crate::client::config::ClientConfig;
use crate::client::gui::views::logger::LogLevel;
use crate::client::gui::views::{
    doctor_dashboard, login, patient_appointments, patient_dashboard, registration,
};
use crate::client::models::app_state::{AppState, AppointmentsRequest, ClientState};
use crate::client::models::booking::AUTO_DISMISS;
use crate::client::models::messages::Message;
use crate::client::routing::Route;
use crate::client::services::Services;
use crate::common::error::ApiError;

const LOG_LINGER: std::time::Duration = std::time::Duration::from_millis(2500);

pub struct AppFlags {
    pub config: ClientConfig,
    pub services: Services,
}

pub struct MedibookApp {
    pub state: ClientState,
    pub services: Services,
}

impl MedibookApp {
    /// Kicks off whatever the freshly entered screen needs.
    fn enter(&mut self, route: Route) -> Command<Message> {
        match route {
            Route::PatientDashboard => self.load_doctors(),
            Route::PatientAppointments | Route::DoctorDashboard => self.load_appointments(),
            Route::Login | Route::Register => Command::none(),
        }
    }

    fn load_doctors(&mut self) -> Command<Message> {
        let generation = self.state.begin_doctor_load();
        let doctors = self.services.doctors.clone();
        let specializations = self.services.doctors.clone();
        Command::batch(vec![
            Command::perform(async move { doctors.doctors().await }, move |result| {
                Message::DoctorsLoaded { generation, result }
            }),
            Command::perform(async move { specializations.specializations().await }, move |result| {
                Message::SpecializationsLoaded { generation, result }
            }),
        ])
    }

    fn load_appointments(&mut self) -> Command<Message> {
        let Some((generation, request)) = self.state.begin_appointments_load() else {
            return Command::none();
        };
        let service = self.services.appointments.clone();
        Command::perform(
            async move {
                match request {
                    AppointmentsRequest::Patient(query) => service.patient_appointments(query).await,
                    AppointmentsRequest::Doctor(query) => service.doctor_appointments(query).await,
                }
            },
            move |result| Message::AppointmentsLoaded { generation, result },
        )
    }

    fn clear_log_later() -> Command<Message> {
        Command::perform(
            async move {
                tokio::time::sleep(LOG_LINGER).await;
            },
            |_| Message::ClearLog,
        )
    }

    /// Drops the stored session too when the server refused the token.
    fn session_rejected<T>(&mut self, result: &Result<T, ApiError>) -> bool {
        let expired = self.state.expire_session_on(result);
        if expired {
            self.services.auth.logout();
        }
        expired
    }
}

impl Application for MedibookApp {
    type Message = Message;
    type Theme = Theme;
    type Executor = iced::executor::Default;
    type Flags = AppFlags;

    fn new(flags: AppFlags) -> (Self, Command<Message>) {
        let doctors_page_size = flags.config.doctors_page_size;
        let session = flags.services.session().clone();
        let app = MedibookApp {
            state: ClientState::new(doctors_page_size),
            services: flags.services,
        };
        // Nothing protected renders until the saved session has been looked at.
        let cmd = Command::perform(async move { session.rehydrate() }, Message::SessionRestored);
        (app, cmd)
    }

    fn title(&self) -> String {
        match self.state.route() {
            Some(Route::Login) => "MediBook - Sign in".to_string(),
            Some(Route::Register) => "MediBook - Register".to_string(),
            Some(Route::PatientDashboard) => "MediBook - Find a Doctor".to_string(),
            Some(Route::PatientAppointments) => "MediBook - My Appointments".to_string(),
            Some(Route::DoctorDashboard) => "MediBook - Doctor Dashboard".to_string(),
            None => "MediBook".to_string(),
        }
    }

    fn theme(&self) -> Theme {
        Theme::Light
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::NoOp => Command::none(),
            Message::SessionRestored(session) => {
                let route = self.state.restore_session(session);
                info!("[APP] Starting on {}", route);
                self.enter(route)
            }
            Message::Navigate(route) => {
                let route = self.state.navigate(route);
                self.enter(route)
            }
            Message::Logout => {
                self.services.auth.logout();
                self.state.sign_out();
                self.state.log(LogLevel::Info, "You have been signed out");
                Self::clear_log_later()
            }
            Message::ClearLog => {
                self.state.logger.clear();
                Command::none()
            }

            Message::LoginEmailChanged(email) => {
                self.state.login.email = email;
                Command::none()
            }
            Message::LoginPasswordChanged(password) => {
                self.state.login.password = password;
                Command::none()
            }
            Message::LoginRoleSelected(role) => {
                self.state.login.role = Some(role);
                Command::none()
            }
            Message::ToggleShowPassword => {
                self.state.show_password = !self.state.show_password;
                Command::none()
            }
            Message::SubmitLogin => {
                let Some(request) = self.state.begin_login() else {
                    return Command::none();
                };
                let auth = self.services.auth.clone();
                Command::perform(async move { auth.login(request).await }, Message::LoginFinished)
            }
            Message::LoginFinished(result) => match self.state.finish_login(result) {
                Some(route) => Command::batch(vec![self.enter(route), Self::clear_log_later()]),
                None => Command::none(),
            },

            Message::RegisterRoleSelected(role) => {
                self.state.registration.role = role;
                self.state.registration_errors = Default::default();
                Command::none()
            }
            Message::RegisterNameChanged(name) => {
                self.state.registration.name = name;
                Command::none()
            }
            Message::RegisterEmailChanged(email) => {
                self.state.registration.email = email;
                Command::none()
            }
            Message::RegisterPasswordChanged(password) => {
                self.state.registration.password = password;
                Command::none()
            }
            Message::RegisterSpecializationChanged(specialization) => {
                self.state.registration.specialization = specialization;
                Command::none()
            }
            Message::RegisterPhotoUrlChanged(url) => {
                self.state.registration.photo_url = url;
                Command::none()
            }
            Message::SubmitRegistration => {
                let Some(registration) = self.state.begin_registration() else {
                    return Command::none();
                };
                let auth = self.services.auth.clone();
                Command::perform(
                    async move { auth.register(registration).await },
                    Message::RegistrationFinished,
                )
            }
            Message::RegistrationFinished(result) => match self.state.finish_registration(result) {
                Some(route) => Command::batch(vec![self.enter(route), Self::clear_log_later()]),
                None => Command::none(),
            },

            Message::DoctorsLoaded { generation, result } => {
                if self.session_rejected(&result) {
                    return Self::clear_log_later();
                }
                self.state.apply_doctors(generation, result);
                Command::none()
            }
            Message::SpecializationsLoaded { generation, result } => {
                self.state.apply_specializations(generation, result);
                Command::none()
            }
            Message::DoctorSearchChanged(query) => {
                self.state.doctor_search.set_query(query);
                Command::none()
            }
            Message::SpecializationSelected(specialization) => {
                self.state.doctor_search.set_specialization(specialization);
                Command::none()
            }
            Message::DoctorsPageSelected(page) => {
                self.state.select_doctors_page(page);
                Command::none()
            }
            Message::RetryDoctors => self.load_doctors(),

            Message::OpenBooking(doctor) => {
                let doctor_id = doctor.id.clone();
                if self.state.open_booking(doctor) {
                    info!("[BOOKING] Opened booking for doctor {}", doctor_id);
                }
                Command::none()
            }
            Message::BookingDateChanged(date) => {
                self.state.booking_date_input = date;
                Command::none()
            }
            Message::BookingDateSubmitted => {
                self.state.submit_booking_date(Utc::now().date_naive());
                Command::none()
            }
            Message::BookingSlotSelected(slot) => {
                self.state.select_booking_slot(slot);
                Command::none()
            }
            Message::BookingBack => {
                self.state.booking_back();
                Command::none()
            }
            Message::BookingConfirm => {
                let Some((booking_id, request)) = self.state.confirm_booking() else {
                    return Command::none();
                };
                let service = self.services.appointments.clone();
                Command::perform(async move { service.create(request).await }, move |result| {
                    Message::BookingFinished { booking_id, result }
                })
            }
            Message::BookingRetry => {
                self.state.retry_booking();
                Command::none()
            }
            Message::CloseBooking => {
                self.state.close_booking();
                Command::none()
            }
            Message::BookingFinished { booking_id, result } => {
                if self.session_rejected(&result) {
                    return Self::clear_log_later();
                }
                if let Err(err) = &result {
                    warn!("[BOOKING] Booking {} failed: {}", booking_id, err);
                }
                match self.state.finish_booking(booking_id, result) {
                    Some(booking_id) => Command::batch(vec![
                        Command::perform(
                            async move {
                                tokio::time::sleep(AUTO_DISMISS).await;
                            },
                            move |_| Message::BookingAutoDismiss { booking_id },
                        ),
                        Self::clear_log_later(),
                    ]),
                    None => Command::none(),
                }
            }
            Message::BookingAutoDismiss { booking_id } => {
                self.state.auto_dismiss_booking(booking_id);
                Command::none()
            }

            Message::AppointmentsLoaded { generation, result } => {
                if self.session_rejected(&result) {
                    return Self::clear_log_later();
                }
                self.state.apply_appointments(generation, result);
                Command::none()
            }
            Message::StatusFilterSelected(filter) => {
                self.state.set_status_filter(filter);
                self.load_appointments()
            }
            Message::DateFilterChanged(date) => {
                self.state.date_input = date;
                Command::none()
            }
            Message::ApplyDateFilter => {
                self.state.apply_date_filter();
                Command::batch(vec![self.load_appointments(), Self::clear_log_later()])
            }
            Message::ClearDateFilter => {
                self.state.clear_date_filter();
                self.load_appointments()
            }
            Message::AppointmentsPageSelected(page) => {
                if self.state.select_appointments_page(page) {
                    self.load_appointments()
                } else {
                    Command::none()
                }
            }
            Message::RetryAppointments => self.load_appointments(),
            Message::RequestAction { appointment_id, action } => {
                self.state.request_action(&appointment_id, action);
                Command::none()
            }
            Message::ConfirmAction => {
                let Some((appointment_id, status)) = self.state.confirm_action() else {
                    return Command::none();
                };
                let service = self.services.appointments.clone();
                Command::perform(
                    async move { service.update_status(&appointment_id, status).await },
                    move |result| Message::StatusUpdated { status, result },
                )
            }
            Message::DismissAction => {
                self.state.dismiss_action();
                Command::none()
            }
            Message::StatusUpdated { status, result } => {
                if self.session_rejected(&result) {
                    return Self::clear_log_later();
                }
                if self.state.finish_status_update(status, result) {
                    Command::batch(vec![self.load_appointments(), Self::clear_log_later()])
                } else {
                    Self::clear_log_later()
                }
            }
        }
    }

    fn view(&self) -> Element<Message> {
        match self.state.app_state {
            AppState::CheckingSession => iced::widget::Container::new(iced::widget::Text::new("Checking session..."))
                .width(iced::Length::Fill)
                .height(iced::Length::Fill)
                .center_x()
                .center_y()
                .into(),
            AppState::Ready(Route::Login) => login::view(&self.state),
            AppState::Ready(Route::Register) => registration::view(&self.state),
            AppState::Ready(Route::PatientDashboard) => patient_dashboard::view(&self.state),
            AppState::Ready(Route::PatientAppointments) => patient_appointments::view(&self.state),
            AppState::Ready(Route::DoctorDashboard) => doctor_dashboard::view(&self.state),
        }
    }
}
