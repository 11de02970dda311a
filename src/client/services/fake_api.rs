//! In-memory stand-in for the remote API, used by service and workflow tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::client::services::api_client::ApiClient;
use crate::common::error::ApiError;
use crate::common::models::{
    Appointment, AppointmentParty, AppointmentStatus, CreateAppointmentRequest, Doctor,
    DoctorAppointmentsQuery, DoctorQuery, DoctorRegistration, LoginData, LoginRequest, Page,
    PatientAppointmentsQuery, PatientRegistration, Role, UpdateStatusRequest, User,
};

const PAGE_SIZE: usize = 10;

#[derive(Default)]
pub struct FakeApi {
    pub doctors: Mutex<Vec<Doctor>>,
    pub appointments: Mutex<Vec<Appointment>>,
    pub created: Mutex<Vec<CreateAppointmentRequest>>,
    pub status_updates: Mutex<Vec<UpdateStatusRequest>>,
    /// Number of upcoming calls that fail with a network error.
    pub transient_failures: AtomicU32,
    pub reject_next_create: Mutex<Option<String>>,
    pub list_calls: AtomicU32,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doctors(names: &[(&str, &str, &str)]) -> Self {
        let api = Self::new();
        *api.doctors.lock().unwrap() = names
            .iter()
            .map(|(id, name, spec)| Doctor {
                id: id.to_string(),
                name: name.to_string(),
                specialization: spec.to_string(),
                photo_url: None,
            })
            .collect();
        api
    }

    pub fn seed_appointment(&self, id: &str, doctor: &str, patient: &str, status: AppointmentStatus) {
        let date: DateTime<Utc> = "2025-06-10T11:00:00Z".parse().unwrap();
        self.appointments.lock().unwrap().push(Appointment {
            id: id.to_string(),
            doctor_id: doctor.to_string(),
            patient_id: patient.to_string(),
            date,
            status,
            symptoms: None,
            notes: None,
            created_at: Some(date),
            updated_at: Some(date),
            doctor: Some(AppointmentParty {
                id: doctor.to_string(),
                name: format!("Dr {}", doctor),
                specialization: Some("General".into()),
                photo_url: None,
            }),
            patient: Some(AppointmentParty {
                id: patient.to_string(),
                name: format!("Patient {}", patient),
                specialization: None,
                photo_url: None,
            }),
        });
    }

    fn maybe_fail(&self) -> Result<(), ApiError> {
        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ApiError::Network("simulated outage".into()));
        }
        Ok(())
    }

    fn page_of(&self, mut items: Vec<Appointment>, page: u32) -> Page<Appointment> {
        items.sort_by(|a, b| a.id.cmp(&b.id));
        paginate(items, page, PAGE_SIZE)
    }
}

fn paginate<T>(items: Vec<T>, page: u32, limit: usize) -> Page<T> {
    let total = items.len();
    let total_pages = total.div_ceil(limit).max(1) as u32;
    let start = (page.max(1) as usize - 1) * limit;
    Page {
        items: items.into_iter().skip(start).take(limit).collect(),
        page,
        limit: limit as u32,
        total: total as u64,
        total_pages,
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        self.maybe_fail()?;
        if request.password != "secret123" {
            return Err(ApiError::Authentication("Invalid email or password".into()));
        }
        let id = match request.role {
            Role::Patient => "p1",
            Role::Doctor => "d1",
        };
        Ok(LoginData {
            token: format!("token-{}", id),
            user: User {
                id: id.to_string(),
                name: "Test User".into(),
                email: request.email.clone(),
                role: request.role,
                photo_url: None,
            },
        })
    }

    async fn register_patient(&self, request: &PatientRegistration) -> Result<String, ApiError> {
        self.maybe_fail()?;
        Ok(format!("Patient {} registered", request.name))
    }

    async fn register_doctor(&self, request: &DoctorRegistration) -> Result<String, ApiError> {
        self.maybe_fail()?;
        Ok(format!("Doctor {} registered", request.name))
    }

    async fn list_doctors(&self, query: &DoctorQuery) -> Result<Page<Doctor>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        let doctors = self.doctors.lock().unwrap().clone();
        Ok(paginate(doctors, query.page, query.limit.max(1) as usize))
    }

    async fn list_specializations(&self) -> Result<Vec<String>, ApiError> {
        self.maybe_fail()?;
        let mut specs: Vec<String> = self
            .doctors
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.specialization.clone())
            .collect();
        specs.dedup();
        Ok(specs)
    }

    async fn patient_appointments(
        &self,
        query: &PatientAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        let items = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| query.status.matches(a.status))
            .cloned()
            .collect();
        Ok(self.page_of(items, query.page))
    }

    async fn doctor_appointments(
        &self,
        query: &DoctorAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_fail()?;
        let items = self
            .appointments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| query.status.matches(a.status))
            .filter(|a| query.date.map_or(true, |d| a.date.date_naive() == d))
            .cloned()
            .collect();
        Ok(self.page_of(items, query.page))
    }

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Option<Appointment>, ApiError> {
        self.maybe_fail()?;
        if let Some(message) = self.reject_next_create.lock().unwrap().take() {
            return Err(ApiError::Rejected { status: Some(409), message });
        }
        self.created.lock().unwrap().push(request.clone());
        let id = format!("new-{}", self.created.lock().unwrap().len());
        self.seed_appointment(&id, &request.doctor_id, "p1", AppointmentStatus::Pending);
        Ok(self.appointments.lock().unwrap().last().cloned())
    }

    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<String, ApiError> {
        self.maybe_fail()?;
        let mut appointments = self.appointments.lock().unwrap();
        let appointment = appointments
            .iter_mut()
            .find(|a| a.id == request.appointment_id)
            .ok_or_else(|| ApiError::Rejected {
                status: Some(404),
                message: "Appointment not found".into(),
            })?;
        if appointment.status.is_terminal() {
            return Err(ApiError::Rejected {
                status: Some(400),
                message: "Invalid status transition".into(),
            });
        }
        appointment.status = request.status.status();
        self.status_updates.lock().unwrap().push(request.clone());
        Ok(format!("Appointment marked as {}", request.status))
    }
}
