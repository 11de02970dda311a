use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::client::services::api_client::ApiClient;
use crate::client::services::query_client::{QueryClient, QueryKey};
use crate::common::error::ApiError;
use crate::common::models::{
    Appointment, CreateAppointmentRequest, DoctorAppointmentsQuery, Page,
    PatientAppointmentsQuery, StatusUpdate, UpdateStatusRequest,
};

pub const APPOINTMENTS_NAMESPACE: &str = "appointments";
pub const DOCTORS_NAMESPACE: &str = "doctors";

#[derive(Clone)]
pub struct AppointmentsService {
    api: Arc<dyn ApiClient>,
    queries: QueryClient,
    stale_time: Duration,
}

impl AppointmentsService {
    pub fn new(api: Arc<dyn ApiClient>, queries: QueryClient, stale_time: Duration) -> Self {
        Self { api, queries, stale_time }
    }

    pub fn patient_key(query: &PatientAppointmentsQuery) -> QueryKey {
        QueryKey::new([
            APPOINTMENTS_NAMESPACE.to_string(),
            "patient".to_string(),
            query.status.key().to_string(),
            query.page.to_string(),
        ])
    }

    pub fn doctor_key(query: &DoctorAppointmentsQuery) -> QueryKey {
        QueryKey::new([
            APPOINTMENTS_NAMESPACE.to_string(),
            "doctor".to_string(),
            query.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            query.status.key().to_string(),
            query.page.to_string(),
        ])
    }

    pub async fn patient_appointments(
        &self,
        query: PatientAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        let api = self.api.clone();
        self.queries
            .fetch(Self::patient_key(&query), self.stale_time, move || {
                let api = api.clone();
                let query = query.clone();
                async move { api.patient_appointments(&query).await }
            })
            .await
    }

    pub async fn doctor_appointments(
        &self,
        query: DoctorAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        let api = self.api.clone();
        self.queries
            .fetch(Self::doctor_key(&query), self.stale_time, move || {
                let api = api.clone();
                let query = query.clone();
                async move { api.doctor_appointments(&query).await }
            })
            .await
    }

    /// Books a slot. Success invalidates every appointment and doctor list.
    pub async fn create(&self, request: CreateAppointmentRequest) -> Result<Option<Appointment>, ApiError> {
        let created = self.api.create_appointment(&request).await?;
        self.queries.invalidate_prefix(&[APPOINTMENTS_NAMESPACE]);
        self.queries.invalidate_prefix(&[DOCTORS_NAMESPACE]);
        info!("[APPOINTMENTS] Booked doctor {} at {}", request.doctor_id, request.date);
        Ok(created)
    }

    pub async fn update_status(
        &self,
        appointment_id: &str,
        status: StatusUpdate,
    ) -> Result<String, ApiError> {
        let request = UpdateStatusRequest { appointment_id: appointment_id.to_string(), status };
        let message = self.api.update_status(&request).await?;
        self.queries.invalidate_prefix(&[APPOINTMENTS_NAMESPACE]);
        info!("[APPOINTMENTS] {} -> {}", appointment_id, status);
        Ok(message)
    }

    pub async fn confirm(&self, appointment_id: &str) -> Result<String, ApiError> {
        self.update_status(appointment_id, StatusUpdate::Confirmed).await
    }

    pub async fn complete(&self, appointment_id: &str) -> Result<String, ApiError> {
        self.update_status(appointment_id, StatusUpdate::Completed).await
    }

    pub async fn cancel(&self, appointment_id: &str) -> Result<String, ApiError> {
        self.update_status(appointment_id, StatusUpdate::Cancelled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::services::fake_api::FakeApi;
    use crate::client::services::query_client::RetryPolicy;
    use crate::common::models::{AppointmentStatus, StatusFilter};
    use chrono::NaiveDate;
    use std::sync::atomic::Ordering;

    fn service(fake: Arc<FakeApi>) -> AppointmentsService {
        AppointmentsService::new(fake, QueryClient::new(RetryPolicy::new(0)), Duration::from_secs(300))
    }

    fn patient(status: StatusFilter) -> PatientAppointmentsQuery {
        PatientAppointmentsQuery { status, page: 1 }
    }

    #[tokio::test]
    async fn completing_moves_appointment_between_patient_lists() {
        let fake = Arc::new(FakeApi::new());
        fake.seed_appointment("a1", "d1", "p1", AppointmentStatus::Pending);
        let service = service(fake.clone());

        let pending = service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();
        assert_eq!(pending.items.len(), 1);
        let completed = service.patient_appointments(patient(StatusFilter::Completed)).await.unwrap();
        assert!(completed.items.is_empty());

        service.complete("a1").await.unwrap();

        let completed = service.patient_appointments(patient(StatusFilter::Completed)).await.unwrap();
        assert_eq!(completed.items[0].id, "a1");
        let pending = service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();
        assert!(pending.items.is_empty());
    }

    #[tokio::test]
    async fn repeated_reads_hit_cache_until_mutation() {
        let fake = Arc::new(FakeApi::new());
        fake.seed_appointment("a1", "d1", "p1", AppointmentStatus::Pending);
        let service = service(fake.clone());
        let query = DoctorAppointmentsQuery {
            date: NaiveDate::from_ymd_opt(2025, 6, 10),
            status: StatusFilter::All,
            page: 1,
        };

        service.doctor_appointments(query.clone()).await.unwrap();
        service.doctor_appointments(query.clone()).await.unwrap();
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);

        service.confirm("a1").await.unwrap();
        let page = service.doctor_appointments(query).await.unwrap();
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 2);
        assert_eq!(page.items[0].status, AppointmentStatus::Confirmed);
    }

    #[tokio::test]
    async fn failed_mutation_leaves_cache_untouched() {
        let fake = Arc::new(FakeApi::new());
        fake.seed_appointment("a1", "d1", "p1", AppointmentStatus::Cancelled);
        let service = service(fake.clone());
        service.patient_appointments(patient(StatusFilter::All)).await.unwrap();

        let err = service.complete("a1").await.unwrap_err();
        assert_eq!(err.user_message("Failed to update"), "Invalid status transition");

        service.patient_appointments(patient(StatusFilter::All)).await.unwrap();
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn booking_sends_iso_date_and_refreshes_lists() {
        let fake = Arc::new(FakeApi::new());
        let service = service(fake.clone());
        service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(11, 0, 0).unwrap();
        service.create(CreateAppointmentRequest::at("d1", start)).await.unwrap();
        assert_eq!(fake.created.lock().unwrap()[0].date, "2025-06-10T11:00:00.000Z");

        let pending = service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();
        assert_eq!(pending.items.len(), 1);
    }

    #[tokio::test]
    async fn rejected_booking_keeps_cache_and_server_message() {
        let fake = Arc::new(FakeApi::new());
        *fake.reject_next_create.lock().unwrap() = Some("Time slot already booked".into());
        let service = service(fake.clone());
        service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();

        let start = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap().and_hms_opt(11, 0, 0).unwrap();
        let err = service.create(CreateAppointmentRequest::at("d1", start)).await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Rejected { status: Some(409), message: "Time slot already booked".into() }
        );
        assert_eq!(err.user_message("Failed to book appointment"), "Time slot already booked");
        assert!(fake.created.lock().unwrap().is_empty());

        service.patient_appointments(patient(StatusFilter::Pending)).await.unwrap();
        assert_eq!(fake.list_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn keys_carry_full_parameter_tuple() {
        let key = AppointmentsService::doctor_key(&DoctorAppointmentsQuery {
            date: None,
            status: StatusFilter::Pending,
            page: 3,
        });
        assert_eq!(key.segments(), ["appointments", "doctor", "", "PENDING", "3"]);
    }
}
