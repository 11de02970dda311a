//! Reqwest-backed client for the appointments REST API.
//!
//! Owns transport details only: bearer-token injection, envelope checks and
//! mapping of HTTP failures onto [`ApiError`].

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::client::config::ClientConfig;
use crate::client::utils::session_store::SessionStore;
use crate::common::error::ApiError;
use crate::common::models::{
    ApiEnvelope, Appointment, CreateAppointmentRequest, Doctor, DoctorAppointmentsQuery,
    DoctorQuery, DoctorRegistration, LoginData, LoginRequest, Page, PatientAppointmentsQuery,
    PatientRegistration, UpdateStatusRequest,
};

/// One method per endpoint of the remote API.
#[async_trait]
pub trait ApiClient: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError>;
    /// Returns the server's confirmation message.
    async fn register_patient(&self, request: &PatientRegistration) -> Result<String, ApiError>;
    async fn register_doctor(&self, request: &DoctorRegistration) -> Result<String, ApiError>;
    /// One server page of doctors, with the envelope's pagination totals.
    async fn list_doctors(&self, query: &DoctorQuery) -> Result<Page<Doctor>, ApiError>;
    async fn list_specializations(&self) -> Result<Vec<String>, ApiError>;
    async fn patient_appointments(
        &self,
        query: &PatientAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError>;
    async fn doctor_appointments(
        &self,
        query: &DoctorAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError>;
    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Option<Appointment>, ApiError>;
    /// Returns the server's confirmation message.
    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<String, ApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    /// Login and registration: no token, rejections are authentication errors.
    Public,
    Authenticated,
}

pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
}

impl HttpApiClient {
    pub fn new(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("cannot build HTTP client: {}", e)))?;
        Ok(Self { client, base_url: config.api_base_url.clone(), session })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        endpoint_url(&self.base_url, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: RequestBuilder,
        access: Access,
        fallback: &str,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let builder = match access {
            Access::Public => builder,
            Access::Authenticated => self.authorize(builder),
        };
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        debug!("[API] {} ({} bytes)", status, body.len());
        interpret_response(status, body.as_ref(), access, fallback)
    }

    async fn get(
        &self,
        path: &str,
        params: &[(&'static str, String)],
        fallback: &str,
    ) -> Result<ApiEnvelope<Value>, ApiError> {
        let url = self.endpoint(path)?;
        debug!("[API] GET {}", url.path());
        self.send(self.client.get(url).query(params), Access::Authenticated, fallback)
            .await
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginData, ApiError> {
        let url = self.endpoint("/auth/login")?;
        let envelope = self
            .send(self.client.post(url).json(request), Access::Public, "Login failed")
            .await?;
        required_data(envelope, "Login failed")
    }

    async fn register_patient(&self, request: &PatientRegistration) -> Result<String, ApiError> {
        let url = self.endpoint("/auth/register/patient")?;
        let envelope = self
            .send(self.client.post(url).json(request), Access::Public, "Registration failed")
            .await?;
        Ok(envelope.message.unwrap_or_else(|| "Registration successful".to_string()))
    }

    async fn register_doctor(&self, request: &DoctorRegistration) -> Result<String, ApiError> {
        let url = self.endpoint("/auth/register/doctor")?;
        let envelope = self
            .send(self.client.post(url).json(request), Access::Public, "Registration failed")
            .await?;
        Ok(envelope.message.unwrap_or_else(|| "Registration successful".to_string()))
    }

    async fn list_doctors(&self, query: &DoctorQuery) -> Result<Page<Doctor>, ApiError> {
        let envelope = self.get("/doctors", &query.params(), "Failed to fetch doctors").await?;
        into_page(envelope, query.page)
    }

    async fn list_specializations(&self) -> Result<Vec<String>, ApiError> {
        let envelope = self
            .get("/specializations", &[], "Failed to fetch specializations")
            .await?;
        optional_list(envelope)
    }

    async fn patient_appointments(
        &self,
        query: &PatientAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        let envelope = self
            .get("/appointments/patient", &query.params(), "Failed to fetch appointments")
            .await?;
        into_page(envelope, query.page)
    }

    async fn doctor_appointments(
        &self,
        query: &DoctorAppointmentsQuery,
    ) -> Result<Page<Appointment>, ApiError> {
        let envelope = self
            .get("/appointments/doctor", &query.params(), "Failed to fetch appointments")
            .await?;
        into_page(envelope, query.page)
    }

    async fn create_appointment(
        &self,
        request: &CreateAppointmentRequest,
    ) -> Result<Option<Appointment>, ApiError> {
        let url = self.endpoint("/appointments")?;
        let envelope = self
            .send(
                self.client.post(url).json(request),
                Access::Authenticated,
                "Failed to create appointment",
            )
            .await?;
        // Some deployments answer with the created record, others with a bare message.
        match envelope.data {
            Some(data) => match serde_json::from_value::<Appointment>(data) {
                Ok(appointment) => Ok(Some(appointment)),
                Err(e) => {
                    warn!("[API] Created appointment payload not understood: {}", e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    async fn update_status(&self, request: &UpdateStatusRequest) -> Result<String, ApiError> {
        let url = self.endpoint("/appointments/update-status")?;
        let envelope = self
            .send(
                self.client.patch(url).json(request),
                Access::Authenticated,
                "Failed to update appointment status",
            )
            .await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| format!("Appointment marked as {}", request.status)))
    }
}

fn endpoint_url(base: &Url, path: &str) -> Result<Url, ApiError> {
    let joined = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ApiError::Config(format!("bad endpoint {}: {}", joined, e)))
}

fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_decode() {
        ApiError::Decode(error.to_string())
    } else {
        ApiError::Network(error.to_string())
    }
}

/// Applies the envelope rules to a raw response.
///
/// `success: false` is a failure even on HTTP 200. Gateway errors count as
/// transient so reads retry them.
fn interpret_response(
    status: StatusCode,
    body: &[u8],
    access: Access,
    fallback: &str,
) -> Result<ApiEnvelope<Value>, ApiError> {
    let parsed = serde_json::from_slice::<ApiEnvelope<Value>>(body);
    let message = parsed
        .as_ref()
        .ok()
        .and_then(|env| env.message.clone())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());

    if !status.is_success() {
        return Err(match status {
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                ApiError::Network(format!("{} from server", status))
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Authentication(message),
            _ if access == Access::Public => ApiError::Authentication(message),
            _ => ApiError::Rejected { status: Some(status.as_u16()), message },
        });
    }

    let envelope = parsed.map_err(|e| ApiError::Decode(e.to_string()))?;
    if !envelope.success {
        return Err(match access {
            Access::Public => ApiError::Authentication(message),
            Access::Authenticated => ApiError::Rejected {
                status: envelope.status_code.or(Some(status.as_u16())),
                message,
            },
        });
    }
    Ok(envelope)
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

fn required_data<T: DeserializeOwned>(envelope: ApiEnvelope<Value>, what: &str) -> Result<T, ApiError> {
    match envelope.data {
        Some(data) => decode(data),
        None => Err(ApiError::Decode(format!("{}: response has no data", what))),
    }
}

fn optional_list<T: DeserializeOwned>(envelope: ApiEnvelope<Value>) -> Result<Vec<T>, ApiError> {
    match envelope.data {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(data) => decode(data),
    }
}

fn into_page<T: DeserializeOwned>(envelope: ApiEnvelope<Value>, requested_page: u32) -> Result<Page<T>, ApiError> {
    let items: Vec<T> = match envelope.data.clone() {
        Some(Value::Null) | None => Vec::new(),
        Some(data) => decode(data)?,
    };
    Ok(Page::from_envelope(&envelope, items, requested_page))
}
