pub mod api_client;
pub mod appointments_service;
pub mod auth_service;
pub mod doctors_service;
pub mod query_client;

#[cfg(test)]
pub mod fake_api;

use std::sync::Arc;

use crate::client::config::ClientConfig;
use crate::client::utils::session_store::SessionStore;
use crate::common::error::ApiError;

use self::api_client::{ApiClient, HttpApiClient};
use self::appointments_service::AppointmentsService;
use self::auth_service::AuthService;
use self::doctors_service::DoctorsService;
use self::query_client::{QueryClient, RetryPolicy};

/// Every service the GUI and the CLI talk to, sharing one cache and one session.
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub doctors: DoctorsService,
    pub appointments: AppointmentsService,
}

impl Services {
    pub fn new(config: &ClientConfig, api: Arc<dyn ApiClient>, session: SessionStore) -> Self {
        let queries = QueryClient::new(RetryPolicy::new(config.query_retries));
        Self {
            auth: AuthService::new(api.clone(), session, queries.clone()),
            doctors: DoctorsService::new(
                api.clone(),
                queries.clone(),
                config.doctors_fetch_limit,
                config.stale_time,
            ),
            appointments: AppointmentsService::new(api, queries, config.stale_time),
        }
    }

    /// Wires the HTTP client against the configured API.
    pub fn connect(config: &ClientConfig, session: SessionStore) -> Result<Self, ApiError> {
        let api = HttpApiClient::new(config, session.clone())?;
        Ok(Self::new(config, Arc::new(api), session))
    }

    pub fn session(&self) -> &SessionStore {
        self.auth.session()
    }
}
