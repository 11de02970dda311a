use std::sync::Arc;

use log::info;

use crate::client::models::forms::Registration;
use crate::client::services::api_client::ApiClient;
use crate::client::services::query_client::QueryClient;
use crate::client::utils::session_store::SessionStore;
use crate::common::error::ApiError;
use crate::common::models::{LoginRequest, Session};

/// Login, registration and logout. The only writer of the session store.
#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn ApiClient>,
    session: SessionStore,
    queries: QueryClient,
}

impl AuthService {
    pub fn new(api: Arc<dyn ApiClient>, session: SessionStore, queries: QueryClient) -> Self {
        Self { api, session, queries }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<Session, ApiError> {
        let data = self.api.login(&request).await?;
        if data.token.trim().is_empty() {
            return Err(ApiError::Authentication("Login failed".into()));
        }
        // A previous user's cached lists must never leak into this session.
        self.queries.clear();
        let session = self.session.set_auth(data.user, data.token);
        info!("[AUTH] Logged in as {} ({})", session.user.name, session.user.role.as_str());
        Ok(session)
    }

    pub async fn register(&self, registration: Registration) -> Result<String, ApiError> {
        let message = match &registration {
            Registration::Patient(request) => self.api.register_patient(request).await?,
            Registration::Doctor(request) => self.api.register_doctor(request).await?,
        };
        info!("[AUTH] Registration accepted");
        Ok(message)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.queries.clear();
        info!("[AUTH] Logged out");
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }
}
