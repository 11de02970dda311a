use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use keyring::Entry;
use log::{info, warn};

use crate::client::config::ClientConfig;
use crate::common::models::{Session, User};

const SERVICE: &str = "medibook_app";
const USER: &str = "medibook_session";

/// Durable slot holding the serialized session between runs.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<String>>;
    fn save(&self, payload: &str) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// OS keyring storage, with an opt-in plain file fallback.
pub struct KeyringPersistence {
    fallback: Option<FilePersistence>,
}

impl KeyringPersistence {
    pub fn new(fallback_path: Option<PathBuf>) -> Self {
        Self { fallback: fallback_path.map(FilePersistence::new) }
    }

    fn entry() -> Entry {
        Entry::new(SERVICE, USER)
    }
}

impl SessionPersistence for KeyringPersistence {
    fn load(&self) -> anyhow::Result<Option<String>> {
        match Self::entry().get_password() {
            Ok(payload) if !payload.trim().is_empty() => Ok(Some(payload)),
            Ok(_) => Ok(None),
            Err(_e) => match &self.fallback {
                Some(file) => file.load(),
                None => Ok(None),
            },
        }
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        match Self::entry().set_password(payload) {
            Ok(()) => Ok(()),
            Err(e) => match &self.fallback {
                Some(file) => {
                    file.save(payload)?;
                    warn!("[SESSION] Keyring unavailable, persisted session to fallback file");
                    Ok(())
                }
                None => Err(anyhow::anyhow!(
                    "keyring unavailable and file fallback disabled: {}",
                    e
                )),
            },
        }
    }

    fn clear(&self) -> anyhow::Result<()> {
        let _ = Self::entry().delete_password();
        match &self.fallback {
            Some(file) => file.clear(),
            None => Ok(()),
        }
    }
}

/// Plain file slot, only used when `KEYRING_FALLBACK=true`.
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionPersistence for FilePersistence {
    fn load(&self) -> anyhow::Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let payload = std::fs::read_to_string(&self.path)?;
        Ok(Some(payload).filter(|p| !p.trim().is_empty()))
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, payload)?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: &str) -> Self {
        Self { slot: Mutex::new(Some(payload.to_string())) }
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> anyhow::Result<Option<String>> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, payload: &str) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_string());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Process-wide holder of the current session.
///
/// Clones share the same state, so the API client, the GUI and the CLI all
/// observe a login or logout immediately. Only the auth flows call
/// [`SessionStore::set_auth`] and [`SessionStore::logout`].
#[derive(Clone)]
pub struct SessionStore {
    current: Arc<RwLock<Option<Session>>>,
    persistence: Arc<dyn SessionPersistence>,
}

impl SessionStore {
    pub fn new(persistence: Arc<dyn SessionPersistence>) -> Self {
        Self { current: Arc::new(RwLock::new(None)), persistence }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(Arc::new(KeyringPersistence::new(config.session_fallback_path())))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryPersistence::new()))
    }

    /// Loads the persisted session, if any. Corrupt payloads are discarded.
    pub fn rehydrate(&self) -> Option<Session> {
        let restored = match self.persistence.load() {
            Ok(Some(payload)) => match serde_json::from_str::<Session>(&payload) {
                Ok(session) if !session.token.trim().is_empty() => Some(session),
                Ok(_) => None,
                Err(e) => {
                    warn!("[SESSION] Discarding unreadable persisted session: {}", e);
                    let _ = self.persistence.clear();
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("[SESSION] Could not read persisted session: {}", e);
                None
            }
        };
        if restored.is_some() {
            info!("[SESSION] Restored saved session (token redacted)");
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = restored.clone();
        restored
    }

    pub fn set_auth(&self, user: User, token: String) -> Session {
        let session = Session { user, token };
        match serde_json::to_string(&session) {
            Ok(payload) => {
                if let Err(e) = self.persistence.save(&payload) {
                    // the in-memory session still works for this run
                    warn!("[SESSION] Session not persisted: {}", e);
                }
            }
            Err(e) => warn!("[SESSION] Session not serializable: {}", e),
        }
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        session
    }

    pub fn logout(&self) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
        if let Err(e) = self.persistence.clear() {
            warn!("[SESSION] Failed to evict persisted session: {}", e);
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.current.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn user(&self) -> Option<User> {
        self.session().map(|s| s.user)
    }

    pub fn token(&self) -> Option<String> {
        self.session().map(|s| s.token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
