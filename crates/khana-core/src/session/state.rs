use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::config::SessionSettings;
use crate::error::{Result, ValidationError};
use crate::storage::{self, DurableStore, USER_KEY};
use crate::user::{Role, UserSession};

/// Holder of the current authenticated identity.
///
/// At most one session exists per holder. Credentials are not checked
/// against anything: any non-empty email/password pair succeeds and the
/// caller-declared role is taken as given.
///
/// The loading flag starts `true` and clears once [`SessionState::restore`]
/// has run; it is raised again for the duration of a login or register.
pub struct SessionState {
    current: RwLock<Option<UserSession>>,
    loading: AtomicBool,
    store: Arc<dyn DurableStore>,
    settings: SessionSettings,
}

impl SessionState {
    /// Creates an empty holder. Call [`restore`](Self::restore) before use.
    pub fn new(store: Arc<dyn DurableStore>, settings: SessionSettings) -> Self {
        Self {
            current: RwLock::new(None),
            loading: AtomicBool::new(true),
            store,
            settings,
        }
    }

    /// Creates a holder and rehydrates it from storage.
    pub async fn open(store: Arc<dyn DurableStore>, settings: SessionSettings) -> Self {
        let state = Self::new(store, settings);
        state.restore().await;
        state
    }

    /// Rehydrates the session from durable storage.
    ///
    /// An absent or malformed record leaves the session empty.
    pub async fn restore(&self) {
        let restored: Option<UserSession> =
            storage::load_json_or_none(self.store.as_ref(), USER_KEY).await;
        if let Some(ref session) = restored {
            tracing::debug!(user_id = %session.id, role = %session.role, "Restored session");
        }
        *self.current.write().await = restored;
        self.loading.store(false, Ordering::SeqCst);
    }

    /// Logs in with any non-empty credentials.
    ///
    /// The display name is the local part of the email.
    pub async fn login(&self, email: &str, password: &str, role: Role) -> Result<UserSession> {
        require("email", email)?;
        require("password", password)?;

        let name = UserSession::name_from_email(email.trim()).to_string();
        self.establish(name, email.trim(), role).await
    }

    /// Registers and logs in under the supplied display name.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<UserSession> {
        require("name", name)?;
        require("email", email)?;
        require("password", password)?;

        self.establish(name.trim().to_string(), email.trim(), role)
            .await
    }

    /// Clears the session in memory and in storage.
    pub async fn logout(&self) {
        let previous = self.current.write().await.take();
        if let Err(e) = self.store.remove(USER_KEY).await {
            tracing::warn!(error = %e, "Failed to remove stored session");
        }
        if let Some(session) = previous {
            tracing::info!(user_id = %session.id, "Logged out");
        }
    }

    /// Returns a copy of the current session, if any.
    pub async fn current(&self) -> Option<UserSession> {
        self.current.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    async fn establish(&self, name: String, email: &str, role: Role) -> Result<UserSession> {
        self.loading.store(true, Ordering::SeqCst);

        // Stand-in for a network round trip
        let latency = self.settings.simulated_latency();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let session = UserSession::synthesize(
            name,
            email,
            role,
            Some(self.settings.avatar_placeholder.clone()),
        );

        *self.current.write().await = Some(session.clone());
        storage::persist_json(self.store.as_ref(), USER_KEY, &session).await;
        self.loading.store(false, Ordering::SeqCst);

        tracing::info!(user_id = %session.id, role = %session.role, "Session established");
        Ok(session)
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn instant() -> SessionSettings {
        SessionSettings {
            simulated_latency_ms: 0,
            ..SessionSettings::default()
        }
    }

    async fn open_with(store: Arc<MemoryStore>) -> SessionState {
        SessionState::open(store, instant()).await
    }

    #[tokio::test]
    async fn test_loading_until_restored() {
        let store = Arc::new(MemoryStore::new());
        let state = SessionState::new(store, instant());
        assert!(state.is_loading());

        state.restore().await;
        assert!(!state.is_loading());
        assert!(state.current().await.is_none());
    }

    #[tokio::test]
    async fn test_login_synthesizes_identity() {
        let store = Arc::new(MemoryStore::new());
        let state = open_with(store.clone()).await;

        let session = state
            .login("priya@example.com", "anything", Role::Chef)
            .await
            .unwrap();

        assert_eq!(session.name, "priya");
        assert_eq!(session.email, "priya@example.com");
        assert_eq!(session.role, Role::Chef);
        assert!(session.avatar.is_some());
        assert_eq!(state.current().await, Some(session));
        assert!(store.contains(USER_KEY).await);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials() {
        let state = open_with(Arc::new(MemoryStore::new())).await;

        let err = state.login("", "pw", Role::Customer).await.unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::MissingField("email"))
        );

        let err = state
            .login("a@b.com", "  ", Role::Customer)
            .await
            .unwrap_err();
        assert_eq!(
            err.as_validation(),
            Some(&ValidationError::MissingField("password"))
        );
        assert!(!state.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_uses_supplied_name() {
        let state = open_with(Arc::new(MemoryStore::new())).await;
        let session = state
            .register("Maria Rossi", "maria@example.com", "pw", Role::Customer)
            .await
            .unwrap();
        assert_eq!(session.name, "Maria Rossi");
        assert_eq!(session.role, Role::Customer);
    }

    #[tokio::test]
    async fn test_login_overwrites_existing_session() {
        let state = open_with(Arc::new(MemoryStore::new())).await;
        state.login("a@x.com", "pw", Role::Chef).await.unwrap();
        let second = state.login("b@x.com", "pw", Role::Admin).await.unwrap();
        assert_eq!(state.current().await, Some(second));
    }

    #[tokio::test]
    async fn test_logout_clears_memory_and_storage() {
        let store = Arc::new(MemoryStore::new());
        let state = open_with(store.clone()).await;
        state.login("a@x.com", "pw", Role::Customer).await.unwrap();

        state.logout().await;

        assert!(state.current().await.is_none());
        assert!(!store.contains(USER_KEY).await);

        // Logging out again is harmless
        state.logout().await;
    }

    #[tokio::test]
    async fn test_restore_roundtrip() {
        let store = Arc::new(MemoryStore::new());
        let first = open_with(store.clone()).await;
        let session = first
            .register("Priya", "priya@example.com", "pw", Role::Chef)
            .await
            .unwrap();

        let second = open_with(store).await;
        assert_eq!(second.current().await, Some(session));
    }

    #[tokio::test]
    async fn test_restore_malformed_fails_closed() {
        let store = Arc::new(MemoryStore::with_entries([(USER_KEY, "{\"id\": 1")]));
        let state = open_with(store).await;
        assert!(state.current().await.is_none());
        assert!(!state.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_waits_for_simulated_latency() {
        let state = SessionState::open(
            Arc::new(MemoryStore::new()),
            SessionSettings::default(),
        )
        .await;

        let started = tokio::time::Instant::now();
        state.login("a@x.com", "pw", Role::Customer).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(1000));
    }
}
