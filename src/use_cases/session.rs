// Explicit session context shared by the components that talk to the game server.
//
// Built once at startup, handed to whoever needs it, and cleared on logout.

use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub profile_id: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            profile_id: None,
            display_name: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that starts out holding `session`.
    pub fn with_session(session: Session) -> Self {
        Self {
            current: Arc::new(RwLock::new(Some(session))),
        }
    }

    pub async fn initialize(&self, session: Session) {
        tracing::debug!(profile_id = ?session.profile_id, "session initialized");
        *self.current.write().await = Some(session);
    }

    /// Attaches profile details to the active session, if any.
    pub async fn set_profile(&self, profile_id: impl Into<String>, display_name: impl Into<String>) {
        if let Some(session) = self.current.write().await.as_mut() {
            session.profile_id = Some(profile_id.into());
            session.display_name = Some(display_name.into());
        }
    }

    pub async fn logout(&self) {
        let previous = self.current.write().await.take();
        if previous.is_some() {
            tracing::debug!("session cleared");
        }
    }

    pub async fn is_authenticated(&self) -> bool {
        self.current.read().await.is_some()
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    pub async fn bearer_token(&self) -> Option<String> {
        self.current
            .read()
            .await
            .as_ref()
            .map(|session| session.access_token.clone())
    }
}
