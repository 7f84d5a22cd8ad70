use std::sync::Arc;

use tokio::sync::watch;

use super::ClientError;

pub const SIGN_IN_PATH: &str = "/signin";

/// Routes reachable without a session.
const PUBLIC_PATHS: &[&str] = &[SIGN_IN_PATH, "/signup"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// The external identity service. The dashboard only observes its session
/// and asks it to end one.
pub trait IdentityProvider: Send + Sync {
    /// Receiver that always holds the current session, `None` when signed out.
    fn subscribe(&self) -> watch::Receiver<Option<SessionUser>>;

    fn sign_out(&self) -> Result<(), ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(&'static str),
}

/// Session state handed to every page.
#[derive(Clone)]
pub struct Session {
    provider: Arc<dyn IdentityProvider>,
    observer: watch::Receiver<Option<SessionUser>>,
}

impl Session {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let observer = provider.subscribe();
        Self { provider, observer }
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.observer.borrow().clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.observer.borrow().is_some()
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.provider.sign_out()
    }

    /// Private routes redirect to the sign-in page when nobody is signed in.
    pub fn guard(&self, path: &str) -> RouteDecision {
        if PUBLIC_PATHS.contains(&path) || self.is_signed_in() {
            RouteDecision::Allow
        } else {
            RouteDecision::Redirect(SIGN_IN_PATH)
        }
    }

    /// Waits for the provider to report a different session. `None` once the
    /// provider is gone.
    pub async fn changed(&mut self) -> Option<Option<SessionUser>> {
        self.observer.changed().await.ok()?;
        Some(self.observer.borrow_and_update().clone())
    }
}

/// Provider whose session is set locally, for development and tests.
#[derive(Debug)]
pub struct LocalIdentity {
    sender: watch::Sender<Option<SessionUser>>,
}

impl LocalIdentity {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    pub fn sign_in(&self, user: SessionUser) {
        self.sender.send_replace(Some(user));
    }
}

impl Default for LocalIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityProvider for LocalIdentity {
    fn subscribe(&self) -> watch::Receiver<Option<SessionUser>> {
        self.sender.subscribe()
    }

    fn sign_out(&self) -> Result<(), ClientError> {
        self.sender.send_replace(None);
        Ok(())
    }
}
