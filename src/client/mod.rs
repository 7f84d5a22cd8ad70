//! Typed client for the dashboard.
//!
//! Each entity page is a [`ResourcePage`] driven through an explicit
//! [`ClientContext`] holding the API client, the session, the theme and the
//! toast slot. Nothing is looked up ambiently.

pub mod api;
pub mod page;
pub mod session;
pub mod table;
pub mod theme;
pub mod toast;

use std::sync::Arc;

pub use api::{ApiClient, ClientError, ClientResource};
pub use page::{PageState, ResourcePage};
pub use session::{IdentityProvider, LocalIdentity, RouteDecision, Session, SessionUser};
pub use table::{SortDirection, TablePage, TableView};
pub use theme::ThemePreference;
pub use toast::{Toast, ToastKind, Toaster};

/// Shared by every page. Clones share the session, theme and toast slot.
#[derive(Clone)]
pub struct ClientContext {
    pub api: ApiClient,
    pub session: Session,
    pub theme: ThemePreference,
    pub toaster: Toaster,
}

impl ClientContext {
    pub fn new(api: ApiClient, provider: Arc<dyn IdentityProvider>, theme: ThemePreference) -> Self {
        Self {
            api,
            session: Session::new(provider),
            theme,
            toaster: Toaster::new(),
        }
    }
}
