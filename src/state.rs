use crate::config::Config;
use crate::errors::GatewayError;
use crate::gateway::Gateway;
use crate::mock::ClassFilter;
use crate::models::ScheduledActivity;
use crate::navigation::Navigator;
use crate::render::{Dom, Slot, render_activity_list, render_day_to_day};
use crate::session::SessionStore;
use crate::toast::{Severity, ToastService};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthTab {
    #[default]
    Login,
    Register,
}

impl AuthTab {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "login" => Some(Self::Login),
            "register" => Some(Self::Register),
            _ => None,
        }
    }
}

/// Which auth form is showing and what the login email field is pre-filled with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthView {
    pub tab: AuthTab,
    pub email: Option<String>,
}

/// Everything one client instance knows: session, navigation, rendered slots,
/// the toast and the last fetched agenda.
#[derive(Debug)]
pub struct ClientState {
    pub session: SessionStore,
    pub navigator: Navigator,
    pub dom: Dom,
    pub toasts: ToastService,
    pub auth_view: AuthView,
    pub activities: Vec<ScheduledActivity>,
    pub class_filter: ClassFilter,
}

impl ClientState {
    pub fn new(session: SessionStore) -> Self {
        Self {
            session,
            navigator: Navigator::default(),
            dom: Dom::default(),
            toasts: ToastService::default(),
            auth_view: AuthView::default(),
            activities: Vec::new(),
            class_filter: ClassFilter::default(),
        }
    }

    pub fn report(&mut self, err: &GatewayError) {
        self.toasts.show(err.to_string(), Severity::Error);
    }

    /// Repaints every view fed by the agenda, including the live counts.
    pub fn repaint_activities(&mut self) {
        render_day_to_day(&mut self.dom, &self.activities);
        render_activity_list(&mut self.dom, Slot::PlannerList, &self.activities);
    }

    /// Drops everything fetched under the previous session.
    pub fn reset_views(&mut self) {
        self.navigator.reset();
        self.dom = Dom::default();
        self.activities.clear();
        self.class_filter = ClassFilter::default();
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub gateway: Arc<dyn Gateway>,
    pub client: Arc<Mutex<ClientState>>,
}

impl AppState {
    pub fn new(config: Config, gateway: Arc<dyn Gateway>, session: SessionStore) -> Self {
        Self {
            config: Arc::new(config),
            gateway,
            client: Arc::new(Mutex::new(ClientState::new(session))),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.client.lock().await.session.token().map(str::to_string)
    }
}
