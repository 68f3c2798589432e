use crate::config::Config;
use crate::db::{seed, AnnouncementStore, EmployeeStore};
use crate::domain::password_reset::ResetFlow;
use crate::domain::uploads::DocumentUploadState;
use crate::identity::{CodeDelivery, CredentialDirectory, IdentityError, IdentityProvider, LogDelivery};
use crate::middleware::RateLimiter;
use crate::web::session::SessionStore;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct AppState {
    pub config: Config,
    pub employees: EmployeeStore,
    pub announcements: AnnouncementStore,
    pub directory: Arc<dyn IdentityProvider>,
    pub delivery: Arc<dyn CodeDelivery>,
    pub sessions: SessionStore,
    pub reset_flows: Arc<RwLock<HashMap<Uuid, PendingReset>>>, // flow_id -> PendingReset
    pub uploads: Arc<RwLock<HashMap<String, DocumentUploadState>>>, // admin user_id -> selections
    pub login_limiter: RateLimiter,
}

#[derive(Clone)]
pub struct PendingReset {
    pub flow: ResetFlow,
    pub started_at: DateTime<Utc>,
}

impl PendingReset {
    pub fn is_expired(&self, ttl: Duration) -> bool {
        Utc::now() - self.started_at > ttl
    }
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// State seeded with the sample employees, announcements and the two
    /// demo accounts.
    pub async fn seeded(config: Config) -> Result<Self, IdentityError> {
        let directory = CredentialDirectory::seeded().await?;
        let login_limiter = RateLimiter::new(config.login_attempts_per_minute, 60);
        Ok(Self {
            config,
            employees: EmployeeStore::new(seed::sample_employees()),
            announcements: AnnouncementStore::new(seed::sample_announcements()),
            directory: Arc::new(directory),
            delivery: Arc::new(LogDelivery),
            sessions: SessionStore::default(),
            reset_flows: Arc::new(RwLock::new(HashMap::new())),
            uploads: Arc::new(RwLock::new(HashMap::new())),
            login_limiter,
        })
    }

    pub fn reset_flow_ttl(&self) -> Duration {
        Duration::minutes(self.config.reset_flow_ttl_minutes)
    }

    /// Drops expired sessions and reset flows. Returns how many of each.
    pub async fn purge_expired(&self) -> (usize, usize) {
        let sessions = self.sessions.purge_expired().await;
        let ttl = self.reset_flow_ttl();
        let mut flows = self.reset_flows.write().await;
        let before = flows.len();
        flows.retain(|_, pending| !pending.is_expired(ttl));
        let resets = before - flows.len();
        drop(flows);
        self.login_limiter.cleanup().await;
        (sessions, resets)
    }
}
