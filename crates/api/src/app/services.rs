//! Service wiring: repositories over the configured store, plus the
//! in-memory login tokens and open audit sessions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use stocktake_audit::AuditSession;
use stocktake_core::{Entity, SessionId};
use stocktake_infra::{
    HistoryRepository, InMemoryStore, JsonFileStore, KeyValueStore, RepositoryError, ScheduleRepository,
    StoreError, UserDirectory,
};
use uuid::Uuid;

use crate::config::ApiConfig;
use crate::context::PrincipalContext;

pub type SharedStore = Arc<dyn KeyValueStore>;

pub struct AppServices {
    users: UserDirectory<SharedStore>,
    history: HistoryRepository<SharedStore>,
    schedules: ScheduleRepository<SharedStore>,
    logins: Mutex<HashMap<String, PrincipalContext>>,
    audits: Mutex<HashMap<SessionId, AuditSession>>,
}

/// Open the configured store and seed the default administrator.
pub fn build_services(config: &ApiConfig) -> Result<AppServices, RepositoryError> {
    let store: SharedStore = match &config.data_dir {
        Some(dir) => Arc::new(JsonFileStore::open(dir)?),
        None => {
            tracing::info!("no data directory configured; using in-memory storage");
            Arc::new(InMemoryStore::new())
        }
    };

    let services = AppServices::new(store);
    services.users.initialize(&config.admin_password)?;
    Ok(services)
}

impl AppServices {
    pub fn new(store: SharedStore) -> Self {
        Self {
            users: UserDirectory::new(store.clone()),
            history: HistoryRepository::new(store.clone()),
            schedules: ScheduleRepository::new(store),
            logins: Mutex::new(HashMap::new()),
            audits: Mutex::new(HashMap::new()),
        }
    }

    pub fn users(&self) -> &UserDirectory<SharedStore> {
        &self.users
    }

    pub fn history(&self) -> &HistoryRepository<SharedStore> {
        &self.history
    }

    pub fn schedules(&self) -> &ScheduleRepository<SharedStore> {
        &self.schedules
    }

    // ── logins ───────────────────────────────────────────────────────────

    /// Check credentials and issue an opaque bearer token.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<(String, PrincipalContext)>, StoreError> {
        let Some(user) = self.users.authenticate(username, password)? else {
            return Ok(None);
        };

        let token = Uuid::new_v4().simple().to_string();
        let principal = PrincipalContext::from(&user);
        self.logins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone(), principal.clone());

        tracing::info!(username = principal.username(), role = %principal.role(), "user logged in");
        Ok(Some((token, principal)))
    }

    pub fn logout(&self, token: &str) -> bool {
        self.logins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .is_some()
    }

    pub fn principal_for(&self, token: &str) -> Option<PrincipalContext> {
        self.logins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()
    }

    /// Drop every token held by `username` (used when the account is deleted).
    pub fn revoke_logins(&self, username: &str) {
        self.logins
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, principal| principal.username() != username);
    }

    // ── audit sessions ───────────────────────────────────────────────────

    pub fn open_audit(&self, session: AuditSession) -> SessionId {
        let id = *session.id();
        self.audits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, session);
        id
    }

    /// Run `f` against an open session. `None` if the id is unknown.
    pub fn with_audit<R>(&self, id: &SessionId, f: impl FnOnce(&mut AuditSession) -> R) -> Option<R> {
        let mut audits = self.audits.lock().unwrap_or_else(PoisonError::into_inner);
        audits.get_mut(id).map(f)
    }

    pub fn close_audit(&self, id: &SessionId) -> Option<AuditSession> {
        self.audits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktake_audit::{AuditSetup, InventoryItem};
    use stocktake_auth::Role;
    use chrono::Utc;

    fn services() -> AppServices {
        build_services(&ApiConfig::in_memory("pw")).unwrap()
    }

    #[test]
    fn login_issues_distinct_tokens() {
        let services = services();
        let (t1, principal) = services.login("admin", "pw").unwrap().unwrap();
        let (t2, _) = services.login("admin", "pw").unwrap().unwrap();

        assert_ne!(t1, t2);
        assert_eq!(principal.role(), Role::Admin);
        assert_eq!(services.principal_for(&t1), Some(principal));
        assert!(services.login("admin", "nope").unwrap().is_none());
    }

    #[test]
    fn logout_and_revoke_invalidate_tokens() {
        let services = services();
        let (t1, _) = services.login("admin", "pw").unwrap().unwrap();
        let (t2, _) = services.login("admin", "pw").unwrap().unwrap();

        assert!(services.logout(&t1));
        assert!(!services.logout(&t1));
        assert!(services.principal_for(&t1).is_none());

        services.revoke_logins("admin");
        assert!(services.principal_for(&t2).is_none());
    }

    #[test]
    fn audits_are_addressable_until_closed() {
        let services = services();
        let session = AuditSetup {
            store_name: "Centro".to_string(),
            auditor_name: "Ana".to_string(),
            items: vec![InventoryItem::new("A1", "Phone", 1)],
        }
        .start(Utc::now())
        .unwrap();

        let id = services.open_audit(session);
        assert_eq!(services.with_audit(&id, |s| s.store_name().to_string()).as_deref(), Some("Centro"));
        assert!(services.close_audit(&id).is_some());
        assert!(services.with_audit(&id, |_| ()).is_none());
    }
}
