//! Scheduled audits and per-user notifications.

use std::sync::Mutex;

use stocktake_audit::{ScheduleAudit, ScheduledAudit};
use stocktake_auth::Role;

use crate::error::RepositoryError;
use crate::store::{KeyValueStore, StoreError, load_json, save_json};

pub const SCHEDULES_KEY: &str = "audit_schedules";

pub struct ScheduleRepository<S> {
    store: S,
    write: Mutex<()>,
}

impl<S> ScheduleRepository<S>
where
    S: KeyValueStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            write: Mutex::new(()),
        }
    }

    /// All schedules, in creation order.
    pub fn list(&self) -> Result<Vec<ScheduledAudit>, StoreError> {
        Ok(load_json(&self.store, SCHEDULES_KEY)?.unwrap_or_default())
    }

    pub fn add(&self, command: ScheduleAudit) -> Result<ScheduledAudit, RepositoryError> {
        let scheduled = command.into_scheduled()?;

        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;
        let mut all = self.list()?;
        all.push(scheduled.clone());
        save_json(&self.store, SCHEDULES_KEY, &all)?;

        tracing::info!(
            schedule_id = %scheduled.id,
            store = %scheduled.store_name,
            assigned_to = %scheduled.assigned_to,
            due = %scheduled.due_date,
            "audit scheduled"
        );
        Ok(scheduled)
    }

    /// Mark pending schedules for `store_name` assigned to `username` as
    /// completed. Returns how many changed.
    pub fn complete(&self, store_name: &str, username: &str) -> Result<usize, StoreError> {
        let _guard = self.write.lock().map_err(|_| StoreError::Poisoned)?;
        let mut all = self.list()?;

        let mut changed = 0;
        for schedule in all
            .iter_mut()
            .filter(|s| s.is_pending() && s.is_assigned_to(username) && s.is_for_store(store_name))
        {
            schedule.complete();
            changed += 1;
        }

        if changed > 0 {
            save_json(&self.store, SCHEDULES_KEY, &all)?;
            tracing::info!(store = store_name, username, changed, "scheduled audits completed");
        }
        Ok(changed)
    }

    /// Pending schedules assigned to `username`, soonest first.
    pub fn pending_for(&self, username: &str) -> Result<Vec<ScheduledAudit>, StoreError> {
        let mut pending: Vec<ScheduledAudit> = self
            .list()?
            .into_iter()
            .filter(|s| s.is_pending() && s.is_assigned_to(username))
            .collect();
        pending.sort_by_key(|s| s.due_date);
        Ok(pending)
    }

    /// Pending schedules a user may see: their own, or all of them for admins.
    pub fn visible_to(&self, username: &str, role: Role) -> Result<Vec<ScheduledAudit>, StoreError> {
        if !role.is_admin() {
            return self.pending_for(username);
        }
        let mut pending: Vec<ScheduledAudit> =
            self.list()?.into_iter().filter(ScheduledAudit::is_pending).collect();
        pending.sort_by_key(|s| s.due_date);
        Ok(pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use stocktake_core::DomainError;

    fn command(store: &str, assignee: &str, day: u32) -> ScheduleAudit {
        ScheduleAudit {
            store_name: store.to_string(),
            assigned_to: assignee.to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 11, day),
            assigned_by: "admin".to_string(),
        }
    }

    #[test]
    fn add_validates_command() {
        let repo = ScheduleRepository::new(InMemoryStore::new());
        let mut cmd = command("Centro", "maria", 3);
        cmd.due_date = None;

        let err = repo.add(cmd).unwrap_err();
        assert!(matches!(err, RepositoryError::Domain(DomainError::Validation(_))));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn notifications_are_per_user_and_sorted_by_due_date() {
        let repo = ScheduleRepository::new(InMemoryStore::new());
        repo.add(command("Norte", "maria", 9)).unwrap();
        repo.add(command("Centro", "maria", 2)).unwrap();
        repo.add(command("Sur", "luis", 1)).unwrap();

        let stores: Vec<String> = repo
            .pending_for("maria")
            .unwrap()
            .into_iter()
            .map(|s| s.store_name)
            .collect();
        assert_eq!(stores, vec!["Centro", "Norte"]);
    }

    #[test]
    fn complete_matches_store_case_insensitively_for_that_user_only() {
        let repo = ScheduleRepository::new(InMemoryStore::new());
        repo.add(command("Tienda Centro", "maria", 2)).unwrap();
        repo.add(command("Tienda Centro", "luis", 2)).unwrap();

        assert_eq!(repo.complete("tienda centro", "maria").unwrap(), 1);
        assert!(repo.pending_for("maria").unwrap().is_empty());
        assert_eq!(repo.pending_for("luis").unwrap().len(), 1);

        // Already completed schedules are not counted again.
        assert_eq!(repo.complete("Tienda Centro", "maria").unwrap(), 0);
    }

    #[test]
    fn admins_see_every_pending_schedule() {
        let repo = ScheduleRepository::new(InMemoryStore::new());
        repo.add(command("Norte", "maria", 9)).unwrap();
        repo.add(command("Sur", "luis", 1)).unwrap();
        repo.complete("Sur", "luis").unwrap();
        repo.add(command("Este", "luis", 4)).unwrap();

        assert_eq!(repo.visible_to("admin", Role::Admin).unwrap().len(), 2);
        let own = repo.visible_to("luis", Role::Auditor).unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].store_name, "Este");
    }
}
