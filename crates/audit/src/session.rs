//! Audit session lifecycle: setup → active counting → completed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktake_core::{DomainError, DomainResult, Entity, SessionId};

use crate::history::HistoryEntry;
use crate::item::InventoryItem;
use crate::ledger::Ledger;
use crate::reconcile::Reconciliation;
use crate::station::{LastScan, ScanError, ScanOutcome, ScanStation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Active,
    Completed,
}

/// Everything needed before counting can start.
#[derive(Debug, Clone, Default)]
pub struct AuditSetup {
    pub store_name: String,
    pub auditor_name: String,
    pub items: Vec<InventoryItem>,
}

impl AuditSetup {
    /// Validate the setup and open an active session.
    pub fn start(self, now: DateTime<Utc>) -> DomainResult<AuditSession> {
        if self.store_name.trim().is_empty() {
            return Err(DomainError::validation("store name is required"));
        }
        if self.auditor_name.trim().is_empty() {
            return Err(DomainError::validation("auditor name is required"));
        }
        if self.items.is_empty() {
            return Err(DomainError::validation("inventory must contain at least one item"));
        }

        let session = AuditSession {
            id: SessionId::new(),
            store_name: self.store_name.trim().to_string(),
            auditor_name: self.auditor_name.trim().to_string(),
            started_at: now,
            completed_at: None,
            status: AuditStatus::Active,
            observations: None,
            station: ScanStation::new(Ledger::new(self.items)),
        };

        tracing::info!(
            session_id = %session.id,
            store = %session.store_name,
            items = session.station.ledger().len(),
            "audit session started"
        );
        Ok(session)
    }
}

/// One store count. Items are frozen once the session is completed.
#[derive(Debug, Clone)]
pub struct AuditSession {
    id: SessionId,
    store_name: String,
    auditor_name: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    status: AuditStatus,
    observations: Option<String>,
    station: ScanStation,
}

impl AuditSession {
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    pub fn auditor_name(&self) -> &str {
        &self.auditor_name
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    pub fn status(&self) -> AuditStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == AuditStatus::Active
    }

    pub fn observations(&self) -> Option<&str> {
        self.observations.as_deref()
    }

    pub fn station(&self) -> &ScanStation {
        &self.station
    }

    pub fn ledger(&self) -> &Ledger {
        self.station.ledger()
    }

    pub fn scan(&mut self, raw: &str, now: DateTime<Utc>) -> Result<ScanOutcome, ScanError> {
        self.station_mut()?.submit(raw, now)
    }

    pub fn confirm_quantity(&mut self, input: &str, now: DateTime<Utc>) -> Result<LastScan, ScanError> {
        self.station_mut()?.confirm_quantity(input, now)
    }

    pub fn cancel_quantity(&mut self) -> Result<bool, ScanError> {
        Ok(self.station_mut()?.cancel_quantity())
    }

    pub fn set_manual_entry(&mut self, enabled: bool) -> Result<(), ScanError> {
        self.station_mut()?.set_manual_entry(enabled);
        Ok(())
    }

    /// Free-text notes printed on the report. Blank text clears them.
    pub fn set_observations(&mut self, observations: Option<String>) {
        self.observations = observations
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
    }

    /// Close the session. Any pending quantity request is discarded.
    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == AuditStatus::Completed {
            return Err(DomainError::conflict("audit session already completed"));
        }
        self.station.cancel_quantity();
        self.status = AuditStatus::Completed;
        self.completed_at = Some(now);

        tracing::info!(
            session_id = %self.id,
            discrepancies = self.summary().discrepancy_count,
            "audit session completed"
        );
        Ok(())
    }

    pub fn summary(&self) -> Reconciliation {
        Reconciliation::of(self.ledger().items())
    }

    pub fn history_entry(&self) -> HistoryEntry {
        let summary = self.summary();
        HistoryEntry {
            id: self.id,
            store_name: self.store_name.clone(),
            date: self.started_at,
            auditor_name: self.auditor_name.clone(),
            total_items: summary.total_items,
            total_discrepancies: summary.discrepancy_count,
        }
    }

    fn station_mut(&mut self) -> Result<&mut ScanStation, ScanError> {
        match self.status {
            AuditStatus::Active => Ok(&mut self.station),
            AuditStatus::Completed => Err(ScanError::SessionClosed),
        }
    }
}

impl Entity for AuditSession {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> AuditSetup {
        AuditSetup {
            store_name: "Tienda Centro".to_string(),
            auditor_name: "María Pérez".to_string(),
            items: vec![
                InventoryItem::new("A1", "Phone case", 10),
                InventoryItem::new("B2", "Charger", 5),
            ],
        }
    }

    #[test]
    fn start_requires_store_auditor_and_items() {
        let mut s = setup();
        s.store_name = " ".to_string();
        assert!(matches!(s.start(Utc::now()), Err(DomainError::Validation(_))));

        let mut s = setup();
        s.auditor_name.clear();
        assert!(matches!(s.start(Utc::now()), Err(DomainError::Validation(_))));

        let mut s = setup();
        s.items.clear();
        assert!(matches!(s.start(Utc::now()), Err(DomainError::Validation(_))));
    }

    #[test]
    fn counting_flows_into_summary() {
        let mut session = setup().start(Utc::now()).unwrap();
        assert!(session.is_active());

        session.scan("A1 10", Utc::now()).unwrap();
        session.scan("B2*7", Utc::now()).unwrap();

        let summary = session.summary();
        assert_eq!(summary.discrepancy_count, 1);
        assert_eq!(summary.accuracy, 50.0);
    }

    #[test]
    fn completed_session_is_frozen() {
        let mut session = setup().start(Utc::now()).unwrap();
        session.scan("A1", Utc::now()).unwrap();
        session.complete(Utc::now()).unwrap();

        assert_eq!(session.scan("A1", Utc::now()), Err(ScanError::SessionClosed));
        assert_eq!(session.set_manual_entry(true), Err(ScanError::SessionClosed));
        assert_eq!(session.ledger().items()[0].physical_qty(), 1);
        assert!(matches!(session.complete(Utc::now()), Err(DomainError::Conflict(_))));
    }

    #[test]
    fn completing_discards_pending_quantity() {
        let mut session = setup().start(Utc::now()).unwrap();
        session.set_manual_entry(true).unwrap();
        session.scan("B2", Utc::now()).unwrap();
        assert!(session.station().pending_item().is_some());

        session.complete(Utc::now()).unwrap();
        assert!(session.station().pending_item().is_none());
        assert_eq!(session.ledger().items()[1].physical_qty(), 0);
    }

    #[test]
    fn history_entry_reflects_counts() {
        let started = Utc::now();
        let mut session = setup().start(started).unwrap();
        session.scan("A1 10", Utc::now()).unwrap();
        session.set_observations(Some("  shelf 4 blocked ".to_string()));

        let entry = session.history_entry();
        assert_eq!(entry.id, *session.id());
        assert_eq!(entry.date, started);
        assert_eq!(entry.total_items, 2);
        assert_eq!(entry.total_discrepancies, 1);
        assert_eq!(session.observations(), Some("shelf 4 blocked"));
    }
}
