//! Scheduled audits: a store count assigned to an auditor for a due date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stocktake_core::{DomainError, DomainResult, Entity, ScheduleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAudit {
    pub id: ScheduleId,
    pub store_name: String,
    pub due_date: NaiveDate,
    /// Username of the auditor expected to perform the count.
    pub assigned_to: String,
    /// Username of the administrator who scheduled it.
    pub assigned_by: String,
    pub status: ScheduleStatus,
}

impl ScheduledAudit {
    pub fn is_pending(&self) -> bool {
        self.status == ScheduleStatus::Pending
    }

    pub fn is_assigned_to(&self, username: &str) -> bool {
        self.assigned_to == username
    }

    /// Store names are compared case-insensitively.
    pub fn is_for_store(&self, store_name: &str) -> bool {
        self.store_name.to_lowercase() == store_name.to_lowercase()
    }

    pub fn complete(&mut self) {
        self.status = ScheduleStatus::Completed;
    }
}

impl Entity for ScheduledAudit {
    type Id = ScheduleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Command: schedule a new audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleAudit {
    pub store_name: String,
    pub assigned_to: String,
    pub due_date: Option<NaiveDate>,
    pub assigned_by: String,
}

impl ScheduleAudit {
    /// Validate and build a pending schedule.
    pub fn into_scheduled(self) -> DomainResult<ScheduledAudit> {
        let store_name = self.store_name.trim();
        let assigned_to = self.assigned_to.trim();
        if store_name.is_empty() || assigned_to.is_empty() {
            return Err(DomainError::validation("store name and assignee are required"));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| DomainError::validation("due date is required"))?;

        Ok(ScheduledAudit {
            id: ScheduleId::new(),
            store_name: store_name.to_string(),
            due_date,
            assigned_to: assigned_to.to_string(),
            assigned_by: self.assigned_by,
            status: ScheduleStatus::Pending,
        })
    }
}
