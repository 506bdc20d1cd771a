//! Audit history entries (summary of a saved audit).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktake_core::SessionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: SessionId,
    pub store_name: String,
    pub date: DateTime<Utc>,
    pub auditor_name: String,
    pub total_items: usize,
    pub total_discrepancies: usize,
}
