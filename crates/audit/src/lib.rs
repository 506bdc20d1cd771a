//! Audit domain module: scan interpretation, the physical-count ledger and
//! the audit session lifecycle.
//!
//! This crate contains business rules only (no IO, no HTTP, no storage).

pub mod history;
pub mod item;
pub mod ledger;
pub mod reconcile;
pub mod scan;
pub mod schedule;
pub mod session;
pub mod station;

pub use history::HistoryEntry;
pub use item::{InventoryItem, ItemId, MAX_QUANTITY};
pub use ledger::{Ledger, LedgerError, Progress};
pub use reconcile::{DiscrepancyLine, Reconciliation};
pub use scan::{Interpretation, ScanMatch, interpret};
pub use schedule::{ScheduleAudit, ScheduleStatus, ScheduledAudit};
pub use session::{AuditSession, AuditSetup, AuditStatus};
pub use station::{LastError, LastScan, ScanError, ScanOutcome, ScanStation, StationState};
