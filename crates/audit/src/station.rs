//! Scan station: applies interpreted scans to the ledger.
//!
//! The station is a two-phase state machine:
//!
//! ```text
//! Idle ──(implicit match, manual entry on)──▶ AwaitingQuantity(item)
//!   ▲                                              │
//!   └──────────── confirm_quantity / cancel ───────┘
//! ```
//!
//! Cancelling, or confirming with a non-numeric value, never touches the ledger.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use stocktake_core::Entity;

use crate::item::{InventoryItem, ItemId};
use crate::ledger::{Ledger, LedgerError};
use crate::scan::{Interpretation, interpret};

/// Recoverable scan failures. None of them mutate the ledger.
///
/// A count pushed out of range surfaces as [`ScanError::Ledger`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("scan input is empty")]
    EmptyInput,

    #[error("a quantity is pending for item {0}; confirm or cancel it first")]
    QuantityPending(ItemId),

    #[error("no quantity confirmation is pending")]
    NoPendingQuantity,

    #[error("invalid quantity input: {0:?}")]
    InvalidQuantity(String),

    #[error("audit session is closed")]
    SessionClosed,

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Whether the station is waiting for an operator-supplied quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum StationState {
    Idle,
    AwaitingQuantity { item_id: ItemId },
}

/// Projection of the last successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastScan {
    pub item: InventoryItem,
    pub delta: i64,
}

/// Projection of the last unmatched input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub raw: String,
}

/// What a submitted scan did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScanOutcome {
    Applied(LastScan),
    AwaitingQuantity { item: InventoryItem },
    NotFound { raw: String },
}

#[derive(Debug, Clone)]
pub struct ScanStation {
    ledger: Ledger,
    manual_entry: bool,
    state: StationState,
    last_scan: Option<LastScan>,
    last_error: Option<LastError>,
}

impl ScanStation {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            ledger,
            manual_entry: false,
            state: StationState::Idle,
            last_scan: None,
            last_error: None,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn manual_entry(&self) -> bool {
        self.manual_entry
    }

    /// When on, implicit-quantity matches prompt for a quantity instead of adding 1.
    pub fn set_manual_entry(&mut self, enabled: bool) {
        self.manual_entry = enabled;
    }

    pub fn state(&self) -> &StationState {
        &self.state
    }

    pub fn last_scan(&self) -> Option<&LastScan> {
        self.last_scan.as_ref()
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    /// The item a quantity is being requested for, if any.
    pub fn pending_item(&self) -> Option<&InventoryItem> {
        match &self.state {
            StationState::Idle => None,
            StationState::AwaitingQuantity { item_id } => self
                .ledger
                .position_of(item_id)
                .and_then(|idx| self.ledger.get(idx)),
        }
    }

    /// Interpret and apply one raw scan.
    pub fn submit(&mut self, raw: &str, now: DateTime<Utc>) -> Result<ScanOutcome, ScanError> {
        if let StationState::AwaitingQuantity { item_id } = &self.state {
            return Err(ScanError::QuantityPending(item_id.clone()));
        }
        if raw.is_empty() {
            return Err(ScanError::EmptyInput);
        }

        match interpret(self.ledger.items(), raw) {
            Interpretation::Matched(m) if self.manual_entry && !m.explicit => {
                let item = self.item_at(m.index)?;
                tracing::debug!(sku = item.sku(), "awaiting operator quantity");
                self.state = StationState::AwaitingQuantity {
                    item_id: item.id().clone(),
                };
                Ok(ScanOutcome::AwaitingQuantity { item })
            }
            Interpretation::Matched(m) => {
                let scan = self.record(m.index, m.delta, now)?;
                Ok(ScanOutcome::Applied(scan))
            }
            Interpretation::NotFound { raw } => {
                tracing::info!(input = %raw, "scanned code not found");
                self.last_scan = None;
                self.last_error = Some(LastError { raw: raw.clone() });
                Ok(ScanOutcome::NotFound { raw })
            }
        }
    }

    /// Apply the operator-supplied quantity to the pending item.
    ///
    /// The value is added to the current count, it does not replace it.
    /// Zero and negative corrections are accepted.
    pub fn confirm_quantity(&mut self, input: &str, now: DateTime<Utc>) -> Result<LastScan, ScanError> {
        let StationState::AwaitingQuantity { item_id } = &self.state else {
            return Err(ScanError::NoPendingQuantity);
        };

        let delta = parse_leading_int(input).ok_or_else(|| ScanError::InvalidQuantity(input.to_string()))?;

        let Some(index) = self.ledger.position_of(item_id) else {
            self.state = StationState::Idle;
            return Err(ScanError::NoPendingQuantity);
        };

        let scan = self.record(index, delta, now)?;
        self.state = StationState::Idle;
        Ok(scan)
    }

    /// Discard a pending quantity request. Returns whether one was pending.
    pub fn cancel_quantity(&mut self) -> bool {
        let was_pending = matches!(self.state, StationState::AwaitingQuantity { .. });
        self.state = StationState::Idle;
        was_pending
    }

    fn item_at(&self, index: usize) -> Result<InventoryItem, ScanError> {
        let len = self.ledger.len();
        self.ledger
            .get(index)
            .cloned()
            .ok_or(ScanError::Ledger(LedgerError::IndexOutOfRange { index, len }))
    }

    fn record(&mut self, index: usize, delta: i64, now: DateTime<Utc>) -> Result<LastScan, ScanError> {
        let item = self.ledger.apply(index, delta, now)?;
        let scan = LastScan { item, delta };
        self.last_scan = Some(scan.clone());
        self.last_error = None;
        Ok(scan)
    }
}

/// Integer prefix of `input`: optional leading whitespace, optional sign, digits.
///
/// Trailing characters after the digits are ignored (`"3 units"` is 3).
fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => ("-", &s[1..]),
        Some(b'+') => ("", &s[1..]),
        _ => ("", s),
    };
    let digits: &str = &rest[..rest.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    format!("{sign}{digits}").parse().ok()
}
