//! Reconciliation of physical counts against theoretical stock.

use serde::Serialize;

use crate::item::InventoryItem;
use crate::ledger::total_physical;

/// Accuracy above which an audit is considered on target.
pub const ACCURACY_TARGET: f64 = 95.0;

/// One item whose count differs from the expected stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiscrepancyLine {
    pub sku: String,
    pub description: String,
    pub theoretical_qty: i64,
    pub physical_qty: i64,
    pub difference: i64,
}

impl From<&InventoryItem> for DiscrepancyLine {
    fn from(item: &InventoryItem) -> Self {
        Self {
            sku: item.sku().to_string(),
            description: item.description().to_string(),
            theoretical_qty: item.theoretical_qty(),
            physical_qty: item.physical_qty(),
            difference: item.difference(),
        }
    }
}

/// Summary derived from a ledger. Holds no state of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
    pub total_items: usize,
    pub total_physical: i64,
    pub discrepancy_count: usize,
    /// Percentage of items without discrepancy. An empty ledger is 100%.
    pub accuracy: f64,
    pub discrepancies: Vec<DiscrepancyLine>,
}

impl Reconciliation {
    pub fn of(items: &[InventoryItem]) -> Self {
        let total_items = items.len();
        let discrepancies: Vec<DiscrepancyLine> = items
            .iter()
            .filter(|item| item.has_discrepancy())
            .map(DiscrepancyLine::from)
            .collect();
        let discrepancy_count = discrepancies.len();

        let accuracy = if total_items == 0 {
            100.0
        } else {
            (1.0 - discrepancy_count as f64 / total_items as f64) * 100.0
        };

        Self {
            total_items,
            total_physical: total_physical(items),
            discrepancy_count,
            accuracy,
            discrepancies,
        }
    }

    pub fn meets_target(&self) -> bool {
        self.accuracy > ACCURACY_TARGET
    }

    /// Accuracy with one decimal, e.g. `"87.5%"`.
    pub fn accuracy_label(&self) -> String {
        format!("{:.1}%", self.accuracy)
    }
}
