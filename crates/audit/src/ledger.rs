//! Physical-count ledger over the imported inventory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use stocktake_core::Entity;

use crate::item::{InventoryItem, ItemId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no ledger entry at index {index} (ledger has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("adding {delta} to ledger entry {index} would put its count out of range")]
    QuantityOverflow { index: usize, delta: i64 },
}

/// Counting progress shown while an audit is running.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Items with a positive physical count.
    pub counted_items: usize,
    pub total_items: usize,
    /// Sum of all physical counts.
    pub total_physical: i64,
    /// `counted_items / total_items` as a rounded percentage (0 when empty).
    pub percent: u8,
}

/// Ordered list of inventory items with their running physical counts.
///
/// The ledger is the single mutator of `physical_qty`: every change goes
/// through [`Ledger::apply`], which adds a signed delta.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ledger {
    items: Vec<InventoryItem>,
}

impl Ledger {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&InventoryItem> {
        self.items.get(index)
    }

    pub fn position_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// Add `delta` to the item at `index` and stamp it with `at`.
    ///
    /// Returns a snapshot of the updated item. A count that would leave
    /// `±MAX_QUANTITY` is rejected and the ledger is left unchanged.
    pub fn apply(&mut self, index: usize, delta: i64, at: DateTime<Utc>) -> Result<InventoryItem, LedgerError> {
        let len = self.items.len();
        let item = self
            .items
            .get_mut(index)
            .ok_or(LedgerError::IndexOutOfRange { index, len })?;

        if item.add_physical(delta, at).is_none() {
            tracing::warn!(sku = item.sku(), delta, "count update out of range");
            return Err(LedgerError::QuantityOverflow { index, delta });
        }
        tracing::debug!(
            sku = item.sku(),
            delta,
            physical_qty = item.physical_qty(),
            "ledger entry updated"
        );
        Ok(item.clone())
    }

    /// Items ordered for display: most recently scanned first, unscanned last.
    ///
    /// The sort is stable, so ties keep import order.
    pub fn by_recency(&self) -> Vec<&InventoryItem> {
        let mut view: Vec<&InventoryItem> = self.items.iter().collect();
        view.sort_by(|a, b| match (a.scanned_at(), b.scanned_at()) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => core::cmp::Ordering::Less,
            (None, Some(_)) => core::cmp::Ordering::Greater,
            (None, None) => core::cmp::Ordering::Equal,
        });
        view
    }

    /// Items whose sku or description contains `query` (case-insensitive),
    /// in [`Ledger::by_recency`] order. An empty query returns everything.
    pub fn search(&self, query: &str) -> Vec<&InventoryItem> {
        let mut view = self.by_recency();
        view.retain(|item| item.matches_query(query));
        view
    }

    pub fn progress(&self) -> Progress {
        let total_items = self.items.len();
        let counted_items = self.items.iter().filter(|i| i.physical_qty() > 0).count();
        let total_physical = total_physical(&self.items);
        let percent = if total_items == 0 {
            0
        } else {
            ((counted_items as f64 / total_items as f64) * 100.0).round() as u8
        };

        Progress {
            counted_items,
            total_items,
            total_physical,
            percent,
        }
    }
}

/// Sum of physical counts, saturating at the `i64` bounds.
pub(crate) fn total_physical(items: &[InventoryItem]) -> i64 {
    items
        .iter()
        .map(InventoryItem::physical_qty)
        .fold(0i64, i64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::MAX_QUANTITY;
    use chrono::Duration;
    use proptest::prelude::*;

    fn sample() -> Ledger {
        Ledger::new(vec![
            InventoryItem::new("A1", "Phone case", 10),
            InventoryItem::new("B2", "USB charger", 5),
            InventoryItem::new("C3", "Screen protector", 8),
        ])
    }

    #[test]
    fn apply_adds_delta_and_stamps_time() {
        let mut ledger = sample();
        let at = Utc::now();

        let snapshot = ledger.apply(1, 3, at).unwrap();
        assert_eq!(snapshot.physical_qty(), 3);
        assert_eq!(snapshot.scanned_at(), Some(at));

        let snapshot = ledger.apply(1, -1, at).unwrap();
        assert_eq!(snapshot.physical_qty(), 2);
        assert_eq!(ledger.get(1).unwrap().physical_qty(), 2);
    }

    #[test]
    fn apply_out_of_range_is_rejected() {
        let mut ledger = sample();
        let err = ledger.apply(7, 1, Utc::now()).unwrap_err();
        assert_eq!(err, LedgerError::IndexOutOfRange { index: 7, len: 3 });
    }

    #[test]
    fn recency_puts_latest_first_and_unscanned_last() {
        let mut ledger = sample();
        let t0 = Utc::now();
        ledger.apply(0, 1, t0).unwrap();
        ledger.apply(2, 1, t0 + Duration::seconds(5)).unwrap();

        let skus: Vec<&str> = ledger.by_recency().iter().map(|i| i.sku()).collect();
        assert_eq!(skus, vec!["C3", "A1", "B2"]);
    }

    #[test]
    fn recency_keeps_import_order_for_unscanned() {
        let ledger = sample();
        let skus: Vec<&str> = ledger.by_recency().iter().map(|i| i.sku()).collect();
        assert_eq!(skus, vec!["A1", "B2", "C3"]);
    }

    #[test]
    fn search_matches_sku_or_description() {
        let ledger = sample();
        assert_eq!(ledger.search("usb").len(), 1);
        assert_eq!(ledger.search("c3")[0].sku(), "C3");
        assert_eq!(ledger.search("").len(), 3);
        assert!(ledger.search("tablet").is_empty());
    }

    #[test]
    fn search_keeps_recency_order() {
        let mut ledger = sample();
        let t0 = Utc::now();
        ledger.apply(0, 1, t0).unwrap();
        ledger.apply(2, 1, t0 + Duration::seconds(5)).unwrap();

        // "c" hits A1 ("Phone case"), B2 ("USB charger") and C3.
        let skus: Vec<&str> = ledger.search("c").iter().map(|i| i.sku()).collect();
        assert_eq!(skus, vec!["C3", "A1", "B2"]);
    }

    #[test]
    fn overflowing_delta_leaves_ledger_untouched() {
        let mut ledger = sample();
        ledger.apply(0, 4, Utc::now()).unwrap();
        let before = ledger.clone();

        let err = ledger.apply(0, i64::MAX, Utc::now()).unwrap_err();
        assert_eq!(err, LedgerError::QuantityOverflow { index: 0, delta: i64::MAX });
        assert_eq!(ledger, before);
        ledger.apply(0, i64::MIN, Utc::now()).unwrap_err();
        assert_eq!(ledger, before);

        let mut ledger = sample();

        ledger.apply(0, MAX_QUANTITY, Utc::now()).unwrap();
        let err = ledger.apply(0, MAX_QUANTITY, Utc::now()).unwrap_err();
        assert!(matches!(err, LedgerError::QuantityOverflow { index: 0, .. }));
        assert_eq!(ledger.get(0).unwrap().physical_qty(), MAX_QUANTITY);

        // Differences and totals stay representable at the bound.
        ledger.apply(1, -MAX_QUANTITY, Utc::now()).unwrap();
        assert_eq!(ledger.get(1).unwrap().difference(), -MAX_QUANTITY - 5);
        assert_eq!(ledger.progress().total_physical, 0);
    }

    #[test]
    fn total_physical_saturates() {
        let items: Vec<InventoryItem> = (0..10_000)
            .map(|n| {
                let mut item = InventoryItem::new(format!("S{n}"), "bulk", 0);
                item.add_physical(MAX_QUANTITY, Utc::now()).unwrap();
                item
            })
            .collect();
        assert_eq!(total_physical(&items), i64::MAX);
    }

    #[test]
    fn progress_counts_positive_items() {
        let mut ledger = sample();
        ledger.apply(0, 4, Utc::now()).unwrap();
        ledger.apply(1, 2, Utc::now()).unwrap();

        let p = ledger.progress();
        assert_eq!(p.counted_items, 2);
        assert_eq!(p.total_physical, 6);
        assert_eq!(p.percent, 67);
        assert_eq!(Ledger::default().progress().percent, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the physical count equals the sum of applied deltas.
        #[test]
        fn physical_count_is_sum_of_deltas(deltas in prop::collection::vec(-50i64..50i64, 0..40)) {
            let mut ledger = sample();
            for d in &deltas {
                ledger.apply(0, *d, Utc::now()).unwrap();
            }
            prop_assert_eq!(ledger.get(0).unwrap().physical_qty(), deltas.iter().sum::<i64>());
            prop_assert_eq!(ledger.get(1).unwrap().physical_qty(), 0);
        }
    }
}
