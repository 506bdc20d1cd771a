use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stocktake_core::Entity;

/// Length of surrogate identifiers generated for items without a sku.
const SURROGATE_ID_LEN: usize = 9;

/// Largest magnitude a theoretical or physical quantity may reach.
///
/// Keeps differences and ledger totals well inside `i64`.
pub const MAX_QUANTITY: i64 = 1_000_000_000_000_000;

/// Inventory item identifier.
///
/// Equal to the item's sku when one exists, so scanners can resolve either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a short surrogate identifier (lowercase hex).
    ///
    /// Taken from the random tail of a UUIDv7 so ids created in the same
    /// millisecond still differ.
    pub fn generate() -> Self {
        let raw = Uuid::now_v7().simple().to_string();
        Self(raw[raw.len() - SURROGATE_ID_LEN..].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One line of the audited inventory: expected stock vs. running count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    sku: String,
    description: String,
    theoretical_qty: i64,
    physical_qty: i64,
    scanned_at: Option<DateTime<Utc>>,
}

impl InventoryItem {
    /// Create an uncounted item. A blank sku gets a generated surrogate id.
    ///
    /// `theoretical_qty` is clamped to `±MAX_QUANTITY`.
    pub fn new(sku: impl Into<String>, description: impl Into<String>, theoretical_qty: i64) -> Self {
        let sku = sku.into();
        let id = if sku.trim().is_empty() {
            ItemId::generate()
        } else {
            ItemId::new(sku.clone())
        };

        Self {
            id,
            sku,
            description: description.into(),
            theoretical_qty: theoretical_qty.clamp(-MAX_QUANTITY, MAX_QUANTITY),
            physical_qty: 0,
            scanned_at: None,
        }
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn theoretical_qty(&self) -> i64 {
        self.theoretical_qty
    }

    pub fn physical_qty(&self) -> i64 {
        self.physical_qty
    }

    pub fn scanned_at(&self) -> Option<DateTime<Utc>> {
        self.scanned_at
    }

    /// Physical minus theoretical.
    pub fn difference(&self) -> i64 {
        self.physical_qty.saturating_sub(self.theoretical_qty)
    }

    pub fn has_discrepancy(&self) -> bool {
        self.difference() != 0
    }

    /// Whether `code` refers to this item (sku or id, case-insensitive).
    pub fn matches_code(&self, code: &str) -> bool {
        let code = code.to_lowercase();
        self.sku.to_lowercase() == code || self.id.as_str().to_lowercase() == code
    }

    /// Whether sku or description contains `query` (case-insensitive).
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.sku.to_lowercase().contains(&query) || self.description.to_lowercase().contains(&query)
    }

    /// Only the ledger mutates counts.
    ///
    /// Returns `None`, leaving the item untouched, when the new count would
    /// exceed [`MAX_QUANTITY`] in magnitude.
    pub(crate) fn add_physical(&mut self, delta: i64, at: DateTime<Utc>) -> Option<i64> {
        let updated = self
            .physical_qty
            .checked_add(delta)
            .filter(|qty| (-MAX_QUANTITY..=MAX_QUANTITY).contains(qty))?;
        self.physical_qty = updated;
        self.scanned_at = Some(at);
        Some(updated)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_derived_from_sku() {
        let item = InventoryItem::new("7501031311309", "Cable USB-C", 12);
        assert_eq!(item.id().as_str(), "7501031311309");
        assert_eq!(item.physical_qty(), 0);
        assert!(item.scanned_at().is_none());
    }

    #[test]
    fn blank_sku_gets_surrogate_id() {
        let a = InventoryItem::new("  ", "Loose item", 1);
        let b = InventoryItem::new("", "Loose item", 1);
        assert_eq!(a.id().as_str().len(), SURROGATE_ID_LEN);
        assert!(a.id().as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn code_matching_ignores_case() {
        let item = InventoryItem::new("Ab-12", "Router", 3);
        assert!(item.matches_code("ab-12"));
        assert!(item.matches_code("AB-12"));
        assert!(!item.matches_code("ab-1"));
    }

    #[test]
    fn difference_is_physical_minus_theoretical() {
        let mut item = InventoryItem::new("A1", "Phone", 5);
        item.add_physical(7, Utc::now());
        assert_eq!(item.difference(), 2);
        assert!(item.has_discrepancy());
    }

    #[test]
    fn counts_beyond_the_bound_are_refused() {
        let mut item = InventoryItem::new("A1", "Phone", 5);
        assert_eq!(item.add_physical(MAX_QUANTITY, Utc::now()), Some(MAX_QUANTITY));
        assert_eq!(item.add_physical(1, Utc::now()), None);
        assert_eq!(item.add_physical(i64::MAX, Utc::now()), None);
        assert_eq!(item.physical_qty(), MAX_QUANTITY);

        let mut item = InventoryItem::new("B2", "Charger", 5);
        assert_eq!(item.add_physical(i64::MIN, Utc::now()), None);
        assert_eq!(item.physical_qty(), 0);
        assert!(item.scanned_at().is_none());
    }

    #[test]
    fn extreme_theoretical_stock_is_clamped() {
        let item = InventoryItem::new("A1", "Phone", i64::MIN);
        assert_eq!(item.theoretical_qty(), -MAX_QUANTITY);
        assert_eq!(item.difference(), MAX_QUANTITY);

        let item = InventoryItem::new("B2", "Charger", i64::MAX);
        assert_eq!(item.difference(), -MAX_QUANTITY);
    }
}
