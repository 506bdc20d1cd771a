//! Scan interpretation: raw scanner/keyboard input → (item, quantity).
//!
//! Inputs are resolved against the ledger with a fixed grammar priority:
//!
//! 1. exact reference (`A1`) → quantity 1, implicit
//! 2. reference, last space, digits (`A1 5`) → explicit quantity
//! 3. digits `*` reference or reference `*` digits (`5*A1`, `A1*5`) → explicit quantity
//!
//! The first rule that resolves to an existing item wins. Reordering the rules
//! changes which item inputs such as `"A1 5"` resolve to.

use serde::Serialize;

use crate::item::InventoryItem;

/// A successful resolution of a scan against the ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct ScanMatch {
    /// Position of the matched item in the ledger.
    pub index: usize,
    /// Quantity to add to the item's physical count.
    pub delta: i64,
    /// Whether the operator typed the quantity (as opposed to the implicit 1).
    pub explicit: bool,
}

/// Result of interpreting one raw input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interpretation {
    Matched(ScanMatch),
    NotFound { raw: String },
}

/// Interpret `raw` against `items`.
///
/// Pure: the same input against an unchanged ledger always yields the same
/// result.
pub fn interpret(items: &[InventoryItem], raw: &str) -> Interpretation {
    let input = raw.trim();

    let resolved = exact(items, input)
        .or_else(|| space_separated(items, input))
        .or_else(|| asterisk_separated(items, input));

    match resolved {
        Some(m) => Interpretation::Matched(m),
        None => Interpretation::NotFound { raw: raw.to_string() },
    }
}

fn find_index(items: &[InventoryItem], code: &str) -> Option<usize> {
    items.iter().position(|item| item.matches_code(code))
}

fn exact(items: &[InventoryItem], input: &str) -> Option<ScanMatch> {
    find_index(items, input).map(|index| ScanMatch {
        index,
        delta: 1,
        explicit: false,
    })
}

fn space_separated(items: &[InventoryItem], input: &str) -> Option<ScanMatch> {
    let (reference, qty) = input.rsplit_once(' ')?;
    let delta = parse_digits(qty)?;
    let index = find_index(items, reference)?;
    Some(ScanMatch {
        index,
        delta,
        explicit: true,
    })
}

fn asterisk_separated(items: &[InventoryItem], input: &str) -> Option<ScanMatch> {
    let mut parts = input.split('*');
    let (first, second) = (parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    // Quantity first, then reference first.
    let qty_then_ref = || {
        let delta = parse_digits(first)?;
        let index = find_index(items, second)?;
        Some(ScanMatch { index, delta, explicit: true })
    };
    let ref_then_qty = || {
        let delta = parse_digits(second)?;
        let index = find_index(items, first)?;
        Some(ScanMatch { index, delta, explicit: true })
    };

    qty_then_ref().or_else(ref_then_qty)
}

/// Non-empty run of ASCII digits that fits in `i64`.
fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
