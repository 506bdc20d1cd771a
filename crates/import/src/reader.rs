use std::io::Read;
use std::path::Path;

use thiserror::Error;

use stocktake_audit::{InventoryItem, MAX_QUANTITY};

use crate::columns::ColumnMap;

/// Description used when a row has none.
pub const DEFAULT_DESCRIPTION: &str = "Sin descripción";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to read inventory file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed inventory sheet: {0}")]
    Csv(#[from] csv::Error),
}

/// Read inventory items from CSV with a header row.
///
/// Rows without a sku are skipped. Quantities default to 0 when blank or
/// unreadable; decimals are truncated.
pub fn read_items<R: Read>(reader: R) -> Result<Vec<InventoryItem>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(rdr.headers()?.iter());
    if columns.sku.is_empty() {
        tracing::warn!("inventory sheet has no recognizable sku column");
    }

    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in rdr.records().enumerate() {
        let record = result?;

        let Some(sku) = ColumnMap::pick(&record, &columns.sku) else {
            skipped += 1;
            continue;
        };
        let description = ColumnMap::pick(&record, &columns.description).unwrap_or(DEFAULT_DESCRIPTION);
        let quantity = ColumnMap::pick(&record, &columns.quantity)
            .map(|raw| parse_quantity(raw, row + 2))
            .unwrap_or(0);

        items.push(InventoryItem::new(sku, description, quantity));
    }

    tracing::info!(items = items.len(), skipped, "inventory sheet imported");
    Ok(items)
}

pub fn read_items_from_path(path: impl AsRef<Path>) -> Result<Vec<InventoryItem>, ImportError> {
    let file = std::fs::File::open(path)?;
    read_items(file)
}

/// `line` is the 1-based sheet line, for diagnostics.
///
/// Values beyond `±MAX_QUANTITY` are treated as unreadable.
fn parse_quantity(raw: &str, line: usize) -> i64 {
    let parsed = match raw.parse::<i64>() {
        Ok(qty) => Some(qty),
        Err(_) => raw
            .parse::<f64>()
            .ok()
            .filter(|qty| qty.is_finite() && qty.abs() <= MAX_QUANTITY as f64)
            .map(|qty| qty.trunc() as i64),
    };
    match parsed {
        Some(qty) if (-MAX_QUANTITY..=MAX_QUANTITY).contains(&qty) => qty,
        _ => {
            tracing::warn!(line, value = raw, "unreadable quantity, using 0");
            0
        }
    }
}
