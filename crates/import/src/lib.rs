//! Inventory import: turns a spreadsheet export (CSV) into ledger items.

pub mod columns;
pub mod reader;

pub use columns::{ColumnMap, normalize_header};
pub use reader::{DEFAULT_DESCRIPTION, ImportError, read_items, read_items_from_path};
