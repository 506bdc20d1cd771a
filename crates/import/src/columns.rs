//! Header aliasing for inventory spreadsheets.
//!
//! Store exports name their columns inconsistently (`Código`, `SKU`,
//! `Barcode`, ...). Headers are normalized and matched against alias lists;
//! within a list, earlier aliases take precedence.

/// Aliases for the item reference column.
pub const SKU: &[&str] = &["sku", "codigo", "code", "barcode", "id", "item"];

/// Aliases for the description column.
pub const DESCRIPTION: &[&str] = &[
    "descripcion",
    "description",
    "nombre",
    "producto",
    "name",
    "desc",
    "detalle",
];

/// Aliases for the expected-stock column.
pub const QUANTITY: &[&str] = &[
    "cantidad",
    "qty",
    "teorico",
    "theoretical",
    "stock",
    "existencia",
    "cant",
];

/// Lowercase, trimmed, with Latin diacritics removed.
pub fn normalize_header(header: &str) -> String {
    header.trim().chars().flat_map(char::to_lowercase).map(fold_accent).collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// Candidate column positions per field, in alias priority order.
///
/// A row takes the first candidate whose cell is non-blank, so a sheet with
/// both `sku` and `codigo` columns falls back to `codigo` when `sku` is empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColumnMap {
    pub sku: Vec<usize>,
    pub description: Vec<usize>,
    pub quantity: Vec<usize>,
}

impl ColumnMap {
    pub fn from_headers<'a>(headers: impl IntoIterator<Item = &'a str>) -> Self {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let find = |aliases: &[&str]| -> Vec<usize> {
            aliases
                .iter()
                .filter_map(|alias| normalized.iter().position(|h| h == alias))
                .collect()
        };

        Self {
            sku: find(SKU),
            description: find(DESCRIPTION),
            quantity: find(QUANTITY),
        }
    }

    /// First non-blank cell among `candidates`, trimmed.
    pub fn pick<'r>(record: &'r csv::StringRecord, candidates: &[usize]) -> Option<&'r str> {
        candidates
            .iter()
            .filter_map(|&idx| record.get(idx))
            .map(str::trim)
            .find(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_fold_case_and_accents() {
        assert_eq!(normalize_header("  Descripción "), "descripcion");
        assert_eq!(normalize_header("CÓDIGO"), "codigo");
        assert_eq!(normalize_header("Teórico"), "teorico");
    }

    #[test]
    fn aliases_resolve_positions() {
        let map = ColumnMap::from_headers(["Código", "Nombre", "Existencia"]);
        assert_eq!(
            map,
            ColumnMap {
                sku: vec![0],
                description: vec![1],
                quantity: vec![2],
            }
        );
    }

    #[test]
    fn earlier_alias_wins_over_column_order() {
        // Both "id" and "sku" present: "sku" is listed first.
        let map = ColumnMap::from_headers(["id", "sku", "qty"]);
        assert_eq!(map.sku, vec![1, 0]);
    }

    #[test]
    fn pick_falls_back_to_next_non_blank_candidate() {
        let map = ColumnMap::from_headers(["id", "sku", "qty"]);
        let record = csv::StringRecord::from(vec!["7501", "  ", "3"]);
        assert_eq!(ColumnMap::pick(&record, &map.sku), Some("7501"));
        assert_eq!(ColumnMap::pick(&record, &map.description), None);
    }

    #[test]
    fn unknown_headers_are_unmapped() {
        let map = ColumnMap::from_headers(["price", "brand"]);
        assert_eq!(map, ColumnMap::default());
    }
}
