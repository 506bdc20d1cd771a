use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;

use stocktake_audit::{AuditSession, InventoryItem};
use stocktake_core::Entity;

/// Column headings of the count sheet.
pub const COLUMNS: [&str; 5] = ["SKU", "DESCRIPCION", "TEORICO", "FISICO", "DIFERENCIA"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to finish report buffer: {0}")]
    Buffer(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub sku: String,
    pub description: String,
    pub theoretical_qty: i64,
    pub physical_qty: i64,
    pub difference: i64,
}

impl ReportRow {
    /// Signed difference; surpluses carry an explicit `+`.
    pub fn difference_label(&self) -> String {
        if self.difference > 0 {
            format!("+{}", self.difference)
        } else {
            self.difference.to_string()
        }
    }
}

impl From<&InventoryItem> for ReportRow {
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

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    /// First 8 characters of the session id, upper-cased.
    pub reference: String,
    pub store_name: String,
    pub auditor_name: String,
    pub date: DateTime<Utc>,
    pub total_items: usize,
    pub total_physical: i64,
    pub discrepancy_count: usize,
    pub accuracy: f64,
    pub on_target: bool,
    pub observations: Option<String>,
    pub rows: Vec<ReportRow>,
}

impl AuditReport {
    pub fn from_session(session: &AuditSession) -> Self {
        let summary = session.summary();
        let reference: String = session.id().to_string().chars().take(8).collect();

        Self {
            reference: reference.to_uppercase(),
            store_name: session.store_name().to_string(),
            auditor_name: session.auditor_name().to_string(),
            date: session.started_at(),
            total_items: summary.total_items,
            total_physical: summary.total_physical,
            discrepancy_count: summary.discrepancy_count,
            accuracy: summary.accuracy,
            on_target: summary.meets_target(),
            observations: session.observations().map(str::to_string),
            rows: session.ledger().items().iter().map(ReportRow::from).collect(),
        }
    }

    pub fn accuracy_label(&self) -> String {
        format!("{:.1}%", self.accuracy)
    }

    /// Count sheet as CSV (header row + one row per item).
    pub fn to_csv(&self) -> Result<Vec<u8>, ReportError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(COLUMNS)?;
        for row in &self.rows {
            wtr.write_record([
                row.sku.clone(),
                row.description.clone(),
                row.theoretical_qty.to_string(),
                row.physical_qty.to_string(),
                row.difference_label(),
            ])?;
        }
        wtr.into_inner().map_err(|e| ReportError::Buffer(e.to_string()))
    }

    /// Human-readable report: header, metrics, observations and the count sheet.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "INFORME DE AUDITORIA");
        let _ = writeln!(out, "ID: {}", self.reference);
        let _ = writeln!(out, "Fecha: {}", self.date.format("%Y-%m-%d"));
        let _ = writeln!(out, "Hora: {}", self.date.format("%H:%M:%S"));
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", self.store_name);
        let _ = writeln!(out, "Responsable: {}", self.auditor_name);
        let _ = writeln!(out);
        let _ = writeln!(out, "Total items:  {}", self.total_items);
        let _ = writeln!(out, "Conteo total: {}", self.total_physical);
        let _ = writeln!(out, "Incidencias:  {}", self.discrepancy_count);
        let _ = writeln!(out, "Precision:    {}", self.accuracy_label());

        if let Some(obs) = &self.observations {
            let _ = writeln!(out);
            let _ = writeln!(out, "Observaciones: {obs}");
        }

        let sku_width = self
            .rows
            .iter()
            .map(|r| r.sku.chars().count())
            .chain([COLUMNS[0].len()])
            .max()
            .unwrap_or(0);
        let desc_width = self
            .rows
            .iter()
            .map(|r| r.description.chars().count())
            .chain([COLUMNS[1].len()])
            .max()
            .unwrap_or(0);

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{:<sku_width$}  {:<desc_width$}  {:>8}  {:>8}  {:>10}",
            COLUMNS[0], COLUMNS[1], COLUMNS[2], COLUMNS[3], COLUMNS[4]
        );
        for row in &self.rows {
            let _ = writeln!(
                out,
                "{:<sku_width$}  {:<desc_width$}  {:>8}  {:>8}  {:>10}",
                row.sku,
                row.description,
                row.theoretical_qty,
                row.physical_qty,
                row.difference_label()
            );
        }

        out
    }
}

/// `Auditoria_<store>_<YYYY-MM-DD>.csv`, with the store name reduced to
/// lowercase ASCII alphanumerics and underscores.
pub fn report_file_name(store_name: &str, date: NaiveDate) -> String {
    let safe: String = store_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("Auditoria_{safe}_{}.csv", date.format("%Y-%m-%d"))
}
