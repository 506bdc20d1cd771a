//! Audit report: summary metrics plus the full count sheet, rendered as
//! plain text or CSV.

pub mod report;

pub use report::{AuditReport, ReportError, ReportRow, report_file_name};
