use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use stocktake_audit::{LedgerError, ScanError};
use stocktake_auth::AuthzError;
use stocktake_core::{DomainError, SessionId};
use stocktake_import::ImportError;
use stocktake_infra::{RepositoryError, StoreError};
use stocktake_report::ReportError;

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::InvariantViolation(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
        DomainError::InvalidId(_) => json_error(StatusCode::BAD_REQUEST, "invalid_id", message),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
    }
}

pub fn scan_error_to_response(err: ScanError) -> Response {
    let message = err.to_string();
    match err {
        ScanError::EmptyInput => json_error(StatusCode::BAD_REQUEST, "empty_input", message),
        ScanError::InvalidQuantity(_) => json_error(StatusCode::BAD_REQUEST, "invalid_quantity", message),
        ScanError::QuantityPending(_) => json_error(StatusCode::CONFLICT, "quantity_pending", message),
        ScanError::NoPendingQuantity => json_error(StatusCode::CONFLICT, "no_pending_quantity", message),
        ScanError::SessionClosed => json_error(StatusCode::CONFLICT, "session_closed", message),
        ScanError::Ledger(LedgerError::QuantityOverflow { .. }) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "quantity_out_of_range", message)
        }
        ScanError::Ledger(LedgerError::IndexOutOfRange { .. }) => {
            tracing::error!(error = %message, "ledger index out of range");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "ledger_error", message)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> Response {
    tracing::error!(error = %err, "storage failure");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
}

pub fn repository_error_to_response(err: RepositoryError) -> Response {
    match err {
        RepositoryError::Store(e) => store_error_to_response(e),
        RepositoryError::Domain(e) => domain_error_to_response(e),
    }
}

pub fn authz_error_to_response(err: AuthzError) -> Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn import_error_to_response(err: ImportError) -> Response {
    json_error(StatusCode::BAD_REQUEST, "invalid_inventory", err.to_string())
}

pub fn report_error_to_response(err: ReportError) -> Response {
    tracing::error!(error = %err, "report generation failed");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "report_error", err.to_string())
}

pub fn audit_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not_found", "audit session not found")
}

pub fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse().map_err(domain_error_to_response)
}
