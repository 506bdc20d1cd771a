use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::{HeaderName, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::Utc;
use serde_json::{Value, json};

use stocktake_audit::{AuditSession, AuditSetup, HistoryEntry, InventoryItem};
use stocktake_import::{DEFAULT_DESCRIPTION, read_items};
use stocktake_report::{AuditReport, report_file_name};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_audit))
        .route("/:id", get(get_audit).delete(abandon_audit))
        .route("/:id/scan", post(scan))
        .route("/:id/quantity", post(confirm_quantity))
        .route("/:id/quantity/cancel", post(cancel_quantity))
        .route("/:id/manual-mode", put(set_manual_mode))
        .route("/:id/complete", post(complete_audit))
        .route("/:id/summary", get(get_summary))
        .route("/:id/report", get(get_report_text).post(save_report))
}

fn load_items(body: &mut dto::CreateAuditRequest) -> Result<Vec<InventoryItem>, Response> {
    if let Some(csv) = body.csv.take() {
        return read_items(csv.as_bytes()).map_err(errors::import_error_to_response);
    }
    Ok(body
        .items
        .take()
        .unwrap_or_default()
        .into_iter()
        .map(|i| {
            let description = i.description.unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
            InventoryItem::new(i.sku, description, i.theoretical_qty)
        })
        .collect())
}

/// Run `f` on the session at `id`, mapping an unknown or malformed id to a response.
fn on_audit(
    services: &AppServices,
    id: &str,
    f: impl FnOnce(&mut AuditSession) -> Result<Value, Response>,
) -> Response {
    let id = match errors::parse_session_id(id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.with_audit(&id, f) {
        Some(Ok(body)) => (StatusCode::OK, Json(body)).into_response(),
        Some(Err(resp)) => resp,
        None => errors::audit_not_found(),
    }
}

pub async fn create_audit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(mut body): Json<dto::CreateAuditRequest>,
) -> Response {
    let items = match load_items(&mut body) {
        Ok(items) => items,
        Err(resp) => return resp,
    };

    let auditor_name = body
        .auditor_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| principal.name().to_string());

    let setup = AuditSetup {
        store_name: body.store_name,
        auditor_name,
        items,
    };
    let session = match setup.start(Utc::now()) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let view = dto::audit_to_json(&session, None);
    services.open_audit(session);

    (StatusCode::CREATED, Json(view)).into_response()
}

pub async fn get_audit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(query): Query<dto::AuditQuery>,
) -> Response {
    on_audit(&services, &id, |session| Ok(dto::audit_to_json(session, query.q.as_deref())))
}

pub async fn scan(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ScanRequest>,
) -> Response {
    on_audit(&services, &id, |session| {
        let outcome = session
            .scan(&body.code, Utc::now())
            .map_err(errors::scan_error_to_response)?;
        Ok(json!({
            "result": outcome,
            "audit": dto::audit_to_json(session, None),
        }))
    })
}

pub async fn confirm_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::QuantityRequest>,
) -> Response {
    on_audit(&services, &id, |session| {
        let applied = session
            .confirm_quantity(&body.quantity, Utc::now())
            .map_err(errors::scan_error_to_response)?;
        Ok(json!({
            "applied": applied,
            "audit": dto::audit_to_json(session, None),
        }))
    })
}

pub async fn cancel_quantity(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    on_audit(&services, &id, |session| {
        let cancelled = session.cancel_quantity().map_err(errors::scan_error_to_response)?;
        Ok(json!({ "cancelled": cancelled }))
    })
}

pub async fn set_manual_mode(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ManualModeRequest>,
) -> Response {
    on_audit(&services, &id, |session| {
        session
            .set_manual_entry(body.enabled)
            .map_err(errors::scan_error_to_response)?;
        Ok(dto::audit_to_json(session, None))
    })
}

pub async fn complete_audit(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Option<Json<dto::ObservationsRequest>>,
) -> Response {
    on_audit(&services, &id, |session| {
        if let Some(Json(dto::ObservationsRequest { observations: Some(text) })) = body {
            session.set_observations(Some(text));
        }
        session
            .complete(Utc::now())
            .map_err(errors::domain_error_to_response)?;
        Ok(dto::summary_to_json(session, &session.summary()))
    })
}

pub async fn get_summary(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    on_audit(&services, &id, |session| Ok(dto::summary_to_json(session, &session.summary())))
}

/// Plain-text report for on-screen review.
pub async fn get_report_text(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id = match errors::parse_session_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.with_audit(&id, |session| AuditReport::from_session(session).render_text()) {
        Some(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            text,
        )
            .into_response(),
        None => errors::audit_not_found(),
    }
}

/// Finalize and save: completes an active session, records it in the history,
/// completes the caller's matching schedules and returns the CSV report.
pub async fn save_report(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Option<Json<dto::ObservationsRequest>>,
) -> Response {
    let id = match errors::parse_session_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    let finalize = |session: &mut AuditSession| -> Result<(AuditReport, HistoryEntry), Response> {
        if let Some(Json(dto::ObservationsRequest { observations: Some(text) })) = body {
            session.set_observations(Some(text));
        }
        if session.is_active() {
            session
                .complete(Utc::now())
                .map_err(errors::domain_error_to_response)?;
        }
        Ok((AuditReport::from_session(session), session.history_entry()))
    };

    let (report, entry) = match services.with_audit(&id, finalize) {
        Some(Ok(v)) => v,
        Some(Err(resp)) => return resp,
        None => return errors::audit_not_found(),
    };

    if let Err(e) = services.history().record(entry) {
        return errors::store_error_to_response(e);
    }
    let schedules_completed = match services.schedules().complete(&report.store_name, principal.username()) {
        Ok(n) => n,
        Err(e) => return errors::store_error_to_response(e),
    };

    let csv = match report.to_csv() {
        Ok(bytes) => bytes,
        Err(e) => return errors::report_error_to_response(e),
    };
    let file_name = report_file_name(&report.store_name, Utc::now().date_naive());

    tracing::info!(
        session_id = %id,
        file = %file_name,
        schedules_completed,
        "audit report saved"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
            (HeaderName::from_static("x-schedules-completed"), schedules_completed.to_string()),
        ],
        csv,
    )
        .into_response()
}

pub async fn abandon_audit(Extension(services): Extension<Arc<AppServices>>, Path(id): Path<String>) -> Response {
    let id = match errors::parse_session_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.close_audit(&id) {
        Some(_) => {
            tracing::info!(session_id = %id, "audit session abandoned");
            StatusCode::NO_CONTENT.into_response()
        }
        None => errors::audit_not_found(),
    }
}
