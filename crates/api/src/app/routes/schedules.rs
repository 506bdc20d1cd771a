use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use stocktake_audit::ScheduleAudit;
use stocktake_auth::require_admin;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

/// Pending schedules visible to the caller.
pub async fn list_schedules(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.schedules().visible_to(principal.username(), principal.role()) {
        Ok(schedules) => (StatusCode::OK, Json(schedules)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_schedule(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ScheduleRequest>,
) -> Response {
    if let Err(e) = require_admin(principal.role(), "schedules.create") {
        return errors::authz_error_to_response(e);
    }

    let cmd = ScheduleAudit {
        store_name: body.store_name,
        assigned_to: body.assigned_to,
        due_date: body.due_date,
        assigned_by: principal.username().to_string(),
    };

    match services.schedules().add(cmd) {
        Ok(scheduled) => (StatusCode::CREATED, Json(scheduled)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

/// The caller's own pending assignments.
pub async fn notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    match services.schedules().pending_for(principal.username()) {
        Ok(pending) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "count": pending.len(),
                "schedules": pending,
            })),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
