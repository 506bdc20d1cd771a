use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::app::errors;
use crate::app::services::AppServices;

pub async fn list_history(Extension(services): Extension<Arc<AppServices>>) -> Response {
    match services.history().list() {
        Ok(entries) => (StatusCode::OK, Json(entries)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
