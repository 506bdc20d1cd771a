use std::sync::Arc;

use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{AuthToken, PrincipalContext};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn login(Extension(services): Extension<Arc<AppServices>>, Json(body): Json<dto::LoginRequest>) -> Response {
    match services.login(&body.username, &body.password) {
        Ok(Some((token, principal))) => (
            StatusCode::OK,
            Json(json!({
                "token": token,
                "user": dto::principal_to_json(&principal),
            })),
        )
            .into_response(),
        Ok(None) => errors::json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid username or password"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn logout(Extension(services): Extension<Arc<AppServices>>, Extension(token): Extension<AuthToken>) -> StatusCode {
    services.logout(&token.0);
    StatusCode::NO_CONTENT
}

pub async fn whoami(Extension(principal): Extension<PrincipalContext>) -> impl IntoResponse {
    Json(dto::principal_to_json(&principal))
}
