use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use stocktake_auth::require_admin;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> Response {
    if let Err(e) = require_admin(principal.role(), "users.list") {
        return errors::authz_error_to_response(e);
    }

    match services.users().list() {
        Ok(users) => (StatusCode::OK, Json(users)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> Response {
    if let Err(e) = require_admin(principal.role(), "users.create") {
        return errors::authz_error_to_response(e);
    }

    match services.users().add_user(body.into()) {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(username): Path<String>,
) -> Response {
    if let Err(e) = require_admin(principal.role(), "users.delete") {
        return errors::authz_error_to_response(e);
    }

    match services.users().delete_user(&username) {
        Ok(()) => {
            services.revoke_logins(&username);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}
