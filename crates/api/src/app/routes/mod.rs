use axum::{
    Router,
    routing::{delete, get, post},
};

pub mod audits;
pub mod history;
pub mod schedules;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/logout", post(system::logout))
        .route("/admin/users", get(users::list_users).post(users::create_user))
        .route("/admin/users/:username", delete(users::delete_user))
        .route("/schedules", get(schedules::list_schedules).post(schedules::create_schedule))
        .route("/notifications", get(schedules::notifications))
        .route("/history", get(history::list_history))
        .nest("/audits", audits::router())
}
