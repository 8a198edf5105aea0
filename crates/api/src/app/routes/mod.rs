use axum::{routing::get, Router};

pub mod assistant;
pub mod dashboard;
pub mod employees;
pub mod inventory;
pub mod notifications;
pub mod system;

/// Router for all authenticated (user-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .nest("/dashboard", dashboard::router())
        .nest("/inventory", inventory::router())
        .nest("/notifications", notifications::router())
        .nest("/employees", employees::router())
        .nest("/assistant", assistant::router())
}
