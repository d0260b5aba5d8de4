pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::UserService>,
}

impl AppState {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        let user_repository = Arc::new(repositories::SqliteUserRepository::new(pool));
        AppState {
            user_service: Arc::new(services::UserService::new(user_repository)),
        }
    }
}

/// Builds the `/users` router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route(
            "/users",
            get(handlers::list_users_handler).post(handlers::create_user_handler),
        )
        .route(
            "/users/{id}",
            get(handlers::get_user_handler)
                .put(handlers::update_user_handler)
                .delete(handlers::delete_user_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
