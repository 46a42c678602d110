use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/session", get(handlers::session_snapshot))
        .route("/login", post(handlers::login))
        .route("/register", post(handlers::register))
        .route("/auth/:tab", post(handlers::switch_auth_tab))
        .route("/logout", post(handlers::logout))
        .route("/pages/:page", post(handlers::activate_page))
        .route("/home/tabs/:tab", post(handlers::activate_home_tab))
        .route("/agendas", post(handlers::create_activity))
        .route("/agendas/:id/complete", post(handlers::complete_activity))
        .route("/classes/filter", post(handlers::filter_classes))
        .with_state(state)
}
