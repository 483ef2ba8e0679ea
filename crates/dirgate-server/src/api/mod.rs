//! HTTP routes.

mod members;

use axum::Router;
use axum::routing::get;
use surrealdb::Connection;

use crate::state::AppState;

/// Build the application router.
///
/// Caller authentication happens in front of this router; every request
/// reaching it comes from an authorized operator.
pub fn router<C: Connection>(state: AppState<C>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/v1/admin/members/{uid}/roles",
            get(members::get_roles::<C>).patch(members::update_roles::<C>),
        )
        .route("/v1/admin/members/{uid}/access", get(members::check_access::<C>))
        .route(
            "/v1/admin/members/{uid}/demo-days/{slug}/access",
            get(members::check_demo_day_access::<C>),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
