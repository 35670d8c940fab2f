//! Route definitions for the `/build-logs` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::build_logs;
use crate::state::AppState;

/// Routes mounted at `/build-logs`.
///
/// ```text
/// GET    /              -> list_build_logs
/// POST   /              -> create_build_log
/// DELETE /              -> delete_all_build_logs
/// GET    /{build_id}    -> get_build_log
/// PUT    /{build_id}    -> update_build_log
/// DELETE /{build_id}    -> delete_build_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(build_logs::list_build_logs)
                .post(build_logs::create_build_log)
                .delete(build_logs::delete_all_build_logs),
        )
        .route(
            "/{build_id}",
            get(build_logs::get_build_log)
                .put(build_logs::update_build_log)
                .delete(build_logs::delete_build_log),
        )
}
