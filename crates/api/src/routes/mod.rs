pub mod build_logs;
pub mod generated_code;
pub mod health;
pub mod jenkins;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /jenkins/trigger                 trigger a CI job
///
/// /build-logs                      list, create, delete all
/// /build-logs/{build_id}           get, update, delete
///
/// /generated-code                  list, create, delete all
/// /generated-code/{id}             get, delete
///
/// /stats                           aggregate counts
/// /health                          service and storage health
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/jenkins", jenkins::router())
        .nest("/build-logs", build_logs::router())
        .nest("/generated-code", generated_code::router())
        .merge(stats::router())
        .merge(health::router())
}
