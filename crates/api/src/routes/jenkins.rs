use axum::routing::post;
use axum::Router;

use crate::handlers::jenkins;
use crate::state::AppState;

/// Routes mounted at `/jenkins`.
///
/// ```text
/// POST   /trigger    -> trigger_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/trigger", post(jenkins::trigger_job))
}
