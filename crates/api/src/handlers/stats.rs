use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use fwhub_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /api/stats
///
/// Build log counts by status and type, and the generated code total
/// against its retention cap.
pub async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = StatsRepo::collect(state.store()).await?;
    Ok(Json(stats))
}
