//! Handlers for the `/build-logs` resource.
//!
//! Build logs are addressed by their caller-supplied `build_id`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fwhub_core::error::CoreError;
use fwhub_db::models::build_log::{BuildLogListQuery, CreateBuildLog, UpdateBuildLog};
use fwhub_db::repositories::BuildLogRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidJson};
use crate::response::{CreatedResponse, MessageResponse};
use crate::state::AppState;

fn not_found(build_id: &str) -> AppError {
    AppError::Core(CoreError::not_found("Build log", build_id))
}

/// POST /api/build-logs
///
/// Answers 200 with `{id, message}`.
pub async fn create_build_log(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateBuildLog>,
) -> AppResult<impl IntoResponse> {
    let id = BuildLogRepo::create(state.store(), &input).await?;

    tracing::info!(
        id = %id,
        build_id = %input.build_id,
        build_type = %input.build_type,
        status = %input.status,
        "Build log created",
    );

    Ok(Json(CreatedResponse {
        id,
        message: "Build log created successfully",
    }))
}

/// GET /api/build-logs?skip=&limit=&status=&type=
///
/// Newest `start_time` first.
pub async fn list_build_logs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<BuildLogListQuery>,
) -> AppResult<impl IntoResponse> {
    let logs =
        BuildLogRepo::list(state.store(), &params.filter(), params.skip, params.limit).await?;
    Ok(Json(logs))
}

/// GET /api/build-logs/{build_id}
pub async fn get_build_log(
    State(state): State<AppState>,
    Path(build_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let log = BuildLogRepo::find_by_build_id(state.store(), &build_id)
        .await?
        .ok_or_else(|| not_found(&build_id))?;
    Ok(Json(log))
}

/// PUT /api/build-logs/{build_id}
///
/// Applies only the supplied fields of `{status, end_time, output_log}`.
pub async fn update_build_log(
    State(state): State<AppState>,
    Path(build_id): Path<String>,
    ValidJson(input): ValidJson<UpdateBuildLog>,
) -> AppResult<impl IntoResponse> {
    if !BuildLogRepo::update(state.store(), &build_id, &input).await? {
        return Err(not_found(&build_id));
    }

    tracing::info!(build_id = %build_id, status = ?input.status, "Build log updated");
    Ok(Json(MessageResponse::new("Build log updated successfully")))
}

/// DELETE /api/build-logs/{build_id}
pub async fn delete_build_log(
    State(state): State<AppState>,
    Path(build_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !BuildLogRepo::delete(state.store(), &build_id).await? {
        return Err(not_found(&build_id));
    }

    tracing::info!(build_id = %build_id, "Build log deleted");
    Ok(Json(MessageResponse::new("Build log deleted successfully")))
}

/// DELETE /api/build-logs
pub async fn delete_all_build_logs(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deleted = BuildLogRepo::delete_all(state.store()).await?;

    tracing::info!(deleted, "All build logs deleted");
    Ok(Json(MessageResponse::new(format!("Deleted {deleted} build logs"))))
}
