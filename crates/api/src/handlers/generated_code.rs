//! Handlers for the `/generated-code` resource.
//!
//! The collection keeps only the most recent entries; creating one past
//! the cap evicts the oldest.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use fwhub_core::error::CoreError;
use fwhub_db::models::generated_code::{CreateGeneratedCode, GeneratedCodeListQuery};
use fwhub_db::repositories::GeneratedCodeRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidJson};
use crate::response::{CreatedResponse, MessageResponse};
use crate::state::AppState;

fn not_found(id: &str) -> AppError {
    AppError::Core(CoreError::not_found("Generated code", id))
}

/// POST /api/generated-code
///
/// Answers 200 with `{id, message}` like the build log create.
pub async fn create_generated_code(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateGeneratedCode>,
) -> AppResult<impl IntoResponse> {
    let outcome = GeneratedCodeRepo::create(state.store(), input).await?;

    tracing::info!(id = %outcome.id, evicted = outcome.evicted, "Generated code saved");

    Ok(Json(CreatedResponse {
        id: outcome.id,
        message: "Generated code saved successfully",
    }))
}

/// GET /api/generated-code?skip=&limit=
///
/// Newest `created_at` first; `limit` defaults to the retention cap.
pub async fn list_generated_code(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<GeneratedCodeListQuery>,
) -> AppResult<impl IntoResponse> {
    let entries = GeneratedCodeRepo::list(state.store(), params.skip, params.limit).await?;
    Ok(Json(entries))
}

/// GET /api/generated-code/{id}
pub async fn get_generated_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let entry = GeneratedCodeRepo::find_by_id(state.store(), &id)
        .await?
        .ok_or_else(|| not_found(&id))?;
    Ok(Json(entry))
}

/// DELETE /api/generated-code/{id}
pub async fn delete_generated_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !GeneratedCodeRepo::delete(state.store(), &id).await? {
        return Err(not_found(&id));
    }

    tracing::info!(id = %id, "Generated code deleted");
    Ok(Json(MessageResponse::new("Generated code deleted successfully")))
}

/// DELETE /api/generated-code
pub async fn delete_all_generated_code(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let deleted = GeneratedCodeRepo::delete_all(state.store()).await?;

    tracing::info!(deleted, "All generated code deleted");
    Ok(Json(MessageResponse::new(format!(
        "Deleted {deleted} generated code entries"
    ))))
}
