//! Handler for triggering CI jobs through the job trigger gateway.

use axum::extract::State;
use axum::Json;
use fwhub_core::trigger::JobRequest;
use serde::Serialize;
use serde_json::Value;

use crate::extract::ApiJson;
use crate::state::AppState;

/// Outcome of a trigger attempt. Gateway failures are reported here, not
/// as HTTP errors.
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jenkins_result: Option<Value>,
    pub build_id: String,
}

/// POST /api/jenkins/trigger
///
/// Always answers 200 once the body parses; `success` tells whether the
/// gateway accepted the job.
pub async fn trigger_job(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JobRequest>,
) -> Json<TriggerResponse> {
    let response = match state.job_trigger.trigger(&request).await {
        Ok(result) => {
            tracing::info!(
                build_id = %request.build_id,
                job_type = %request.job_type,
                "Job triggered",
            );
            TriggerResponse {
                success: true,
                message: "Jenkins job triggered successfully".to_string(),
                jenkins_result: Some(result),
                build_id: request.build_id,
            }
        }
        Err(e) => {
            tracing::error!(
                build_id = %request.build_id,
                job_type = %request.job_type,
                error = %e,
                "Job trigger failed",
            );
            TriggerResponse {
                success: false,
                message: format!("Jenkins job trigger failed: {e}"),
                jenkins_result: None,
                build_id: request.build_id,
            }
        }
    };
    Json(response)
}
