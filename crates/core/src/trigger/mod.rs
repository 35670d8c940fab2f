//! Job trigger gateway.
//!
//! The HTTP layer forwards trigger requests to a [`JobTrigger`] and relays
//! the JSON result verbatim. The production implementation,
//! [`ScriptJobTrigger`](script::ScriptJobTrigger), shells out to an external
//! helper; tests substitute their own implementation.

pub mod profiles;
pub mod script;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::scripting::command::ScriptError;

/// A request to start one CI job for a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    pub build_id: String,
    pub job_type: String,
    #[serde(default)]
    pub config: Map<String, Value>,
    pub command: String,
}

/// Failure to trigger a job. Never retried.
#[derive(Debug, thiserror::Error)]
pub enum TriggerError {
    #[error("Failed to execute trigger process: {0}")]
    Process(#[from] ScriptError),

    #[error("Failed to parse trigger process output: {0}")]
    MalformedOutput(String),

    #[error("Failed to serialize trigger request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Starts external CI jobs.
#[async_trait]
pub trait JobTrigger: Send + Sync {
    /// Trigger the job described by `request` and return the gateway's JSON
    /// result object unchanged.
    async fn trigger(&self, request: &JobRequest) -> Result<Value, TriggerError>;
}
