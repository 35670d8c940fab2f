//! Job trigger backed by an external helper process.
//!
//! The helper receives exactly one argument, the JSON-serialized trigger
//! payload, and must print one JSON object on stdout and exit 0. Anything
//! else is a trigger failure carrying the helper's own error text.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::profiles::JobProfiles;
use super::{JobRequest, JobTrigger, TriggerError};
use crate::scripting::command::{ScriptError, ScriptInput};
use crate::scripting::subprocess::{command_from_argv, run_command};

/// The argument handed to the helper process.
#[derive(Debug, Serialize)]
struct TriggerPayload<'a> {
    build_id: &'a str,
    job_type: &'a str,
    config: &'a Map<String, Value>,
    command: &'a str,
    job_name: String,
    parameters: BTreeMap<String, String>,
}

/// Runs a configured helper command for every trigger request.
#[derive(Debug, Clone)]
pub struct ScriptJobTrigger {
    /// Program followed by its fixed arguments, e.g. `["python3", "jenkins.py"]`.
    argv: Vec<String>,
    working_directory: Option<String>,
    /// `None` waits for the helper indefinitely.
    timeout: Option<Duration>,
    profiles: JobProfiles,
}

impl ScriptJobTrigger {
    pub fn new(argv: Vec<String>, profiles: JobProfiles) -> Self {
        Self {
            argv,
            working_directory: None,
            timeout: None,
            profiles,
        }
    }

    pub fn with_working_directory(mut self, dir: Option<String>) -> Self {
        self.working_directory = dir;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl JobTrigger for ScriptJobTrigger {
    async fn trigger(&self, request: &JobRequest) -> Result<Value, TriggerError> {
        let resolved = self.profiles.resolve(request);
        let payload = TriggerPayload {
            build_id: &request.build_id,
            job_type: &request.job_type,
            config: &request.config,
            command: &request.command,
            job_name: resolved.job_name,
            parameters: resolved.parameters,
        };
        let argument = serde_json::to_string(&payload)?;

        tracing::info!(
            build_id = %request.build_id,
            job_name = %payload.job_name,
            "Triggering CI job"
        );

        let mut cmd = command_from_argv(&self.argv)?;
        let output = run_command(
            &mut cmd,
            ScriptInput {
                args: vec![argument],
                working_directory: self.working_directory.clone(),
                timeout: self.timeout,
                ..ScriptInput::default()
            },
        )
        .await?;

        if !output.succeeded() {
            return Err(ScriptError::ExecutionFailed {
                exit_code: output.exit_code,
                stderr: output.error_text().to_string(),
            }
            .into());
        }

        match output.parsed_output {
            Some(result @ Value::Object(_)) => {
                tracing::debug!(
                    build_id = %request.build_id,
                    duration_ms = output.duration_ms,
                    "CI job trigger completed"
                );
                Ok(result)
            }
            Some(_) => Err(TriggerError::MalformedOutput(
                "expected a JSON object".to_string(),
            )),
            None => Err(TriggerError::MalformedOutput(format!(
                "stdout is not JSON: {}",
                output.stdout.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;
    use crate::build_labels::TYPE_FLOATING;
    use crate::scripting::test_helpers::write_script;

    fn request() -> JobRequest {
        JobRequest {
            build_id: "b-1".to_string(),
            job_type: TYPE_FLOATING.to_string(),
            config: json!({"version": "2.1"}).as_object().cloned().unwrap(),
            command: "deploy".to_string(),
        }
    }

    #[tokio::test]
    async fn relays_helper_json_and_passes_resolved_payload() {
        // Echo the received argument back inside a result object.
        let (_script, argv) = write_script("printf '{\"success\": true, \"received\": %s}' \"$1\"\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin())
            .with_timeout(Some(Duration::from_secs(5)));

        let result = trigger.trigger(&request()).await.unwrap();

        assert_eq!(result["success"], true);
        let received = &result["received"];
        assert_eq!(received["build_id"], "b-1");
        assert_eq!(received["job_name"], "floating-framework-pipeline");
        assert_eq!(received["parameters"]["FRAMEWORK_VERSION"], "2.1");
        assert_eq!(received["parameters"]["DEPLOYMENT_TARGET"], "staging");
        assert_eq!(received["config"]["version"], "2.1");
    }

    #[tokio::test]
    async fn non_zero_exit_surfaces_error_text() {
        let (_script, argv) = write_script("echo 'System connection test failed' >&2\nexit 1\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin());

        let err = trigger.trigger(&request()).await.unwrap_err();

        assert_matches!(
            err,
            TriggerError::Process(ScriptError::ExecutionFailed { exit_code: 1, ref stderr })
                if stderr == "System connection test failed"
        );
    }

    #[tokio::test]
    async fn non_json_stdout_is_malformed() {
        let (_script, argv) = write_script("echo 'queued'\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin());

        let err = trigger.trigger(&request()).await.unwrap_err();

        assert_matches!(err, TriggerError::MalformedOutput(msg) if msg.contains("queued"));
    }

    #[tokio::test]
    async fn json_array_is_malformed() {
        let (_script, argv) = write_script("echo '[1, 2]'\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin());

        let err = trigger.trigger(&request()).await.unwrap_err();

        assert_matches!(err, TriggerError::MalformedOutput(_));
    }

    #[tokio::test]
    async fn hung_helper_times_out() {
        let (_script, argv) = write_script("sleep 5\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin())
            .with_timeout(Some(Duration::from_millis(100)));

        let err = trigger.trigger(&request()).await.unwrap_err();

        assert_matches!(err, TriggerError::Process(ScriptError::Timeout { .. }));
    }

    #[tokio::test]
    async fn helper_leaving_background_job_on_stdout_still_times_out() {
        let (_script, argv) = write_script("sleep 4 &\necho '{\"ok\": true}'\n");
        let trigger = ScriptJobTrigger::new(argv, JobProfiles::builtin())
            .with_timeout(Some(Duration::from_millis(300)));

        let start = std::time::Instant::now();
        let err = trigger.trigger(&request()).await.unwrap_err();

        assert_matches!(err, TriggerError::Process(ScriptError::Timeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
