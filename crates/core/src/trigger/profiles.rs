//! Per-job-type trigger profiles.
//!
//! Which CI job a job type maps to, and which build parameters are derived
//! from the request's `config` map, is configuration. The built-in set
//! mirrors the three pipelines the platform ships with; a JSON file can
//! replace it wholesale.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::JobRequest;
use crate::build_labels::{TYPE_FLOATING, TYPE_JTAF, TYPE_OS_MAKING};

/// Job name used when a job type has no profile.
pub const DEFAULT_JOB_NAME: &str = "default-pipeline";

/// One build parameter derived from the request's `config` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name as the CI system expects it (e.g. `BROWSER`).
    pub name: String,
    /// Key looked up in the request's `config` map.
    pub config_key: String,
    /// Value used when the key is absent or null.
    #[serde(default)]
    pub default: Value,
}

/// Trigger settings for one job type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfile {
    pub job_name: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

/// The full job type → profile table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobProfiles {
    #[serde(default = "default_job_name")]
    pub fallback_job_name: String,
    pub profiles: BTreeMap<String, JobProfile>,
}

/// A job type resolved against its profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedJob {
    pub job_name: String,
    pub parameters: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Failed to read job profiles from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid job profiles in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

fn default_job_name() -> String {
    DEFAULT_JOB_NAME.to_string()
}

fn param(name: &str, config_key: &str, default: Value) -> ParameterSpec {
    ParameterSpec {
        name: name.to_string(),
        config_key: config_key.to_string(),
        default,
    }
}

impl Default for JobProfiles {
    fn default() -> Self {
        Self::builtin()
    }
}

impl JobProfiles {
    /// Profiles for the JTAF, floating framework and OS image pipelines.
    pub fn builtin() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(
            TYPE_JTAF.to_string(),
            JobProfile {
                job_name: "jtaf-framework-pipeline".to_string(),
                parameters: vec![
                    param("TEST_SUITE", "testSuite", json!("")),
                    param("BROWSER", "browser", json!("chrome")),
                    param("ENVIRONMENT", "environment", json!("dev")),
                    param("PARALLEL_EXECUTION", "parallelExecution", json!(false)),
                ],
            },
        );
        profiles.insert(
            TYPE_FLOATING.to_string(),
            JobProfile {
                job_name: "floating-framework-pipeline".to_string(),
                parameters: vec![
                    param("FRAMEWORK_VERSION", "version", json!("latest")),
                    param("DEPLOYMENT_TARGET", "target", json!("staging")),
                    param("CONFIGURATION_FILE", "configFile", json!("default.conf")),
                ],
            },
        );
        profiles.insert(
            TYPE_OS_MAKING.to_string(),
            JobProfile {
                job_name: "os-making-pipeline".to_string(),
                parameters: vec![
                    param("OS_TYPE", "osType", json!("linux")),
                    param("ARCHITECTURE", "architecture", json!("x64")),
                    param("BUILD_TYPE", "buildType", json!("release")),
                ],
            },
        );
        Self {
            fallback_job_name: default_job_name(),
            profiles,
        }
    }

    /// Load a profile table from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ProfileError> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ProfileError::Read {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ProfileError::Parse {
            path: display,
            source,
        })
    }

    /// Resolve the job name and the full parameter set for a request.
    ///
    /// `BUILD_ID`, `JOB_TYPE` and `COMMAND` are always present; profile
    /// parameters are added on top. Unknown job types get the fallback job
    /// name and no extra parameters.
    pub fn resolve(&self, request: &JobRequest) -> ResolvedJob {
        let mut parameters = BTreeMap::new();
        parameters.insert("BUILD_ID".to_string(), request.build_id.clone());
        parameters.insert("JOB_TYPE".to_string(), request.job_type.clone());
        parameters.insert("COMMAND".to_string(), request.command.clone());

        let Some(profile) = self.profiles.get(&request.job_type) else {
            return ResolvedJob {
                job_name: self.fallback_job_name.clone(),
                parameters,
            };
        };

        for spec in &profile.parameters {
            let value = lookup(&request.config, &spec.config_key).unwrap_or(&spec.default);
            parameters.insert(spec.name.clone(), render_parameter(value));
        }

        ResolvedJob {
            job_name: profile.job_name.clone(),
            parameters,
        }
    }
}

fn lookup<'a>(config: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    config.get(key).filter(|v| !v.is_null())
}

/// Render a JSON value as a CI build parameter string.
///
/// Strings are passed through, booleans become `true`/`false`, null becomes
/// empty, and anything else is rendered as compact JSON.
pub fn render_parameter(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
