use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`).
    pub request_timeout_secs: u64,
    /// Durable store connection string. `None` selects in-memory storage.
    pub database_url: Option<String>,
    /// Program and leading arguments of the job trigger helper.
    pub trigger_command: Vec<String>,
    /// Working directory for the job trigger helper.
    pub trigger_workdir: Option<String>,
    /// Job trigger timeout in seconds; `0` disables it (default: `120`).
    pub trigger_timeout_secs: u64,
    /// JSON file overriding the built-in job profiles.
    pub job_profiles_path: Option<PathBuf>,
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                                              |
    /// |------------------------|----------------------------------------------------------------------|
    /// | `HOST`                 | `0.0.0.0`                                                            |
    /// | `PORT`                 | `8000`                                                               |
    /// | `CORS_ORIGINS`         | `http://localhost:3000,http://localhost:3001,http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                                                                |
    /// | `DATABASE_URL`         | unset (in-memory storage)                                            |
    /// | `TRIGGER_COMMAND`      | `python3 jenkins.py`                                                 |
    /// | `TRIGGER_WORKDIR`      | unset                                                                |
    /// | `TRIGGER_TIMEOUT_SECS` | `120`                                                                |
    /// | `JOB_PROFILES_PATH`    | unset (built-in profiles)                                            |
    ///
    /// Panics on malformed values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| {
                "http://localhost:3000,http://localhost:3001,http://localhost:5173".into()
            })
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let trigger_command: Vec<String> = std::env::var("TRIGGER_COMMAND")
            .unwrap_or_else(|_| "python3 jenkins.py".into())
            .split_whitespace()
            .map(str::to_string)
            .collect();
        assert!(!trigger_command.is_empty(), "TRIGGER_COMMAND must not be empty");

        let trigger_timeout_secs: u64 = std::env::var("TRIGGER_TIMEOUT_SECS")
            .unwrap_or_else(|_| "120".into())
            .parse()
            .expect("TRIGGER_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url: optional_var("DATABASE_URL"),
            trigger_command,
            trigger_workdir: optional_var("TRIGGER_WORKDIR"),
            trigger_timeout_secs,
            job_profiles_path: optional_var("JOB_PROFILES_PATH").map(PathBuf::from),
        }
    }

    /// The trigger timeout, or `None` when disabled.
    pub fn trigger_timeout(&self) -> Option<Duration> {
        (self.trigger_timeout_secs > 0).then(|| Duration::from_secs(self.trigger_timeout_secs))
    }
}
