//! External process execution.
//!
//! The job trigger gateway hands work to an external executable. This module
//! owns the process plumbing (spawn, argument passing, output capture,
//! timeout) and knows nothing about what the process does.

pub mod command;
pub mod subprocess;

/// Shared test helpers for subprocess tests.
#[cfg(test)]
pub(crate) mod test_helpers {
    use std::io::Write;
    use std::time::Duration;

    use super::command::ScriptInput;

    /// Build a [`ScriptInput`] with no arguments and a 5-second timeout.
    pub fn default_input() -> ScriptInput {
        ScriptInput {
            args: vec![],
            working_directory: None,
            timeout: Some(Duration::from_secs(5)),
        }
    }

    /// Write `body` to a temp file and return the argv that runs it with `sh`.
    ///
    /// The returned handle must outlive the execution.
    pub fn write_script(body: &str) -> (tempfile::TempPath, Vec<String>) {
        let mut file = tempfile::NamedTempFile::new().expect("create temp script");
        write!(file, "{body}").expect("write script body");
        let path = file.into_temp_path();
        let argv = vec!["sh".to_string(), path.to_string_lossy().into_owned()];
        (path, argv)
    }
}
