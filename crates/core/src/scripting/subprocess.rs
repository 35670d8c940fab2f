//! Subprocess spawning with output capture and an optional timeout.

use std::process::Stdio;
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use super::command::{ScriptError, ScriptInput, ScriptOutput};

/// Maximum stdout or stderr size captured per stream (10 MiB).
const MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

/// Build a [`Command`] from a program followed by its fixed arguments.
pub fn command_from_argv(argv: &[String]) -> Result<Command, ScriptError> {
    let (program, fixed_args) = argv.split_first().ok_or(ScriptError::EmptyCommand)?;
    let mut cmd = Command::new(program);
    cmd.args(fixed_args);
    Ok(cmd)
}

/// Spawn `cmd` with the extra arguments from `input`, capture stdout and
/// stderr, and enforce the timeout if one is set.
///
/// A non-zero exit is not an error here; callers inspect
/// [`ScriptOutput::exit_code`].
pub async fn run_command(
    cmd: &mut Command,
    input: ScriptInput,
) -> Result<ScriptOutput, ScriptError> {
    cmd.args(&input.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &input.working_directory {
        cmd.current_dir(dir);
    }

    let start = Instant::now();
    let mut child = cmd.spawn()?;

    // Drain both pipes concurrently so a chatty child cannot block on a full pipe.
    let stdout_task = tokio::spawn(read_stream(child.stdout.take()));
    let stderr_task = tokio::spawn(read_stream(child.stderr.take()));
    let readers = [stdout_task.abort_handle(), stderr_task.abort_handle()];

    // The drains count against the limit too: a detached grandchild can hold
    // the pipes open long after the direct child exits.
    let finished = async {
        let status = child.wait().await?;
        let stdout_bytes = stdout_task.await.unwrap_or_default();
        let stderr_bytes = stderr_task.await.unwrap_or_default();
        Ok::<_, std::io::Error>((status, stdout_bytes, stderr_bytes))
    };

    let (status, stdout_bytes, stderr_bytes) = match input.timeout {
        Some(limit) => {
            let outcome = tokio::time::timeout(limit, finished).await;
            let Ok(done) = outcome else {
                for reader in &readers {
                    reader.abort();
                }
                let _ = child.start_kill();
                return Err(ScriptError::Timeout {
                    elapsed_ms: start.elapsed().as_millis() as u64,
                });
            };
            done?
        }
        None => finished.await?,
    };

    let duration_ms = start.elapsed().as_millis() as u64;
    let stdout = String::from_utf8_lossy(&stdout_bytes).into_owned();
    let stderr = String::from_utf8_lossy(&stderr_bytes).into_owned();
    let parsed_output = serde_json::from_str(stdout.trim()).ok();

    Ok(ScriptOutput {
        stdout,
        stderr,
        exit_code: status.code().unwrap_or(-1),
        duration_ms,
        parsed_output,
    })
}

/// Read an entire output stream into a byte buffer, capped at [`MAX_OUTPUT_BYTES`].
async fn read_stream<R: AsyncRead + Unpin>(handle: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut h) = handle {
        let _ = (&mut h)
            .take(MAX_OUTPUT_BYTES as u64)
            .read_to_end(&mut buf)
            .await;
    }
    buf
}
