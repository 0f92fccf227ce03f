//! Subprocess execution for output tools
//!
//! The only place a tool process is spawned. Arguments are passed as
//! discrete argv entries, never through a shell.

use crate::error::OutputError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::process::Command;

/// Where a tool's diagnostics go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Capture {
    /// Pipe stdout and stderr, both reported on failure
    Pipe,
    /// Discard stdout, send stderr to an unlinked temp file
    ///
    /// For clipboard tools: they fork a server that inherits the standard
    /// streams and keeps running until the selection changes, so a pipe
    /// would never reach EOF. A file does not block the wait.
    Spool,
}

/// One tool invocation
pub(crate) struct Invocation<'a> {
    pub tool: &'a str,
    pub program: &'a Path,
    pub args: Vec<String>,
    /// Payload written to stdin, which is then closed
    pub stdin: Option<String>,
    pub capture: Capture,
    pub timeout: Option<Duration>,
}

/// Run the invocation to completion
pub(crate) async fn run(invocation: Invocation<'_>) -> Result<(), OutputError> {
    let Invocation {
        tool,
        program,
        args,
        stdin,
        capture,
        timeout,
    } = invocation;

    let spool = match capture {
        Capture::Pipe => None,
        Capture::Spool => Some(tempfile::tempfile().map_err(|e| {
            execution_failed(tool, format!("failed to create spool: {}", e), String::new())
        })?),
    };

    let (stdout, stderr) = match &spool {
        None => (Stdio::piped(), Stdio::piped()),
        Some(file) => {
            let handle = file.try_clone().map_err(|e| {
                execution_failed(tool, format!("failed to create spool: {}", e), String::new())
            })?;
            (Stdio::null(), Stdio::from(handle))
        }
    };

    let mut child = Command::new(program)
        .args(&args)
        .stdin(if stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(stdout)
        .stderr(stderr)
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| execution_failed(tool, format!("failed to spawn: {}", e), String::new()))?;

    tracing::trace!("Spawned {} with {} args", tool, args.len());

    let completion = async move {
        // Write text to stdin
        if let Some(payload) = stdin {
            if let Some(mut pipe) = child.stdin.take() {
                match pipe.write_all(payload.as_bytes()).await {
                    Ok(()) => {}
                    // Tool exited without reading; its exit status tells the story
                    Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                        tracing::trace!("{} closed stdin early", tool);
                    }
                    Err(e) => {
                        return Err(execution_failed(
                            tool,
                            format!("failed to write stdin: {}", e),
                            String::new(),
                        ))
                    }
                }

                // Close stdin to signal EOF
                drop(pipe);
            }
        }

        child
            .wait_with_output()
            .await
            .map_err(|e| execution_failed(tool, format!("failed to wait: {}", e), String::new()))
    };

    // Dropping the future on timeout drops the child, which kills it
    let output = match timeout {
        Some(limit) => tokio::time::timeout(limit, completion)
            .await
            .map_err(|_| OutputError::Timeout {
                tool: tool.to_string(),
                timeout_ms: limit.as_millis() as u64,
            })??,
        None => completion.await?,
    };

    if !output.status.success() {
        let combined = match spool {
            Some(file) => read_spool(file).await,
            None => {
                let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
                combined.push_str(&String::from_utf8_lossy(&output.stderr));
                combined
            }
        };
        return Err(execution_failed(tool, output.status.to_string(), combined));
    }

    Ok(())
}

/// Whatever the tool wrote to its spool; unreadable reads as empty
async fn read_spool(file: std::fs::File) -> String {
    let mut file = tokio::fs::File::from_std(file);
    let mut bytes = Vec::new();
    let read = async {
        file.seek(std::io::SeekFrom::Start(0)).await?;
        file.read_to_end(&mut bytes).await
    };
    if let Err(e) = read.await {
        tracing::trace!("Could not read tool diagnostics: {}", e);
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

fn execution_failed(tool: &str, detail: String, output: String) -> OutputError {
    OutputError::ExecutionFailed {
        tool: tool.to_string(),
        detail,
        output,
    }
}
