//! External tool invocation.
//!
//! Every download, decrypt, mux and tag tool runs through [`run_tool`]: the
//! child is killed if the calling future is dropped, stderr is captured for
//! diagnostics, and a watchdog bounds the whole invocation.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Instant;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::{timeout, Duration};

/// Errors from running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary could not be found.
    #[error("{tool} not found at path: {path}")]
    NotFound { tool: String, path: PathBuf },

    /// The tool exited unsuccessfully.
    #[error("{tool} failed ({status})")]
    Failed {
        tool: String,
        status: String,
        stderr: String,
    },

    /// The watchdog fired before the tool exited.
    #[error("{tool} timed out after {timeout_secs} seconds")]
    Timeout { tool: String, timeout_secs: u64 },

    /// Spawning or waiting on the tool failed.
    #[error("I/O error running {tool}: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    /// Captured diagnostic output, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } if !stderr.is_empty() => Some(stderr),
            _ => None,
        }
    }
}

/// Output of a successful tool run.
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: u64,
}

fn tool_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| program.display().to_string())
}

/// Runs `program` with `args`, failing if it exits non-zero or outlives `watchdog`.
pub async fn run_tool(
    program: &Path,
    args: &[String],
    watchdog: Duration,
) -> Result<ToolOutput, ToolError> {
    let tool = tool_name(program);
    let start = Instant::now();

    tracing::debug!(tool = %tool, args = ?args, "Running external tool");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    tool: tool.clone(),
                    path: program.to_path_buf(),
                }
            } else {
                ToolError::Io {
                    tool: tool.clone(),
                    source: e,
                }
            }
        })?;

    // Dropping the wait future on timeout drops the child, which kills it.
    let output = match timeout(watchdog, child.wait_with_output()).await {
        Ok(result) => result.map_err(|e| ToolError::Io {
            tool: tool.clone(),
            source: e,
        })?,
        Err(_) => {
            tracing::warn!(tool = %tool, timeout_secs = watchdog.as_secs(), "External tool watchdog fired");
            return Err(ToolError::Timeout {
                tool,
                timeout_secs: watchdog.as_secs(),
            });
        }
    };

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if !output.status.success() {
        return Err(ToolError::Failed {
            tool,
            status: output.status.to_string(),
            stderr,
        });
    }

    Ok(ToolOutput {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Checks that `program` can be launched.
pub async fn check_tool(program: &Path, version_arg: &str) -> Result<(), ToolError> {
    let tool = tool_name(program);
    Command::new(program)
        .arg(version_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map(|_| ())
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ToolError::NotFound {
                    tool,
                    path: program.to_path_buf(),
                }
            } else {
                ToolError::Io { tool, source: e }
            }
        })
}
