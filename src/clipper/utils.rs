// Helper functions shared by the pipeline stages

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

use super::errors::ClipError;

/// Run a command to completion with a hard deadline.
/// The child is killed if the deadline passes.
pub async fn run_output_with_timeout(
    program: &str,
    args: Vec<String>,
    timeout_secs: u64,
) -> Result<std::process::Output, ClipError> {
    let mut child = TokioCommand::new(program)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ClipError::ToolNotFound(format!("Failed to start {}: {}", program, e)))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| ClipError::Unknown(format!("Failed to capture stdout from {}", program)))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| ClipError::Unknown(format!("Failed to capture stderr from {}", program)))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stdout_pipe.read_to_end(&mut buf).await;
        buf
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = stderr_pipe.read_to_end(&mut buf).await;
        buf
    });

    let waited = timeout(Duration::from_secs(timeout_secs), child.wait()).await;
    match waited {
        Ok(status_res) => {
            let status = status_res
                .map_err(|e| ClipError::Unknown(format!("Failed to wait for {}: {}", program, e)))?;
            let stdout = stdout_task.await.unwrap_or_default();
            let stderr = stderr_task.await.unwrap_or_default();
            Ok(std::process::Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(ClipError::NetworkTimeout)
        }
    }
}

/// Find an external tool binary in common install locations, then PATH
pub fn find_tool(binary_name: &str) -> String {
    let common_paths = [
        format!("/opt/homebrew/bin/{}", binary_name),
        format!("/usr/local/bin/{}", binary_name),
        format!("/usr/bin/{}", binary_name),
    ];

    for path in common_paths {
        if std::path::Path::new(&path).exists() {
            return path;
        }
    }

    // Fall back to `which`
    if let Ok(output) = std::process::Command::new("which").arg(binary_name).output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    // Last resort: hope it's in PATH
    binary_name.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_tool_falls_back_to_bare_name() {
        // A binary that certainly does not exist resolves to its own name
        let resolved = find_tool("definitely-not-a-real-binary-xyz");
        assert_eq!(resolved, "definitely-not-a-real-binary-xyz");
    }

    #[tokio::test]
    async fn test_run_output_missing_program_is_tool_not_found() {
        let err = run_output_with_timeout("definitely-not-a-real-binary-xyz", vec![], 5)
            .await
            .unwrap_err();
        assert!(matches!(err, ClipError::ToolNotFound(_)));
    }

    #[tokio::test]
    async fn test_run_output_deadline_kills_child() {
        let err = run_output_with_timeout("sleep", vec!["5".to_string()], 1)
            .await
            .unwrap_err();
        assert_eq!(err, ClipError::NetworkTimeout);
    }
}
