//! Process execution with cancellation and an optional timeout
//!
//! Used for the encoder: the child is killed as soon as the job's cancel
//! token fires or the deadline passes, instead of being left to finish.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

/// How a supervised process ended
#[derive(Debug)]
pub enum ProcessOutcome {
    /// The process exited on its own
    Exited { status: ExitStatus, stderr: Vec<u8> },
    /// The cancel token fired; the process was killed
    Cancelled,
    /// The deadline passed; the process was killed
    TimedOut(Duration),
}

/// Spawns `cmd` and waits for it, racing exit against `cancel` and `timeout`.
///
/// stdout is discarded, stderr is collected for diagnostics.
///
/// # Errors
/// Returns the IO error if the process cannot be spawned or waited on.
pub async fn run_cancellable(
    cmd: &mut Command,
    cancel: &CancellationToken,
    timeout: Option<Duration>,
) -> std::io::Result<ProcessOutcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;

    // Drain stderr concurrently so a chatty process never blocks on a full pipe
    let stderr = child.stderr.take();
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr {
            let _ = err.read_to_end(&mut buf).await;
        }
        buf
    });

    let deadline = async {
        match timeout {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        result = child.wait() => {
            let status = result?;
            let stderr = stderr_task.await.unwrap_or_default();
            Ok(ProcessOutcome::Exited { status, stderr })
        }
        _ = cancel.cancelled() => {
            log::info!("Cancel requested, killing process {:?}", child.id());
            kill_and_reap(&mut child).await;
            stderr_task.abort();
            Ok(ProcessOutcome::Cancelled)
        }
        _ = deadline => {
            let limit = timeout.unwrap_or_default();
            log::error!("Process timed out after {}s, killing", limit.as_secs());
            kill_and_reap(&mut child).await;
            stderr_task.abort();
            Ok(ProcessOutcome::TimedOut(limit))
        }
    }
}

async fn kill_and_reap(child: &mut Child) {
    // kill() also waits, so no zombie is left behind
    if let Err(e) = child.kill().await {
        log::warn!("Failed to kill process: {}", e);
    }
}

/// Last `max_bytes` of a stderr buffer as trimmed, lossy UTF-8.
pub fn stderr_excerpt(stderr: &[u8], max_bytes: usize) -> String {
    let start = stderr.len().saturating_sub(max_bytes);
    String::from_utf8_lossy(&stderr[start..]).trim().to_string()
}
